// src/models/certificado.rs
use std::collections::BTreeMap;

/// Par imagem de fundo + texto do certificado, definido por quem gere o evento.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificadoTemplate {
    /// Caminho relativo à raiz de armazenamento (ex: "certificados/fundo.png").
    pub imagem_fundo: Option<String>,
    /// Fragmento HTML confiável, com marcadores `{{campo}}`.
    pub conteudo: String,
}

/// Valores nomeados usados para preencher os marcadores do conteúdo.
#[derive(Debug, Clone, Default)]
pub struct CamposCertificado(BTreeMap<&'static str, String>);

impl CamposCertificado {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn com(mut self, nome: &'static str, valor: impl Into<String>) -> Self {
        self.0.insert(nome, valor.into());
        self
    }

    pub fn get(&self, nome: &str) -> Option<&str> {
        self.0.get(nome).map(String::as_str)
    }

    /// Substitui cada `{{nome}}` conhecido pelo seu valor, sem escapar HTML.
    /// Marcadores desconhecidos ficam como estão.
    pub fn aplicar(&self, conteudo: &str) -> String {
        let mut saida = String::with_capacity(conteudo.len());
        let mut resto = conteudo;
        while let Some(inicio) = resto.find("{{") {
            saida.push_str(&resto[..inicio]);
            let depois = &resto[inicio + 2..];
            match depois.find("}}") {
                Some(fim) => {
                    let chave = depois[..fim].trim();
                    match self.get(chave) {
                        Some(valor) => saida.push_str(valor),
                        None => saida.push_str(&resto[inicio..inicio + 2 + fim + 2]),
                    }
                    resto = &depois[fim + 2..];
                }
                None => {
                    // "{{" sem fecho: o resto passa inalterado
                    saida.push_str(&resto[inicio..]);
                    resto = "";
                }
            }
        }
        saida.push_str(resto);
        saida
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitui_campos_conhecidos() {
        let campos = CamposCertificado::new()
            .com("nome", "Ana Souza")
            .com("evento", "Semana Acadêmica");
        assert_eq!(
            campos.aplicar("<b>{{nome}}</b> em {{ evento }}"),
            "<b>Ana Souza</b> em Semana Acadêmica"
        );
    }

    #[test]
    fn mantem_marcadores_desconhecidos_e_incompletos() {
        let campos = CamposCertificado::new().com("nome", "Ana");
        assert_eq!(campos.aplicar("{{outro}} e {{nome}}"), "{{outro}} e Ana");
        assert_eq!(campos.aplicar("fim {{nome"), "fim {{nome");
    }

    #[test]
    fn nao_escapa_html_dos_valores() {
        let campos = CamposCertificado::new().com("nome", "<i>Ana & Bia</i>");
        assert_eq!(campos.aplicar("{{nome}}"), "<i>Ana & Bia</i>");
    }
}
