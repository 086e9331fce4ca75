// src/models/evento.rs
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

use crate::models::certificado::CertificadoTemplate;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Evento {
    pub id: i64,
    pub titulo: String,
    pub descricao: Option<String>,
    pub inicio: NaiveDateTime,
    pub fim: NaiveDateTime,
    pub carga_horaria: i64,
    // Desligado pela tarefa diária de eventos expirados
    pub ativo: bool,
    pub certificado_imagem: Option<String>, // caminho relativo ao STORAGE_ROOT
    pub certificado_conteudo: Option<String>, // HTML com {{campos}}
}

impl Evento {
    /// Um evento expira quando o seu fim já passou.
    pub fn expirado_em(&self, agora: NaiveDateTime) -> bool {
        self.fim < agora
    }

    /// Aceita inscrições se estiver ativo e ainda não tiver terminado.
    pub fn aceita_inscricoes(&self, agora: NaiveDateTime) -> bool {
        self.ativo && !self.expirado_em(agora)
    }

    /// Modelo de certificado configurado para o evento, se houver conteúdo.
    pub fn certificado_template(&self) -> Option<CertificadoTemplate> {
        self.certificado_conteudo
            .as_ref()
            .filter(|c| !c.trim().is_empty())
            .map(|conteudo| CertificadoTemplate {
                imagem_fundo: self.certificado_imagem.clone(),
                conteudo: conteudo.clone(),
            })
    }
}

#[cfg(test)]
pub(crate) fn evento_de_teste() -> Evento {
    use chrono::NaiveDate;
    Evento {
        id: 1,
        titulo: "Semana Acadêmica".to_string(),
        descricao: None,
        inicio: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap().and_hms_opt(8, 0, 0).unwrap(),
        fim: NaiveDate::from_ymd_opt(2024, 5, 12).unwrap().and_hms_opt(18, 0, 0).unwrap(),
        carga_horaria: 20,
        ativo: true,
        certificado_imagem: Some("certificados/fundo.png".to_string()),
        certificado_conteudo: Some("<p>Certificamos que {{nome}} participou.</p>".to_string()),
    }
}
