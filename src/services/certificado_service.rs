// src/services/certificado_service.rs
use crate::{
    error::AppResult,
    models::{
        certificado::{CamposCertificado, CertificadoTemplate},
        evento::Evento,
        participante::Participante,
    },
    services::formatacao,
    templates::CertificadoPage,
};
use askama::Template;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::NaiveDate;
use std::path::{Component, Path, PathBuf};

/// Localidade impressa antes da data de emissão.
pub const LOCALIDADE: &str = "Florianópolis";

/// Campos disponíveis para o conteúdo do certificado.
pub fn campos_para(participante: &Participante, evento: &Evento) -> CamposCertificado {
    CamposCertificado::new()
        .com("nome", participante.nome.clone())
        .com("cpf", formatacao::formatar_cpf(&participante.cpf))
        .com("email", participante.email.clone())
        .com("evento", evento.titulo.clone())
        .com("data_evento", data_evento(evento))
        .com("data_inicio", evento.inicio.format("%d/%m/%Y").to_string())
        .com("data_fim", evento.fim.format("%d/%m/%Y").to_string())
        .com("carga_horaria", evento.carga_horaria.to_string())
}

/// "10/05/2024" para eventos de um só dia, senão "10/05/2024 a 12/05/2024".
fn data_evento(evento: &Evento) -> String {
    let inicio = evento.inicio.date();
    let fim = evento.fim.date();
    if inicio == fim {
        inicio.format("%d/%m/%Y").to_string()
    } else {
        format!("{} a {}", inicio.format("%d/%m/%Y"), fim.format("%d/%m/%Y"))
    }
}

/// "Florianópolis, DD/MM/AAAA"
pub fn linha_local_data(data: NaiveDate) -> String {
    format!("{}, {}", LOCALIDADE, data.format("%d/%m/%Y"))
}

/// Gera o HTML imprimível (A4 paisagem) de um certificado.
///
/// Uma imagem de fundo em falta não impede a emissão: a página sai sem fundo.
/// O conteúdo do modelo é confiável e vai sem escape.
pub async fn gerar_certificado(
    storage_root: &Path,
    template: &CertificadoTemplate,
    campos: &CamposCertificado,
    data_emissao: NaiveDate,
) -> AppResult<String> {
    let fundo = match template.imagem_fundo.as_deref() {
        Some(referencia) => carregar_fundo(storage_root, referencia).await,
        None => None,
    };

    let page = CertificadoPage {
        fundo,
        conteudo: campos.aplicar(&template.conteudo),
        local_data: linha_local_data(data_emissao),
    };
    Ok(page.render()?)
}

/// Lê a imagem e devolve-a como data URI. Qualquer falha resulta em `None`.
async fn carregar_fundo(storage_root: &Path, referencia: &str) -> Option<String> {
    let Some(caminho) = resolver_caminho(storage_root, referencia) else {
        tracing::warn!("Caminho de imagem de fundo recusado: {}", referencia);
        return None;
    };
    match tokio::fs::read(&caminho).await {
        Ok(bytes) => Some(format!("data:{};base64,{}", mime_da_extensao(&caminho), STANDARD.encode(bytes))),
        Err(e) => {
            tracing::warn!("Imagem de fundo indisponível ({}): {}. Certificado sem fundo.", caminho.display(), e);
            None
        }
    }
}

/// Junta a referência à raiz de armazenamento. O prefixo "storage/" usado
/// nas referências públicas é removido; caminhos absolutos ou com ".." são recusados.
fn resolver_caminho(storage_root: &Path, referencia: &str) -> Option<PathBuf> {
    let relativo = Path::new(referencia.trim());
    let relativo = relativo.strip_prefix("storage").unwrap_or(relativo);
    if relativo.as_os_str().is_empty() {
        return None;
    }
    if relativo
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }
    Some(storage_root.join(relativo))
}

fn mime_da_extensao(caminho: &Path) -> &'static str {
    let extensao = caminho
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extensao.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
