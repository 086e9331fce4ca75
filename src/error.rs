// src/error.rs
use axum::{http::StatusCode, response::Html, response::IntoResponse};
use thiserror::Error;

/// Mensagem fixa devolvida quando a origem do pedido não está autorizada.
pub const MENSAGEM_ACESSO_NEGADO: &str = "Acesso não autorizado!";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Configuração inválida: {0}")]
    ConfigError(String),

    #[error("Erro ao renderizar template: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Erro ao enviar email: {0}")]
    MailError(String),

    #[error("Registo não encontrado")]
    NotFound,

    #[error("{0}")]
    AccessDenied(&'static str),

    #[error("Erro interno inesperado")]
    InternalServerError,
}

impl AppError {
    pub fn acesso_negado() -> Self {
        AppError::AccessDenied(MENSAGEM_ACESSO_NEGADO)
    }
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, user_message) = match &self {
            AppError::AccessDenied(msg) => {
                // Rejeição esperada: não é erro do servidor
                tracing::warn!("Pedido rejeitado: {}", msg);
                (StatusCode::FORBIDDEN, *msg)
            }
            AppError::NotFound => {
                tracing::debug!("Registo não encontrado");
                (StatusCode::NOT_FOUND, "Página não encontrada.")
            }
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                tracing::error!("Erro processado: {:?}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao aceder aos dados.")
            }
            AppError::EnvVarError(_) | AppError::ConfigError(_) => {
                tracing::error!("Erro processado: {:?}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro de configuração.")
            }
            _ => {
                tracing::error!("Erro processado: {:?}", self);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        (status, Html(format!(r#"
            <!DOCTYPE html><html lang="pt-BR"><head><meta charset="utf-8"><title>Erro</title><style>body{{font-family:sans-serif;}}</style></head>
            <body><h1>Erro {status_code}</h1><p>{message}</p><a href="javascript:history.back()">Voltar</a></body></html>
         "#, status_code = status.as_u16(), message = user_message))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acesso_negado_responde_403() {
        let response = AppError::acesso_negado().into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_responde_404() {
        assert_eq!(AppError::NotFound.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn erros_internos_respondem_500() {
        let response = AppError::MailError("smtp".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
