// src/state.rs
use crate::{
    config::AppConfig,
    repositories::user_repository::UserRepository,
    services::notificacao_service::MailTransport,
};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepository>,
    pub mailer: Arc<dyn MailTransport>,
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}
