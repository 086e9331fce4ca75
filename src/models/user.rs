// src/models/user.rs
use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;

// Utilizador institucional, sincronizado do LDAP por um processo externo
#[derive(Debug, Clone, FromRow, Serialize, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub ativo: bool,
    pub synced_at: Option<NaiveDateTime>,
}

/// Critérios de pesquisa de utilizadores. Campos `None` não filtram.
#[derive(Debug, Clone, Default)]
pub struct UserCriteria {
    pub username: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub ativo: Option<bool>,
}

impl UserCriteria {
    pub fn username(username: impl Into<String>) -> Self {
        Self { username: Some(username.into()), ..Default::default() }
    }
}
