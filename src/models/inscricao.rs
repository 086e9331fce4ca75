// src/models/inscricao.rs
use chrono::NaiveDateTime;
use sqlx::FromRow;

/// Ligação participante <-> evento.
#[derive(Debug, Clone, FromRow)]
pub struct Inscricao {
    pub id: String, // UUID
    pub participante_id: i64,
    pub evento_id: i64,
    pub horario_chegada: Option<String>, // "HH:MM"
    pub created_at: Option<NaiveDateTime>,
}
