// src/models/participante.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Pessoa inscrita em um ou mais eventos.
/// CPF e telefone são guardados só com dígitos; a máscara é aplicada na exibição.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Participante {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub telefone: String,
    pub email: String,
    pub created_at: Option<NaiveDateTime>,
}

// Dados do formulário público de inscrição
#[derive(Debug, Clone, Deserialize)]
pub struct InscricaoForm {
    pub nome: String,
    pub cpf: String,
    #[serde(default)]
    pub telefone: String,
    pub email: String,
    #[serde(default)]
    pub horario: Option<String>,
}

/// Participante visto a partir de uma inscrição num evento.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipanteInscrito {
    #[sqlx(flatten)]
    pub participante: Participante,
    pub horario_chegada: Option<String>,
    pub inscrito_em: Option<NaiveDateTime>,
}

/// Dados já normalizados para gravar um participante novo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovoParticipante {
    pub nome: String,
    pub cpf: String,
    pub telefone: String,
    pub email: String,
}
