// src/models/mod.rs
pub mod certificado;
pub mod evento;
pub mod inscricao;
pub mod participante;
pub mod user;
