// src/services/mod.rs
pub mod certificado_service;
pub mod evento_service;
pub mod formatacao;
pub mod notificacao_service;
pub mod participante_service;
