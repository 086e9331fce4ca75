// src/web/mod.rs
pub mod admin_handlers;
pub mod certificado_handlers;
pub mod evento_handlers;
pub mod mw_ip;
pub mod routes;

#[cfg(test)]
mod tests;
