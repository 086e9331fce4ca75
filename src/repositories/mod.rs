// src/repositories/mod.rs
pub mod user_repository;
