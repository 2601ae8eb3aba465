// src/models/mod.rs
pub mod inscricao;
pub mod user;
