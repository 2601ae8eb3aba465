// src/services/mod.rs
pub mod auth_service;
pub mod ciclo;
pub mod export_service;
pub mod ordenacao;
pub mod presenca_service;
pub mod user_service;
