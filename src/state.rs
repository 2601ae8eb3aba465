// src/state.rs
use crate::{config::AppConfig, store::retry::ComRetry, store::sqlite::SqliteSheetStore};
use sqlx::SqlitePool;

/// O store de produção: backing SQLite envolvido no decorador de retry.
/// Todos os handlers e serviços passam por aqui; nenhum acesso direto.
pub type StorePadrao = ComRetry<SqliteSheetStore>;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub store: StorePadrao,
    pub config: AppConfig,
}

// Permite extrair o pool da DB diretamente
impl axum::extract::FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> SqlitePool {
        state.db_pool.clone()
    }
}
