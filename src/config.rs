// src/config.rs
use crate::error::AppResult;
use std::env;

/// Configuração da aplicação, resolvida UMA vez no arranque a partir do
/// ambiente (.env em desenvolvimento). Nada de ler variáveis soltas pelo
/// código fora daqui.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub session_secret: String,
    /// E-mail com acesso às páginas de administração.
    pub admin_email: String,
    pub porta: u16,
}

impl AppConfig {
    pub fn from_env() -> AppResult<AppConfig> {
        dotenvy::dotenv().ok();

        let config = AppConfig {
            database_url: env::var("DATABASE_URL")?,
            session_secret: env::var("SESSION_SECRET")?,
            admin_email: env::var("ADMIN_EMAIL")?.trim().to_lowercase(),
            porta: env::var("PORTA")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
        };

        // A chave de assinatura do cookie exige pelo menos 64 bytes; o
        // arranque falha mais à frente se a secret for curta.
        if config.session_secret.len() < 64 {
            tracing::warn!(
                "⚠️ SESSION_SECRET é curta (mín. 64 bytes para assinar o cookie de sessão)!"
            );
        }
        Ok(config)
    }
}
