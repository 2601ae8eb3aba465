// src/error.rs
use crate::store::StoreError;
use axum::{http::StatusCode, response::Html, response::IntoResponse};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // Planilha inacessível mesmo depois do orçamento de retry.
    #[error("Erro no acesso à planilha: {0}")]
    Store(#[from] StoreError),

    #[error("Erro na base de dados: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Erro de migração da base de dados: {0}")]
    SqlxMigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Erro de variável de ambiente: {0}")]
    EnvVarError(#[from] std::env::VarError),

    #[error("Erro ao processar password")]
    PasswordHashingError,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Erro na sessão: {0}")]
    SessionError(String),

    #[error("Erro interno inesperado")]
    InternalServerError,

    #[error("Não autorizado")]
    Unauthorized,
}

// Como converter AppError numa resposta HTTP
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Loga o erro detalhado no servidor; o utilizador vê só o genérico.
        tracing::error!("Erro processado: {:?}", self);

        let (status, user_message) = match self {
            AppError::Store(StoreError::RateLimited) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "A planilha está sobrecarregada. Tente novamente em instantes.",
            ),
            AppError::Store(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao aceder à planilha.",
            ),
            AppError::SqlxError(_) | AppError::SqlxMigrateError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro ao aceder aos dados.")
            }
            AppError::EnvVarError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro de configuração.")
            }
            AppError::PasswordHashingError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro ao processar credenciais.",
            ),
            // Mensagem genérica de propósito: não revela qual campo falhou.
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos.")
            }
            AppError::SessionError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Erro na gestão da sua sessão.",
            ),
            AppError::Unauthorized => (StatusCode::FORBIDDEN, "Acesso restrito."),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado."),
        };

        (status, Html(format!(r#"
            <!DOCTYPE html><html><head><title>Erro</title><style>body{{font-family:sans-serif;}}</style></head>
            <body><h1>Erro {status_code}</h1><p>{message}</p><a href="javascript:history.back()">Voltar</a></body></html>
         "#, status_code=status.as_u16(), message=user_message))).into_response()
    }
}

// Tipo Result padrão para a aplicação
pub type AppResult<T = ()> = Result<T, AppError>;
