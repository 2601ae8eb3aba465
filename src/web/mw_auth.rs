// src/web/mw_auth.rs
use crate::error::AppError;
use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// E-mail do utilizador logado, posto nas extensões da requisição pelo
/// middleware para os handlers protegidos.
#[derive(Clone, Debug)]
pub struct EmailLogado(pub String);

/// Middleware que verifica se o utilizador está logado.
pub async fn require_auth(
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match session.get::<String>("user_email").await {
        Ok(Some(email)) => {
            tracing::debug!("Autenticação MW: '{}' autenticado. Prosseguindo...", email);
            request.extensions_mut().insert(EmailLogado(email));
            Ok(next.run(request).await)
        }
        Ok(None) => {
            tracing::debug!("Autenticação MW: não autenticado. Redirecionando para /login");
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            tracing::error!("Autenticação MW: erro ao ler sessão: {:?}", e);
            Err(AppError::SessionError(format!("Erro ao verificar sessão: {}", e)))
        }
    }
}
