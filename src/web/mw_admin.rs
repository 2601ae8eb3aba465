// src/web/mw_admin.rs
use crate::{error::AppError, state::AppState, web::mw_auth::EmailLogado};
use axum::{
    extract::{Extension, Request, State},
    middleware::Next,
    response::Response,
};

/// Middleware que restringe a rota ao administrador configurado.
/// Deve ser executado *depois* do middleware `require_auth`.
pub async fn require_admin(
    State(state): State<AppState>,
    Extension(email_ext): Extension<EmailLogado>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let email = email_ext.0;
    if email.eq_ignore_ascii_case(&state.config.admin_email) {
        tracing::debug!("Admin MW: acesso concedido para {}", email);
        Ok(next.run(request).await)
    } else {
        tracing::warn!("Admin MW: acesso negado para {}.", email);
        Err(AppError::Unauthorized)
    }
}
