// src/web/routes.rs
use crate::{
    state::AppState,
    web::{admin_handlers, auth_handlers, mw_admin, mw_auth, presenca_handlers},
};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub fn create_router(app_state: AppState) -> Router {
    // --- Rotas Públicas ---
    let public_routes = Router::new()
        .route(
            "/login",
            get(auth_handlers::show_login_form).post(auth_handlers::handle_login),
        )
        .route(
            "/cadastro",
            get(auth_handlers::show_cadastro_form).post(auth_handlers::handle_cadastro),
        )
        .route("/logout", get(auth_handlers::handle_logout))
        .route("/", get(|| async { axum::response::Redirect::permanent("/login") }));

    // --- Rotas da Lista de Presença ---
    // Exigem login (mw_auth é aplicado no router pai)
    let presenca_routes = Router::new()
        .route("/", get(presenca_handlers::presenca_page_handler))
        .route("/inscrever", post(presenca_handlers::handle_inscrever))
        .route("/remover", post(presenca_handlers::handle_remover))
        .route("/impressao", get(presenca_handlers::impressao_handler))
        .route("/whatsapp", get(presenca_handlers::whatsapp_handler));

    // --- Rotas de Admin ---
    // Exigem login E e-mail de administrador
    let admin_routes = Router::new()
        .route("/usuarios", get(admin_handlers::show_admin_usuarios))
        .route("/usuarios/aprovar", post(admin_handlers::handle_aprovar))
        .route("/usuarios/status", post(admin_handlers::handle_status))
        .route("/usuarios/apagar", post(admin_handlers::handle_apagar))
        .route("/usuarios/limite", post(admin_handlers::handle_limite))
        .route("/lista/remover", post(admin_handlers::handle_remover_da_lista))
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_admin::require_admin,
        ));

    // --- Rotas Autenticadas (Combinando tudo) ---
    let authenticated_routes = Router::new()
        .nest("/presenca", presenca_routes)
        .nest("/admin", admin_routes)
        .route_layer(middleware::from_fn_with_state(
            app_state.clone(),
            mw_auth::require_auth,
        ));

    // --- Router Final ---
    Router::new()
        .merge(public_routes)
        .merge(authenticated_routes)
        .with_state(app_state)
}
