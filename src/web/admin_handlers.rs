// src/web/admin_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::StatusCadastro,
    services::{presenca_service, user_service},
    state::AppState,
    templates::AdminUsuariosPage,
    web::presenca_handlers::FlashQuery,
};
use askama::Template;
use axum::{
    extract::{Form, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use serde::Deserialize;

fn redirect_msg(msg: &str) -> Redirect {
    Redirect::to(&format!("/admin/usuarios?msg={}", urlencoding::encode(msg)))
}

fn redirect_erro(erro: &str) -> Redirect {
    Redirect::to(&format!("/admin/usuarios?erro={}", urlencoding::encode(erro)))
}

// GET /admin/usuarios
pub async fn show_admin_usuarios(
    State(state): State<AppState>,
    Query(flash): Query<FlashQuery>,
) -> AppResult<impl IntoResponse> {
    let contas = user_service::listar_contas(&state.store).await?;
    let limite = user_service::ler_limite_cadastros(&state.store).await?;

    let template = AdminUsuariosPage {
        contas,
        limite,
        msg: flash.msg,
        erro: flash.erro,
    };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template AdminUsuariosPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub email: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct LimiteForm {
    pub limite: usize,
}

// POST /admin/usuarios/aprovar
pub async fn handle_aprovar(
    State(state): State<AppState>,
    Form(form): Form<EmailForm>,
) -> AppResult<Redirect> {
    if user_service::alterar_status(&state.store, &form.email, StatusCadastro::Ativo).await? {
        Ok(redirect_msg(&format!("Cadastro de '{}' aprovado.", form.email)))
    } else {
        Ok(redirect_erro(&format!("Cadastro '{}' não encontrado.", form.email)))
    }
}

// POST /admin/usuarios/status
pub async fn handle_status(
    State(state): State<AppState>,
    Form(form): Form<StatusForm>,
) -> AppResult<Redirect> {
    let status = StatusCadastro::parse(&form.status);
    if user_service::alterar_status(&state.store, &form.email, status).await? {
        Ok(redirect_msg(&format!(
            "Status de '{}' alterado para {}.",
            form.email,
            status.as_str()
        )))
    } else {
        Ok(redirect_erro(&format!("Cadastro '{}' não encontrado.", form.email)))
    }
}

// POST /admin/usuarios/apagar
pub async fn handle_apagar(
    State(state): State<AppState>,
    Form(form): Form<EmailForm>,
) -> AppResult<Redirect> {
    if user_service::apagar_conta(&state.store, &form.email).await? {
        Ok(redirect_msg(&format!("Cadastro de '{}' apagado.", form.email)))
    } else {
        Ok(redirect_erro(&format!("Cadastro '{}' não encontrado.", form.email)))
    }
}

// POST /admin/usuarios/limite
pub async fn handle_limite(
    State(state): State<AppState>,
    Form(form): Form<LimiteForm>,
) -> AppResult<Redirect> {
    user_service::definir_limite_cadastros(&state.store, form.limite).await?;
    Ok(redirect_msg(&format!("Limite de cadastros definido para {}.", form.limite)))
}

// POST /admin/lista/remover — tira alguém da lista do ciclo corrente.
pub async fn handle_remover_da_lista(
    State(state): State<AppState>,
    Form(form): Form<EmailForm>,
) -> AppResult<Redirect> {
    let agora = chrono::Local::now().naive_local();
    match presenca_service::remover(&state.store, agora, &form.email).await? {
        presenca_service::ResultadoRemocao::Removida => {
            Ok(redirect_msg(&format!("'{}' removido da lista.", form.email)))
        }
        presenca_service::ResultadoRemocao::NaoEncontrada => {
            Ok(redirect_erro(&format!("'{}' não está na lista.", form.email)))
        }
    }
}
