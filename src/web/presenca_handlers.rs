// src/web/presenca_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::StatusCadastro,
    services::{export_service, presenca_service, user_service},
    state::AppState,
    templates::{ImpressaoPage, PresencaPage},
    web::mw_auth::EmailLogado,
};
use askama::Template;
use axum::{
    extract::{Extension, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use chrono::Local;
use serde::Deserialize;

/// Mensagens de feedback passadas por query string após um redirect.
#[derive(Deserialize, Debug, Default)]
pub struct FlashQuery {
    pub msg: Option<String>,
    pub erro: Option<String>,
}

fn redirect_msg(msg: &str) -> Redirect {
    Redirect::to(&format!("/presenca?msg={}", urlencoding::encode(msg)))
}

fn redirect_erro(erro: &str) -> Redirect {
    Redirect::to(&format!("/presenca?erro={}", urlencoding::encode(erro)))
}

// GET /presenca — a página principal: lista numerada do ciclo corrente.
pub async fn presenca_page_handler(
    State(state): State<AppState>,
    Extension(email_ext): Extension<EmailLogado>,
    Query(flash): Query<FlashQuery>,
) -> AppResult<impl IntoResponse> {
    let email = email_ext.0;
    let agora = Local::now().naive_local();
    tracing::debug!("GET /presenca para '{}' em {}", email, agora);

    // O reset do ciclo é avaliado dentro de carregar_roster, antes da leitura.
    let roster = presenca_service::carregar_roster(&state.store, agora).await?;

    let conta = user_service::buscar_por_email(&state.store, &email).await?;
    let nome_usuario = conta.map(|c| c.nome).unwrap_or_else(|| email.clone());

    let ja_inscrito = roster
        .inscricoes
        .iter()
        .any(|n| n.inscricao.email.eq_ignore_ascii_case(&email));
    let excedentes = roster.inscricoes.iter().filter(|n| n.excedente).count();

    let template = PresencaPage {
        nome_usuario,
        is_admin: email.eq_ignore_ascii_case(&state.config.admin_email),
        abertas: roster.inscricoes_abertas,
        ja_inscrito,
        total: roster.inscricoes.len(),
        excedentes,
        inscricoes: roster.inscricoes,
        msg: flash.msg,
        erro: flash.erro,
    };

    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template PresencaPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// POST /presenca/inscrever — inscreve o utilizador logado.
pub async fn handle_inscrever(
    State(state): State<AppState>,
    Extension(email_ext): Extension<EmailLogado>,
) -> AppResult<Redirect> {
    let email = email_ext.0;

    let conta = match user_service::buscar_por_email(&state.store, &email).await? {
        Some(c) if c.status == StatusCadastro::Ativo => c,
        _ => {
            tracing::warn!("Inscrição recusada: cadastro de '{}' indisponível.", email);
            return Ok(redirect_erro("Cadastro não encontrado ou não aprovado."));
        }
    };

    let agora = Local::now().naive_local();
    let resultado = presenca_service::inscrever(&state.store, agora, &conta).await?;
    Ok(match resultado {
        presenca_service::ResultadoInscricao::Registrada => {
            redirect_msg("Presença registrada!")
        }
        presenca_service::ResultadoInscricao::JaInscrito => {
            redirect_erro("Você já está na lista deste ciclo.")
        }
        presenca_service::ResultadoInscricao::ForaDoHorario => {
            redirect_erro("Inscrições fechadas neste horário (janela de conferência).")
        }
    })
}

// POST /presenca/remover — auto-retirada do utilizador logado.
pub async fn handle_remover(
    State(state): State<AppState>,
    Extension(email_ext): Extension<EmailLogado>,
) -> AppResult<Redirect> {
    let email = email_ext.0;
    let agora = Local::now().naive_local();
    let resultado = presenca_service::remover(&state.store, agora, &email).await?;
    Ok(match resultado {
        presenca_service::ResultadoRemocao::Removida => {
            redirect_msg("Sua presença foi removida.")
        }
        presenca_service::ResultadoRemocao::NaoEncontrada => {
            redirect_erro("Você não está na lista deste ciclo.")
        }
    })
}

// GET /presenca/impressao — versão tabular para imprimir/gerar PDF.
pub async fn impressao_handler(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let agora = Local::now().naive_local();
    let roster = presenca_service::carregar_roster(&state.store, agora).await?;

    let template = ImpressaoPage {
        documento: export_service::documento_impressao(&roster.inscricoes),
        gerado_em: agora.format("%d/%m/%Y %H:%M").to_string(),
    };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template ImpressaoPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// GET /presenca/whatsapp — abre o deep-link de partilha com o resumo.
pub async fn whatsapp_handler(State(state): State<AppState>) -> AppResult<Redirect> {
    let agora = Local::now().naive_local();
    let roster = presenca_service::carregar_roster(&state.store, agora).await?;
    let link = export_service::link_whatsapp(&roster.inscricoes);
    Ok(Redirect::to(&link))
}
