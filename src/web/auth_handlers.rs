// src/web/auth_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{CadastroForm, LoginForm, StatusCadastro, UserAccount},
    services::{auth_service, user_service},
    state::AppState,
    templates::{CadastroPage, LoginPage},
};
use askama::Template;
use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect},
};
use tower_sessions::Session;

const MSG_CREDENCIAIS: &str =
    "E-mail ou senha inválidos, ou cadastro ainda não aprovado.";

fn render_login(error: Option<String>) -> AppResult<axum::response::Response> {
    let template = LoginPage { error };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template de login: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// GET /login
pub async fn show_login_form(session: Session) -> AppResult<impl IntoResponse> {
    // Já logado? Vai direto para a lista.
    if session.get::<String>("user_email").await.ok().flatten().is_some() {
        tracing::debug!("GET /login: já logado, redirecionando para /presenca");
        return Ok(Redirect::to("/presenca").into_response());
    }
    render_login(None)
}

// POST /login
pub async fn handle_login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> AppResult<impl IntoResponse> {
    tracing::info!("Tentativa de login para: {}", form.email);

    match auth_service::autenticar(&state.store, &form.email, &form.password).await? {
        Some(conta) => {
            // Gera novo ID de sessão (segurança) antes de autenticar
            session
                .cycle_id()
                .await
                .map_err(|e| AppError::SessionError(format!("Falha ao rodar ID: {}", e)))?;
            session
                .insert("user_email", conta.email.to_lowercase())
                .await
                .map_err(|e| AppError::SessionError(format!("Falha ao inserir na sessão: {}", e)))?;
            Ok(Redirect::to("/presenca").into_response())
        }
        // Mensagem única para qualquer falha esperada, de propósito.
        None => render_login(Some(MSG_CREDENCIAIS.to_string())),
    }
}

// GET /logout
pub async fn handle_logout(session: Session) -> AppResult<Redirect> {
    let email: Option<String> = session.get("user_email").await.ok().flatten();

    session
        .delete()
        .await
        .map_err(|e| AppError::SessionError(format!("Falha ao apagar sessão: {}", e)))?;

    if let Some(email) = email {
        tracing::info!("🚪 Utilizador '{}' desligado.", email);
    } else {
        tracing::info!("🚪 Sessão anónima desligada.");
    }
    Ok(Redirect::to("/login"))
}

fn render_cadastro(error: Option<String>, ok: Option<String>) -> AppResult<axum::response::Response> {
    let template = CadastroPage { error, ok };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template de cadastro: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// GET /cadastro
pub async fn show_cadastro_form() -> AppResult<impl IntoResponse> {
    render_cadastro(None, None)
}

// POST /cadastro
pub async fn handle_cadastro(
    State(state): State<AppState>,
    Form(form): Form<CadastroForm>,
) -> AppResult<impl IntoResponse> {
    let nome = form.nome.trim();
    let email = form.email.trim();
    if nome.is_empty() || email.is_empty() || !email.contains('@') || form.password.len() < 4 {
        return render_cadastro(
            Some("Dados inválidos. Verifique todos os campos (senha mín. 4 caracteres).".into()),
            None,
        );
    }

    let senha_hash = auth_service::hash_password(&form.password).await?;
    let conta = UserAccount {
        nome: nome.to_string(),
        graduacao: form.graduacao.trim().to_string(),
        lotacao: form.lotacao.trim().to_string(),
        senha_hash,
        destino_padrao: form.destino_padrao.trim().to_string(),
        email: email.to_string(),
        telefone: form.telefone.trim().to_string(),
        status: StatusCadastro::Pendente,
    };

    match user_service::criar_conta(&state.store, conta).await? {
        user_service::ResultadoCadastro::Criado => render_cadastro(
            None,
            Some("Cadastro enviado! Aguarde a aprovação do administrador para entrar.".into()),
        ),
        user_service::ResultadoCadastro::EmailJaCadastrado => {
            render_cadastro(Some("Este e-mail já possui cadastro.".into()), None)
        }
        user_service::ResultadoCadastro::LimiteAtingido => render_cadastro(
            Some("O limite de cadastros foi atingido. Procure o administrador.".into()),
            None,
        ),
    }
}
