// src/services/auth_service.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{StatusCadastro, UserAccount},
    services::user_service,
    store::PlanilhaStore,
};

/// Verifica se a senha fornecida corresponde ao hash guardado.
pub async fn verify_password(password: &str, stored_hash: &str) -> AppResult<bool> {
    let password = password.to_string();
    let stored_hash = stored_hash.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Verificando hash bcrypt...");
        bcrypt::verify(&password, &stored_hash)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (verify_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao verificar senha: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Gera um hash bcrypt para uma senha (gravado na coluna posicional
/// `senha` da aba de cadastros).
pub async fn hash_password(password: &str) -> AppResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        tracing::debug!("Gerando hash bcrypt...");
        bcrypt::hash(&password, bcrypt::DEFAULT_COST)
    })
    .await
    .map_err(|e| {
        tracing::error!("Erro na task spawn_blocking (hash_password): {:?}", e);
        AppError::InternalServerError
    })?
    .map_err(|e| {
        tracing::error!("Erro bcrypt ao gerar hash: {:?}", e);
        AppError::PasswordHashingError
    })
}

/// Autentica um utilizador pelo e-mail + senha.
///
/// Devolve `None` para QUALQUER falha esperada (e-mail desconhecido, senha
/// errada, cadastro ainda não aprovado ou inativado), de propósito: a
/// resposta ao utilizador nunca revela qual verificação falhou.
pub async fn autenticar<S: PlanilhaStore>(
    store: &S,
    email: &str,
    password: &str,
) -> AppResult<Option<UserAccount>> {
    let Some(conta) = user_service::buscar_por_email(store, email).await? else {
        tracing::warn!("Login falhou: e-mail '{}' não cadastrado.", email);
        return Ok(None);
    };

    if conta.status != StatusCadastro::Ativo {
        tracing::warn!(
            "Login falhou: cadastro de '{}' está {}.",
            email,
            conta.status.as_str()
        );
        return Ok(None);
    }

    if !verify_password(password, &conta.senha_hash).await? {
        tracing::warn!("Login falhou: senha incorreta para '{}'.", email);
        return Ok(None);
    }

    tracing::info!("✅ Login bem-sucedido para '{}'.", email);
    Ok(Some(conta))
}
