// src/services/user_service.rs
//
// CRUD fino de cadastros contra a aba `usuarios` da planilha. O e-mail é a
// chave de identidade; linhas duplicadas legadas são tratadas sempre como
// "primeira que bate".
use crate::{
    error::AppResult,
    models::user::{StatusCadastro, UserAccount},
    store::{PlanilhaStore, ABA_CONFIG, ABA_USUARIOS},
};

/// Chave da aba `config` que limita quantos cadastros podem existir.
/// Só trava cadastros novos; não tem relação com os 38 assentos.
pub const CHAVE_LIMITE_CADASTROS: &str = "limite_cadastros";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultadoCadastro {
    Criado,
    EmailJaCadastrado,
    LimiteAtingido,
}

/// Todas as contas, na ordem da planilha (sem o cabeçalho).
pub async fn listar_contas<S: PlanilhaStore>(store: &S) -> AppResult<Vec<UserAccount>> {
    let linhas = store.ler_linhas(ABA_USUARIOS).await?;
    Ok(linhas
        .iter()
        .skip(1)
        .map(|l| UserAccount::from_linha(l))
        .collect())
}

pub async fn buscar_por_email<S: PlanilhaStore>(
    store: &S,
    email: &str,
) -> AppResult<Option<UserAccount>> {
    let contas = listar_contas(store).await?;
    Ok(contas
        .into_iter()
        .find(|c| c.email.eq_ignore_ascii_case(email.trim())))
}

/// Índice absoluto (cabeçalho incluído) da primeira linha com o e-mail.
async fn indice_por_email<S: PlanilhaStore>(store: &S, email: &str) -> AppResult<Option<usize>> {
    let linhas = store.ler_linhas(ABA_USUARIOS).await?;
    Ok(linhas.iter().enumerate().skip(1).find_map(|(i, l)| {
        l.get(5)
            .filter(|e| e.trim().eq_ignore_ascii_case(email.trim()))
            .map(|_| i)
    }))
}

/// Cria um cadastro novo em estado PENDENTE, sujeito ao limite do admin.
pub async fn criar_conta<S: PlanilhaStore>(
    store: &S,
    mut conta: UserAccount,
) -> AppResult<ResultadoCadastro> {
    conta.email = conta.email.trim().to_lowercase();
    conta.status = StatusCadastro::Pendente;

    if buscar_por_email(store, &conta.email).await?.is_some() {
        tracing::warn!("Cadastro recusado: e-mail '{}' já existe.", conta.email);
        return Ok(ResultadoCadastro::EmailJaCadastrado);
    }

    if let Some(limite) = ler_limite_cadastros(store).await? {
        let existentes = store.ler_linhas(ABA_USUARIOS).await?.len().saturating_sub(1);
        if existentes >= limite {
            tracing::warn!(
                "Cadastro recusado: limite de {} cadastros atingido.",
                limite
            );
            return Ok(ResultadoCadastro::LimiteAtingido);
        }
    }

    store.anexar_linha(ABA_USUARIOS, conta.to_linha()).await?;
    tracing::info!("✅ Cadastro criado para '{}' (PENDENTE).", conta.email);
    Ok(ResultadoCadastro::Criado)
}

/// Muda o status de aprovação de um cadastro. O colaborador de persistência
/// não tem operação de update-in-place, então a linha antiga sai e a versão
/// nova entra no fim da aba (a ordem das contas não carrega significado).
pub async fn alterar_status<S: PlanilhaStore>(
    store: &S,
    email: &str,
    status: StatusCadastro,
) -> AppResult<bool> {
    let Some(indice) = indice_por_email(store, email).await? else {
        tracing::warn!("Alteração de status: '{}' não encontrado.", email);
        return Ok(false);
    };

    let linhas = store.ler_linhas(ABA_USUARIOS).await?;
    let Some(linha) = linhas.get(indice) else {
        return Ok(false);
    };
    let mut conta = UserAccount::from_linha(linha);
    conta.status = status;

    store.apagar_linha(ABA_USUARIOS, indice).await?;
    store.anexar_linha(ABA_USUARIOS, conta.to_linha()).await?;
    tracing::info!("Status de '{}' agora é {}.", email, status.as_str());
    Ok(true)
}

/// Apaga o cadastro (primeira linha que bate).
pub async fn apagar_conta<S: PlanilhaStore>(store: &S, email: &str) -> AppResult<bool> {
    let Some(indice) = indice_por_email(store, email).await? else {
        return Ok(false);
    };
    store.apagar_linha(ABA_USUARIOS, indice).await?;
    tracing::info!("Cadastro de '{}' apagado.", email);
    Ok(true)
}

/// Limite de cadastros configurado pelo admin; `None` = sem limite.
pub async fn ler_limite_cadastros<S: PlanilhaStore>(store: &S) -> AppResult<Option<usize>> {
    let linhas = store.ler_linhas(ABA_CONFIG).await?;
    Ok(linhas.iter().skip(1).find_map(|l| {
        if l.first().map(|c| c.trim()) == Some(CHAVE_LIMITE_CADASTROS) {
            l.get(1).and_then(|v| v.trim().parse().ok())
        } else {
            None
        }
    }))
}

pub async fn definir_limite_cadastros<S: PlanilhaStore>(
    store: &S,
    limite: usize,
) -> AppResult<()> {
    let linhas = store.ler_linhas(ABA_CONFIG).await?;
    let existente = linhas
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, l)| l.first().map(|c| c.trim()) == Some(CHAVE_LIMITE_CADASTROS))
        .map(|(i, _)| i);
    if let Some(indice) = existente {
        store.apagar_linha(ABA_CONFIG, indice).await?;
    }
    store
        .anexar_linha(
            ABA_CONFIG,
            vec![CHAVE_LIMITE_CADASTROS.to_string(), limite.to_string()],
        )
        .await?;
    tracing::info!("Limite de cadastros definido para {}.", limite);
    Ok(())
}
