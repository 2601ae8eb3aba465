// src/store/mod.rs
//
// Colaborador de persistência: a "planilha" partilhada que guarda tanto a
// lista de presença como os cadastros. As operações são as mesmas que o
// serviço remoto real expõe (linha 0 é sempre o cabeçalho, colunas
// posicionais) e qualquer uma delas pode falhar com limite de requisições.
pub mod retry;
pub mod sqlite;

#[cfg(test)]
pub mod mem;

use std::future::Future;
use thiserror::Error;

// Abas fixas da planilha.
pub const ABA_PRESENCA: &str = "presenca";
pub const ABA_USUARIOS: &str = "usuarios";
pub const ABA_CONFIG: &str = "config";

/// Cabeçalho canónico da aba de presença (layout posicional de 6 campos).
pub const CABECALHO_PRESENCA: [&str; 6] = [
    "DATA/HORA",
    "DESTINO/ORIGEM",
    "GRADUAÇÃO",
    "NOME",
    "LOTAÇÃO",
    "EMAIL",
];

/// Cabeçalho canónico da aba de cadastros (8 campos).
pub const CABECALHO_USUARIOS: [&str; 8] = [
    "NOME",
    "GRADUAÇÃO",
    "LOTAÇÃO",
    "SENHA",
    "DESTINO PADRÃO",
    "EMAIL",
    "TELEFONE",
    "STATUS",
];

pub const CABECALHO_CONFIG: [&str; 2] = ["CHAVE", "VALOR"];

/// Quantidade de linhas em branco que a planilha real recebe ao ser
/// redimensionada depois de um reset de ciclo.
pub const LINHAS_RESERVA: usize = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    /// O serviço remoto recusou por excesso de requisições; o decorador de
    /// retry trata desta variante antes de ela chegar ao utilizador.
    #[error("limite de requisições da planilha atingido")]
    RateLimited,

    #[error("planilha indisponível: {0}")]
    Indisponivel(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Indisponivel(e.to_string())
    }
}

/// Operações abstratas sobre uma aba da planilha.
///
/// Os serviços são genéricos sobre este trait; em produção o backing é
/// SQLite ([`sqlite::SqliteSheetStore`]) envolvido no decorador de retry
/// ([`retry::ComRetry`]), e nos testes um store em memória.
pub trait PlanilhaStore: Send + Sync {
    /// Devolve todas as linhas da aba, cabeçalho incluído (índice 0).
    fn ler_linhas(
        &self,
        aba: &str,
    ) -> impl Future<Output = Result<Vec<Vec<String>>, StoreError>> + Send;

    /// Acrescenta uma linha no fim da aba.
    fn anexar_linha(
        &self,
        aba: &str,
        valores: Vec<String>,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Apaga exatamente a linha no índice absoluto dado (0 = cabeçalho).
    fn apagar_linha(
        &self,
        aba: &str,
        indice: usize,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Trunca a aba deixando só o cabeçalho e volta a reservar capacidade
    /// para `linhas_reserva` linhas (na planilha real isto é um resize da
    /// grelha; nos backings locais a reserva é implícita).
    fn truncar_e_redimensionar(
        &self,
        aba: &str,
        linhas_reserva: usize,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
