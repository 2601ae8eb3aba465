// src/store/retry.rs
use crate::store::{PlanilhaStore, StoreError};
use std::future::Future;
use std::time::Duration;

/// Decorador que aplica retry com backoff exponencial a TODAS as operações
/// de um [`PlanilhaStore`]. Só `RateLimited` é repetido; qualquer outro
/// erro sobe imediatamente. Esgotado o orçamento de tentativas, o último
/// `RateLimited` sobe para o chamador.
#[derive(Debug, Clone)]
pub struct ComRetry<S> {
    interno: S,
    tentativas: u32,
    espera_base: Duration,
}

impl<S: PlanilhaStore> ComRetry<S> {
    pub fn new(interno: S) -> ComRetry<S> {
        ComRetry::com_politica(interno, 5, Duration::from_millis(300))
    }

    /// Política explícita (os testes usam espera zero).
    pub fn com_politica(interno: S, tentativas: u32, espera_base: Duration) -> ComRetry<S> {
        ComRetry {
            interno,
            tentativas: tentativas.max(1),
            espera_base,
        }
    }

    async fn executar<T, F, Fut>(&self, operacao: &str, mut f: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        let mut espera = self.espera_base;
        let mut tentativa = 1u32;
        loop {
            match f().await {
                Err(StoreError::RateLimited) if tentativa < self.tentativas => {
                    tracing::warn!(
                        "Planilha limitou '{}' (tentativa {}/{}), aguardando {:?}...",
                        operacao,
                        tentativa,
                        self.tentativas,
                        espera
                    );
                    tokio::time::sleep(espera).await;
                    espera = espera.saturating_mul(2);
                    tentativa += 1;
                }
                Err(e @ StoreError::RateLimited) => {
                    tracing::error!(
                        "Orçamento de retry esgotado para '{}' ({} tentativas).",
                        operacao,
                        self.tentativas
                    );
                    return Err(e);
                }
                resultado => return resultado,
            }
        }
    }
}

impl<S: PlanilhaStore> PlanilhaStore for ComRetry<S> {
    async fn ler_linhas(&self, aba: &str) -> Result<Vec<Vec<String>>, StoreError> {
        self.executar("ler_linhas", || self.interno.ler_linhas(aba))
            .await
    }

    async fn anexar_linha(&self, aba: &str, valores: Vec<String>) -> Result<(), StoreError> {
        self.executar("anexar_linha", || {
            self.interno.anexar_linha(aba, valores.clone())
        })
        .await
    }

    async fn apagar_linha(&self, aba: &str, indice: usize) -> Result<(), StoreError> {
        self.executar("apagar_linha", || self.interno.apagar_linha(aba, indice))
            .await
    }

    async fn truncar_e_redimensionar(
        &self,
        aba: &str,
        linhas_reserva: usize,
    ) -> Result<(), StoreError> {
        self.executar("truncar_e_redimensionar", || {
            self.interno.truncar_e_redimensionar(aba, linhas_reserva)
        })
        .await
    }
}
