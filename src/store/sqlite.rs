// src/store/sqlite.rs
//
// Backing de produção: cada aba da planilha vive na tabela `planilha`
// como linhas posicionais serializadas em JSON, mantendo o mesmo contrato
// (cabeçalho no índice 0) que o serviço remoto real.
use crate::store::{PlanilhaStore, StoreError};
use sqlx::{Row, SqlitePool};

#[derive(Debug, Clone)]
pub struct SqliteSheetStore {
    pool: SqlitePool,
}

impl SqliteSheetStore {
    pub fn new(pool: SqlitePool) -> SqliteSheetStore {
        SqliteSheetStore { pool }
    }

    /// Garante que a aba existe com o cabeçalho no índice 0 (chamado uma
    /// vez no arranque para cada aba fixa).
    pub async fn garantir_cabecalho(
        &self,
        aba: &str,
        cabecalho: &[&str],
    ) -> Result<(), StoreError> {
        let existentes: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM planilha WHERE aba = ?")
                .bind(aba)
                .fetch_one(&self.pool)
                .await?;
        if existentes == 0 {
            tracing::info!("Criando aba '{}' com cabeçalho.", aba);
            let linha: Vec<String> = cabecalho.iter().map(|c| c.to_string()).collect();
            self.inserir(aba, 0, &linha).await?;
        }
        Ok(())
    }

    async fn inserir(&self, aba: &str, idx: i64, valores: &[String]) -> Result<(), StoreError> {
        let json = serde_json::to_string(valores)
            .map_err(|e| StoreError::Indisponivel(format!("serialização da linha: {}", e)))?;
        sqlx::query("INSERT INTO planilha (aba, idx, linha) VALUES (?, ?, ?)")
            .bind(aba)
            .bind(idx)
            .bind(json)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

impl PlanilhaStore for SqliteSheetStore {
    async fn ler_linhas(&self, aba: &str) -> Result<Vec<Vec<String>>, StoreError> {
        let registos =
            sqlx::query("SELECT linha FROM planilha WHERE aba = ? ORDER BY idx ASC")
                .bind(aba)
                .fetch_all(&self.pool)
                .await?;

        let mut linhas = Vec::with_capacity(registos.len());
        for registo in registos {
            let json: String = registo.try_get("linha")?;
            let valores: Vec<String> = serde_json::from_str(&json).map_err(|e| {
                StoreError::Indisponivel(format!("linha corrompida na aba '{}': {}", aba, e))
            })?;
            linhas.push(valores);
        }
        Ok(linhas)
    }

    async fn anexar_linha(&self, aba: &str, valores: Vec<String>) -> Result<(), StoreError> {
        let proximo: i64 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(idx) + 1, 0) FROM planilha WHERE aba = ?",
        )
        .bind(aba)
        .fetch_one(&self.pool)
        .await?;
        self.inserir(aba, proximo, &valores).await
    }

    async fn apagar_linha(&self, aba: &str, indice: usize) -> Result<(), StoreError> {
        let indice = indice as i64;
        let mut tx = self.pool.begin().await?;

        let apagadas = sqlx::query("DELETE FROM planilha WHERE aba = ? AND idx = ?")
            .bind(aba)
            .bind(indice)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if apagadas == 0 {
            return Err(StoreError::Indisponivel(format!(
                "índice {} fora da aba '{}'",
                indice, aba
            )));
        }

        // Reindexa as linhas seguintes para manter índices contíguos,
        // como a remoção de linha da planilha real faz.
        sqlx::query("UPDATE planilha SET idx = idx - 1 WHERE aba = ? AND idx > ?")
            .bind(aba)
            .bind(indice)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn truncar_e_redimensionar(
        &self,
        aba: &str,
        linhas_reserva: usize,
    ) -> Result<(), StoreError> {
        // A reserva de capacidade é um artefacto do resize da grelha
        // remota; localmente basta deixar o cabeçalho.
        tracing::info!(
            "Truncando aba '{}' (reserva de {} linhas).",
            aba,
            linhas_reserva
        );
        sqlx::query("DELETE FROM planilha WHERE aba = ? AND idx > 0")
            .bind(aba)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
