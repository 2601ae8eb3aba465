// src/store/mem.rs
//
// Backing em memória usado apenas nos testes: comporta-se como a planilha
// (cabeçalho na linha 0, colunas posicionais) e permite injetar falhas de
// rate limit e contar operações destrutivas.
use crate::store::{PlanilhaStore, StoreError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct MemStore {
    abas: Mutex<HashMap<String, Vec<Vec<String>>>>,
    rate_limits_pendentes: AtomicU32,
    operacoes: AtomicU32,
    truncamentos: AtomicU32,
}

impl MemStore {
    /// Cria o store com as abas dadas, cada uma apenas com o cabeçalho.
    pub fn nova(abas: &[(&str, Vec<String>)]) -> MemStore {
        let store = MemStore::default();
        {
            let mut mapa = store.abas.lock().unwrap();
            for (aba, cabecalho) in abas {
                mapa.insert(aba.to_string(), vec![cabecalho.clone()]);
            }
        }
        store
    }

    /// As próximas `n` operações falham com `RateLimited`.
    pub fn injetar_rate_limits(&self, n: u32) {
        self.rate_limits_pendentes.store(n, Ordering::SeqCst);
    }

    /// Total de operações executadas (falhadas incluídas).
    pub fn operacoes(&self) -> u32 {
        self.operacoes.load(Ordering::SeqCst)
    }

    /// Quantas vezes a aba foi truncada (para testar idempotência do reset).
    pub fn truncamentos(&self) -> u32 {
        self.truncamentos.load(Ordering::SeqCst)
    }

    fn tocar(&self) -> Result<(), StoreError> {
        self.operacoes.fetch_add(1, Ordering::SeqCst);
        let pendentes = self.rate_limits_pendentes.load(Ordering::SeqCst);
        if pendentes > 0 {
            self.rate_limits_pendentes.store(pendentes - 1, Ordering::SeqCst);
            return Err(StoreError::RateLimited);
        }
        Ok(())
    }
}

impl PlanilhaStore for MemStore {
    async fn ler_linhas(&self, aba: &str) -> Result<Vec<Vec<String>>, StoreError> {
        self.tocar()?;
        let mapa = self.abas.lock().unwrap();
        mapa.get(aba)
            .cloned()
            .ok_or_else(|| StoreError::Indisponivel(format!("aba '{}' não existe", aba)))
    }

    async fn anexar_linha(&self, aba: &str, valores: Vec<String>) -> Result<(), StoreError> {
        self.tocar()?;
        let mut mapa = self.abas.lock().unwrap();
        let linhas = mapa
            .get_mut(aba)
            .ok_or_else(|| StoreError::Indisponivel(format!("aba '{}' não existe", aba)))?;
        linhas.push(valores);
        Ok(())
    }

    async fn apagar_linha(&self, aba: &str, indice: usize) -> Result<(), StoreError> {
        self.tocar()?;
        let mut mapa = self.abas.lock().unwrap();
        let linhas = mapa
            .get_mut(aba)
            .ok_or_else(|| StoreError::Indisponivel(format!("aba '{}' não existe", aba)))?;
        if indice >= linhas.len() {
            return Err(StoreError::Indisponivel(format!(
                "índice {} fora da aba '{}'",
                indice, aba
            )));
        }
        linhas.remove(indice);
        Ok(())
    }

    async fn truncar_e_redimensionar(
        &self,
        aba: &str,
        _linhas_reserva: usize,
    ) -> Result<(), StoreError> {
        self.tocar()?;
        self.truncamentos.fetch_add(1, Ordering::SeqCst);
        let mut mapa = self.abas.lock().unwrap();
        let linhas = mapa
            .get_mut(aba)
            .ok_or_else(|| StoreError::Indisponivel(format!("aba '{}' não existe", aba)))?;
        linhas.truncate(1); // só o cabeçalho sobrevive
        Ok(())
    }
}
