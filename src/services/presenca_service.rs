// src/services/presenca_service.rs
//
// Orquestrador da lista de presença: coordena ler → decidir-reset →
// resetar-ou-anexar/remover → reler contra o colaborador de persistência.
// As regras de negócio (janela fechada, inscrição duplicada, remoção de
// registo inexistente) voltam como resultados explícitos, nunca como erro.
use crate::{
    error::AppResult,
    models::{inscricao::{InscricaoNumerada, FORMATO_DATA_HORA}, user::UserAccount},
    services::{ciclo, ordenacao},
    store::{PlanilhaStore, ABA_PRESENCA, LINHAS_RESERVA},
};
use chrono::NaiveDateTime;

/// Resultado de uma tentativa de inscrição.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultadoInscricao {
    Registrada,
    JaInscrito,
    ForaDoHorario,
}

/// Resultado de uma remoção (auto-retirada ou ação do admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultadoRemocao {
    Removida,
    NaoEncontrada,
}

/// A lista do ciclo corrente, já pronta para exibição/exportação.
#[derive(Debug, Clone)]
pub struct RosterAtual {
    pub inscricoes_abertas: bool,
    pub inscricoes: Vec<InscricaoNumerada>,
}

/// Data/hora do ÚLTIMO registo da aba, se existir e for legível. Ilegível
/// vira `None`, o que suprime o reset (nunca destruir por palpite).
fn ultima_data_hora(linhas: &[Vec<String>]) -> Option<NaiveDateTime> {
    if linhas.len() <= 1 {
        return None;
    }
    let mapa = ordenacao::resolver_colunas(&linhas[0]);
    let ultima = linhas.last()?;
    let texto = ultima.get(mapa.data_hora)?;
    ordenacao::parse_data_hora(texto)
}

/// Verifica o relógio e, se o ciclo virou, zera a lista (trunca até o
/// cabeçalho e devolve a reserva de capacidade). Idempotente: logo após um
/// reset a aba só tem cabeçalho, e a chamada seguinte é um no-op.
///
/// DEVE rodar antes de qualquer inscrição, remoção ou leitura para
/// exibição, para que um pedido em cima da virada veja a lista nova.
pub async fn talvez_resetar_ciclo<S: PlanilhaStore>(
    store: &S,
    agora: NaiveDateTime,
) -> AppResult<bool> {
    let linhas = store.ler_linhas(ABA_PRESENCA).await?;
    let relogio = ciclo::avaliar_relogio(agora, ultima_data_hora(&linhas));
    if !relogio.reset_pendente {
        return Ok(false);
    }

    tracing::info!(
        "Virada de ciclo detectada ({} registos do ciclo anterior), zerando lista.",
        linhas.len().saturating_sub(1)
    );
    store
        .truncar_e_redimensionar(ABA_PRESENCA, LINHAS_RESERVA)
        .await?;
    Ok(true)
}

/// Lê a lista do ciclo corrente, normalizada, ordenada e numerada.
/// O reset é avaliado e aplicado ANTES da leitura, sempre.
pub async fn carregar_roster<S: PlanilhaStore>(
    store: &S,
    agora: NaiveDateTime,
) -> AppResult<RosterAtual> {
    talvez_resetar_ciclo(store, agora).await?;

    let linhas = store.ler_linhas(ABA_PRESENCA).await?;
    let (cabecalho, dados) = match linhas.split_first() {
        Some((c, d)) => (c.clone(), d.to_vec()),
        None => (Vec::new(), Vec::new()),
    };
    let ordenadas = ordenacao::normalizar_e_ordenar(&cabecalho, &dados);

    Ok(RosterAtual {
        inscricoes_abertas: ciclo::inscricoes_abertas(agora),
        inscricoes: ordenacao::numerar_assentos(ordenadas),
    })
}

/// Inscreve o titular do cadastro no ciclo corrente.
///
/// Pré-condições, nesta ordem: reset aplicado, janela aberta, e-mail ainda
/// não presente na lista (varredura linear da lista normalizada). O efeito
/// é exatamente UM append, copiando os campos do cadastro.
pub async fn inscrever<S: PlanilhaStore>(
    store: &S,
    agora: NaiveDateTime,
    conta: &UserAccount,
) -> AppResult<ResultadoInscricao> {
    talvez_resetar_ciclo(store, agora).await?;

    if !ciclo::inscricoes_abertas(agora) {
        tracing::debug!("Inscrição de '{}' recusada: fora do horário.", conta.email);
        return Ok(ResultadoInscricao::ForaDoHorario);
    }

    let linhas = store.ler_linhas(ABA_PRESENCA).await?;
    let (cabecalho, dados) = match linhas.split_first() {
        Some((c, d)) => (c.clone(), d.to_vec()),
        None => (Vec::new(), Vec::new()),
    };
    let atuais = ordenacao::normalizar(ordenacao::resolver_colunas(&cabecalho), &dados);
    if atuais
        .iter()
        .any(|i| !i.email.is_empty() && i.email.eq_ignore_ascii_case(&conta.email))
    {
        tracing::debug!("Inscrição de '{}' recusada: já está na lista.", conta.email);
        return Ok(ResultadoInscricao::JaInscrito);
    }

    store
        .anexar_linha(
            ABA_PRESENCA,
            vec![
                agora.format(FORMATO_DATA_HORA).to_string(),
                conta.destino_padrao.clone(),
                conta.graduacao.clone(),
                conta.nome.clone(),
                conta.lotacao.clone(),
                conta.email.clone(),
            ],
        )
        .await?;
    tracing::info!("✅ Presença registrada para '{}'.", conta.email);
    Ok(ResultadoInscricao::Registrada)
}

/// Remove a PRIMEIRA linha crua cujo e-mail bate (contrato explícito para
/// as linhas duplicadas herdadas das revisões sem chave de identidade).
/// Atua sobre a lista crua, não sobre a visão ordenada.
///
/// Como na inscrição, a virada de ciclo é aplicada ANTES de procurar o
/// registo: um pedido em cima da marca nunca remove de uma lista velha.
pub async fn remover<S: PlanilhaStore>(
    store: &S,
    agora: NaiveDateTime,
    email: &str,
) -> AppResult<ResultadoRemocao> {
    talvez_resetar_ciclo(store, agora).await?;

    let linhas = store.ler_linhas(ABA_PRESENCA).await?;
    if linhas.is_empty() {
        return Ok(ResultadoRemocao::NaoEncontrada);
    }
    let mapa = ordenacao::resolver_colunas(&linhas[0]);

    for (indice, linha) in linhas.iter().enumerate().skip(1) {
        let bate = linha
            .get(mapa.email)
            .map(|e| e.trim().eq_ignore_ascii_case(email.trim()))
            .unwrap_or(false);
        if bate {
            store.apagar_linha(ABA_PRESENCA, indice).await?;
            tracing::info!("Registo de '{}' removido da lista (linha {}).", email, indice);
            return Ok(ResultadoRemocao::Removida);
        }
    }

    tracing::debug!("Remoção de '{}': nenhum registo na lista.", email);
    Ok(ResultadoRemocao::NaoEncontrada)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::StatusCadastro;
    use crate::store::{mem::MemStore, CABECALHO_PRESENCA};
    use chrono::NaiveDate;

    fn dt(dia: u32, hora: u32, minuto: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, dia)
            .unwrap()
            .and_hms_opt(hora, minuto, 0)
            .unwrap()
    }

    fn store_presenca() -> MemStore {
        MemStore::nova(&[(
            ABA_PRESENCA,
            CABECALHO_PRESENCA.iter().map(|c| c.to_string()).collect(),
        )])
    }

    fn conta(email: &str) -> UserAccount {
        UserAccount {
            nome: "Fulano de Tal".into(),
            graduacao: "3ºSGT".into(),
            lotacao: "1ª CIA".into(),
            senha_hash: String::new(),
            destino_padrao: "QG".into(),
            email: email.into(),
            telefone: String::new(),
            status: StatusCadastro::Ativo,
        }
    }

    // Terça-feira 10:00 — janela aberta.
    const ABERTO: (u32, u32, u32) = (7, 10, 0);

    #[tokio::test]
    async fn inscricao_copia_o_cadastro_e_regista_uma_linha() {
        let store = store_presenca();
        let agora = dt(ABERTO.0, ABERTO.1, ABERTO.2);

        let r = inscrever(&store, agora, &conta("a@x.br")).await.unwrap();
        assert_eq!(r, ResultadoInscricao::Registrada);

        let linhas = store.ler_linhas(ABA_PRESENCA).await.unwrap();
        assert_eq!(linhas.len(), 2);
        assert_eq!(linhas[1][0], "07/01/2025 10:00:00");
        assert_eq!(linhas[1][1], "QG");
        assert_eq!(linhas[1][5], "a@x.br");
    }

    #[tokio::test]
    async fn cenario_e_duplicado_nao_anexa_linha() {
        let store = store_presenca();
        let agora = dt(ABERTO.0, ABERTO.1, ABERTO.2);

        inscrever(&store, agora, &conta("a@x.br")).await.unwrap();
        let r = inscrever(&store, agora, &conta("A@X.BR")).await.unwrap();
        assert_eq!(r, ResultadoInscricao::JaInscrito);

        let linhas = store.ler_linhas(ABA_PRESENCA).await.unwrap();
        assert_eq!(linhas.len(), 2, "nenhuma linha extra pode ser anexada");
    }

    #[tokio::test]
    async fn fora_do_horario_nao_escreve() {
        let store = store_presenca();
        // Terça 05:30 — janela de conferência.
        let r = inscrever(&store, dt(7, 5, 30), &conta("a@x.br")).await.unwrap();
        assert_eq!(r, ResultadoInscricao::ForaDoHorario);
        assert_eq!(store.ler_linhas(ABA_PRESENCA).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reset_roda_antes_da_inscricao_na_virada() {
        let store = store_presenca();
        // Registo do ciclo da manhã...
        inscrever(&store, dt(7, 10, 0), &conta("velho@x.br")).await.unwrap();
        // ...e uma inscrição às 19:05, depois da marca de 18:50: a lista
        // zera primeiro e o novo registo entra numa lista limpa.
        let r = inscrever(&store, dt(7, 19, 5), &conta("novo@x.br")).await.unwrap();
        assert_eq!(r, ResultadoInscricao::Registrada);

        let linhas = store.ler_linhas(ABA_PRESENCA).await.unwrap();
        assert_eq!(linhas.len(), 2);
        assert_eq!(linhas[1][5], "novo@x.br");
        assert_eq!(store.truncamentos(), 1);
    }

    #[tokio::test]
    async fn reset_e_idempotente() {
        let store = store_presenca();
        inscrever(&store, dt(7, 10, 0), &conta("a@x.br")).await.unwrap();

        // Primeira chamada depois da virada da noite: zera.
        assert!(talvez_resetar_ciclo(&store, dt(7, 19, 0)).await.unwrap());
        // Segunda chamada imediata: lista vazia, nada a fazer.
        assert!(!talvez_resetar_ciclo(&store, dt(7, 19, 0)).await.unwrap());
        assert_eq!(store.truncamentos(), 1);
    }

    #[tokio::test]
    async fn lista_com_ultimo_timestamp_ilegivel_nao_e_zerada() {
        let store = store_presenca();
        store
            .anexar_linha(
                ABA_PRESENCA,
                vec![
                    "isto não é data".into(),
                    "QG".into(),
                    "SD".into(),
                    "Fulano".into(),
                    "1ª CIA".into(),
                    "f@x.br".into(),
                ],
            )
            .await
            .unwrap();

        assert!(!talvez_resetar_ciclo(&store, dt(7, 19, 0)).await.unwrap());
        assert_eq!(store.truncamentos(), 0);
    }

    #[tokio::test]
    async fn remover_apaga_so_a_primeira_linha_duplicada() {
        let store = store_presenca();
        for marca in ["08:00:00", "09:00:00"] {
            store
                .anexar_linha(
                    ABA_PRESENCA,
                    vec![
                        format!("07/01/2025 {}", marca),
                        "QG".into(),
                        "SD".into(),
                        "Fulano".into(),
                        "1ª CIA".into(),
                        "dup@x.br".into(),
                    ],
                )
                .await
                .unwrap();
        }

        let r = remover(&store, dt(7, 10, 0), "dup@x.br").await.unwrap();
        assert_eq!(r, ResultadoRemocao::Removida);

        let linhas = store.ler_linhas(ABA_PRESENCA).await.unwrap();
        assert_eq!(linhas.len(), 2, "só a primeira duplicada sai");
        assert_eq!(linhas[1][0], "07/01/2025 09:00:00");
    }

    #[tokio::test]
    async fn remover_inexistente_devolve_nao_encontrada() {
        let store = store_presenca();
        let r = remover(&store, dt(7, 10, 0), "ninguem@x.br").await.unwrap();
        assert_eq!(r, ResultadoRemocao::NaoEncontrada);
    }

    #[tokio::test]
    async fn reset_roda_antes_da_remocao_na_virada() {
        let store = store_presenca();
        // Registo do ciclo da manhã...
        inscrever(&store, dt(7, 10, 0), &conta("velho@x.br")).await.unwrap();

        // ...e uma remoção às 19:05, depois da marca de 18:50: a lista
        // zera primeiro, e o registo velho já não está lá para remover.
        let r = remover(&store, dt(7, 19, 5), "velho@x.br").await.unwrap();
        assert_eq!(r, ResultadoRemocao::NaoEncontrada);
        assert_eq!(store.truncamentos(), 1);
        assert_eq!(store.ler_linhas(ABA_PRESENCA).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn carregar_roster_ordena_e_numera() {
        let store = store_presenca();
        let agora = dt(7, 10, 0);
        // Contratado inscrito primeiro, militar depois: a ordem final
        // ignora a chegada e respeita a prioridade.
        let mut fc = conta("fc@x.br");
        fc.graduacao = "FC TER".into();
        inscrever(&store, dt(7, 9, 0), &fc).await.unwrap();
        inscrever(&store, agora, &conta("sgt@x.br")).await.unwrap();

        let roster = carregar_roster(&store, agora).await.unwrap();
        assert!(roster.inscricoes_abertas);
        assert_eq!(roster.inscricoes.len(), 2);
        assert_eq!(roster.inscricoes[0].inscricao.email, "sgt@x.br");
        assert_eq!(roster.inscricoes[0].assento, "1");
        assert_eq!(roster.inscricoes[1].inscricao.email, "fc@x.br");
    }

    #[tokio::test]
    async fn inscricao_logo_apos_reset_passa_no_teste_de_duplicado() {
        let store = store_presenca();
        inscrever(&store, dt(7, 10, 0), &conta("a@x.br")).await.unwrap();

        // O mesmo e-mail consegue se inscrever no ciclo seguinte.
        let r = inscrever(&store, dt(7, 19, 30), &conta("a@x.br")).await.unwrap();
        assert_eq!(r, ResultadoInscricao::Registrada);
        assert_eq!(store.truncamentos(), 1);
    }
}
