// src/services/ciclo.rs
//
// Avaliador puro de relógio do ciclo: decide, para um instante dado, se as
// inscrições estão abertas e se a lista do ciclo anterior ficou para trás
// e precisa ser zerada. Nenhuma função aqui toca na planilha.
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};

/// Resultado da avaliação do relógio para um instante.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelogioCiclo {
    pub inscricoes_abertas: bool,
    pub reset_pendente: bool,
}

/// Marcas diárias de virada de ciclo (06:50 e 18:50, hora local).
const MARCA_MANHA: (u32, u32) = (6, 50);
const MARCA_NOITE: (u32, u32) = (18, 50);

fn seg(hora: u32, minuto: u32) -> u32 {
    hora * 3600 + minuto * 60
}

/// Janela de inscrições por dia da semana (hora local, sem feriados).
///
/// Sexta-feira segue a leitura estrita: aberta apenas 07:00–17:00. A
/// janela pré-05:00 que algumas revisões da lista permitiam na sexta não
/// é honrada aqui (decisão registada no DESIGN.md).
pub fn inscricoes_abertas(agora: NaiveDateTime) -> bool {
    let s = agora.time().num_seconds_from_midnight();
    match agora.weekday() {
        Weekday::Sun => s >= seg(19, 0),
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu => {
            // Fechado só nas duas janelas de conferência.
            let conferencia_manha = s >= seg(5, 0) && s < seg(7, 0);
            let conferencia_tarde = s >= seg(17, 0) && s < seg(19, 0);
            !(conferencia_manha || conferencia_tarde)
        }
        Weekday::Fri => s >= seg(7, 0) && s < seg(17, 0),
        // Sábado é a continuação do serviço de sexta à noite.
        Weekday::Sat => s < seg(5, 0),
    }
}

fn marca(dia: NaiveDate, (hora, minuto): (u32, u32)) -> NaiveDateTime {
    // 06:50 e 18:50 existem em qualquer dia
    dia.and_hms_opt(hora, minuto, 0).expect("marca de ciclo válida")
}

/// Início do ciclo corrente: a mais recente das marcas {hoje 06:50,
/// hoje 18:50, ontem 18:50} que não esteja no futuro. No instante exato
/// da marca (`agora == marca`), a marca já conta como corrente.
pub fn marco_ciclo_atual(agora: NaiveDateTime) -> NaiveDateTime {
    let hoje = agora.date();
    let ontem_noite = marca(hoje - Duration::days(1), MARCA_NOITE);
    [marca(hoje, MARCA_MANHA), marca(hoje, MARCA_NOITE), ontem_noite]
        .into_iter()
        .filter(|m| *m <= agora)
        .max()
        // ontem 18:50 nunca está no futuro, então sempre há candidato
        .unwrap_or(ontem_noite)
}

/// Avalia o relógio contra o último registo da lista.
///
/// `ultimo = None` cobre tanto a lista vazia quanto um último timestamp
/// ilegível: nos dois casos não há como afirmar que a lista está velha, e
/// o reset é suprimido (falhar seguro, nunca destrutivo). Um registo
/// carimbado exatamente na marca NÃO é velho (comparação estrita).
pub fn avaliar_relogio(agora: NaiveDateTime, ultimo: Option<NaiveDateTime>) -> RelogioCiclo {
    let marco = marco_ciclo_atual(agora);
    RelogioCiclo {
        inscricoes_abertas: inscricoes_abertas(agora),
        reset_pendente: ultimo.map(|u| u < marco).unwrap_or(false),
    }
}
