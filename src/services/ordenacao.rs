// src/services/ordenacao.rs
//
// Normalização e ordenação da lista: resolve o drift de nomes de coluna
// das revisões antigas da planilha, atribui pesos de prioridade e produz
// a ordem total estável que vira a numeração de assentos.
use crate::models::inscricao::{
    Destino, Graduacao, Inscricao, InscricaoNumerada, FORMATO_DATA_HORA,
};
use chrono::NaiveDateTime;

/// Capacidade fixa do ônibus. Constante em todas as revisões observadas;
/// o limite configurável do admin só trava novos cadastros, nunca mexe na
/// numeração.
pub const LOTACAO_ONIBUS: usize = 38;

/// Nomes que a coluna de destino já teve ao longo das revisões da
/// planilha. Qualquer um deles resolve para o campo canónico.
const ALIASES_DESTINO: [&str; 5] = ["DESTINO/ORIGEM", "DESTINO", "DEST", "ORIGEM", "DESTINO/ORIG"];

/// Posições de cada campo canónico na linha crua, resolvidas a partir do
/// cabeçalho (com fallback para o layout posicional
/// `[data_hora, destino, graduacao, nome, lotacao, email]`).
#[derive(Debug, Clone, Copy)]
pub struct MapaColunas {
    pub data_hora: usize,
    pub destino: usize,
    pub graduacao: usize,
    pub nome: usize,
    pub lotacao: usize,
    pub email: usize,
}

impl Default for MapaColunas {
    fn default() -> MapaColunas {
        MapaColunas {
            data_hora: 0,
            destino: 1,
            graduacao: 2,
            nome: 3,
            lotacao: 4,
            email: 5,
        }
    }
}

fn procurar_coluna(cabecalho: &[String], nomes: &[&str]) -> Option<usize> {
    cabecalho.iter().position(|celula| {
        let celula = celula.trim().to_uppercase();
        nomes.iter().any(|n| celula == *n)
    })
}

/// Resolve as colunas pelo cabeçalho; o que não for encontrado fica na
/// posição canónica (as planilhas antigas não tinham cabeçalho confiável).
pub fn resolver_colunas(cabecalho: &[String]) -> MapaColunas {
    let padrao = MapaColunas::default();
    MapaColunas {
        data_hora: procurar_coluna(cabecalho, &["DATA/HORA", "DATA", "TIMESTAMP"])
            .unwrap_or(padrao.data_hora),
        destino: procurar_coluna(cabecalho, &ALIASES_DESTINO).unwrap_or(padrao.destino),
        graduacao: procurar_coluna(cabecalho, &["GRADUAÇÃO", "GRADUACAO", "POSTO"])
            .unwrap_or(padrao.graduacao),
        nome: procurar_coluna(cabecalho, &["NOME"]).unwrap_or(padrao.nome),
        lotacao: procurar_coluna(cabecalho, &["LOTAÇÃO", "LOTACAO"]).unwrap_or(padrao.lotacao),
        email: procurar_coluna(cabecalho, &["EMAIL", "E-MAIL"]).unwrap_or(padrao.email),
    }
}

pub fn parse_data_hora(texto: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(texto.trim(), FORMATO_DATA_HORA).ok()
}

/// Converte as linhas cruas (sem o cabeçalho) em inscrições canónicas.
/// Campo opcional em falta vira sentinela; linha sem nome E sem e-mail é
/// irrecuperável e cai fora. Nunca aborta a lista inteira.
pub fn normalizar(mapa: MapaColunas, linhas: &[Vec<String>]) -> Vec<Inscricao> {
    let mut inscricoes = Vec::with_capacity(linhas.len());
    for linha in linhas {
        let campo = |i: usize| linha.get(i).map(|c| c.trim().to_string()).unwrap_or_default();

        let nome = campo(mapa.nome);
        let email = campo(mapa.email);
        if nome.is_empty() && email.is_empty() {
            tracing::warn!("Linha sem nome e sem e-mail descartada: {:?}", linha);
            continue;
        }

        let data_hora_raw = campo(mapa.data_hora);
        let data_hora = parse_data_hora(&data_hora_raw);
        if data_hora.is_none() && !data_hora_raw.is_empty() {
            tracing::warn!("Data/hora ilegível ('{}'), ordena por último.", data_hora_raw);
        }

        let graduacao_raw = campo(mapa.graduacao);
        let destino_raw = campo(mapa.destino);
        inscricoes.push(Inscricao {
            data_hora,
            data_hora_raw,
            destino: Destino::parse(&destino_raw),
            destino_raw,
            graduacao: Graduacao::parse(&graduacao_raw),
            graduacao_raw,
            nome,
            lotacao: campo(mapa.lotacao),
            email,
        });
    }
    inscricoes
}

/// Ordem total estável: contratados depois de militares, depois destino,
/// depois graduação, depois hora de chegada (ilegível por último). Empates
/// exatos preservam a ordem de inserção (sort estável).
pub fn ordenar(mut inscricoes: Vec<Inscricao>) -> Vec<Inscricao> {
    inscricoes.sort_by_key(|i| {
        (
            i.graduacao.is_contratado(),
            i.destino.peso(),
            i.graduacao.peso(),
            i.data_hora.is_none(),
            i.data_hora,
        )
    });
    inscricoes
}

/// Conveniência usada pelo orquestrador: cabeçalho + linhas cruas → lista
/// canónica ordenada.
pub fn normalizar_e_ordenar(cabecalho: &[String], linhas: &[Vec<String>]) -> Vec<Inscricao> {
    ordenar(normalizar(resolver_colunas(cabecalho), linhas))
}

/// Rotulagem posicional pura: 1..38 numéricos, depois Exc-01, Exc-02, ...
pub fn numerar_assentos(ordenadas: Vec<Inscricao>) -> Vec<InscricaoNumerada> {
    ordenadas
        .into_iter()
        .enumerate()
        .map(|(i, inscricao)| {
            let excedente = i >= LOTACAO_ONIBUS;
            let assento = if excedente {
                format!("Exc-{:02}", i - LOTACAO_ONIBUS + 1)
            } else {
                (i + 1).to_string()
            };
            InscricaoNumerada {
                assento,
                excedente,
                inscricao,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cab() -> Vec<String> {
        ["DATA/HORA", "DESTINO/ORIGEM", "GRADUAÇÃO", "NOME", "LOTAÇÃO", "EMAIL"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn linha(ts: &str, destino: &str, grad: &str, nome: &str) -> Vec<String> {
        vec![
            ts.to_string(),
            destino.to_string(),
            grad.to_string(),
            nome.to_string(),
            "1ª CIA".to_string(),
            format!("{}@pm.rj.gov.br", nome.to_lowercase().replace(' ', ".")),
        ]
    }

    #[test]
    fn aliases_do_cabecalho_resolvem_a_coluna_de_destino() {
        for nome in ["DESTINO", "DESTINO/ORIGEM", "dest", "Origem"] {
            let cabecalho: Vec<String> = vec![
                "DATA/HORA".into(),
                nome.to_string(),
                "GRADUAÇÃO".into(),
                "NOME".into(),
                "LOTAÇÃO".into(),
                "EMAIL".into(),
            ];
            assert_eq!(resolver_colunas(&cabecalho).destino, 1, "alias {}", nome);
        }
    }

    #[test]
    fn cabecalho_irreconhecivel_cai_no_layout_posicional() {
        let mapa = resolver_colunas(&["A".to_string(), "B".to_string()]);
        assert_eq!(mapa.data_hora, 0);
        assert_eq!(mapa.destino, 1);
        assert_eq!(mapa.email, 5);
    }

    #[test]
    fn militar_antes_de_contratado_mesmo_destino() {
        let linhas = vec![
            linha("06/01/2025 08:00:00", "QG", "FC COM", "Contratado"),
            linha("06/01/2025 09:00:00", "QG", "SD", "Soldado"),
        ];
        let ordenadas = normalizar_e_ordenar(&cab(), &linhas);
        assert_eq!(ordenadas[0].nome, "Soldado");
        assert_eq!(ordenadas[1].nome, "Contratado");
    }

    #[test]
    fn destino_depois_graduacao_depois_hora() {
        let linhas = vec![
            linha("06/01/2025 07:00:00", "OUTROS", "TCEL", "A"),
            linha("06/01/2025 09:00:00", "QG", "SD", "B"),
            linha("06/01/2025 08:00:00", "QG", "SD", "C"),
            linha("06/01/2025 10:00:00", "QG", "CAP", "D"),
        ];
        let nomes: Vec<String> = normalizar_e_ordenar(&cab(), &linhas)
            .into_iter()
            .map(|i| i.nome)
            .collect();
        // QG antes de OUTROS; dentro de QG, CAP antes de SD; dentro de
        // SD, chegada mais cedo primeiro.
        assert_eq!(nomes, vec!["D", "C", "B", "A"]);
    }

    #[test]
    fn empate_total_preserva_ordem_de_chegada() {
        let linhas = vec![
            linha("06/01/2025 08:00:00", "QG", "SD", "Primeiro"),
            linha("06/01/2025 08:00:00", "QG", "SD", "Segundo"),
            linha("06/01/2025 08:00:00", "QG", "SD", "Terceiro"),
        ];
        let nomes: Vec<String> = normalizar_e_ordenar(&cab(), &linhas)
            .into_iter()
            .map(|i| i.nome)
            .collect();
        assert_eq!(nomes, vec!["Primeiro", "Segundo", "Terceiro"]);
    }

    #[test]
    fn data_ilegivel_ordena_por_ultimo_no_grupo_sem_abortar() {
        let linhas = vec![
            linha("data torta", "QG", "SD", "Torto"),
            linha("06/01/2025 08:00:00", "QG", "SD", "Certo"),
        ];
        let ordenadas = normalizar_e_ordenar(&cab(), &linhas);
        assert_eq!(ordenadas[0].nome, "Certo");
        assert_eq!(ordenadas[1].nome, "Torto");
        assert!(ordenadas[1].data_hora.is_none());
    }

    #[test]
    fn destino_em_falta_vira_sentinela_de_menor_prioridade() {
        let sem_destino = linha("06/01/2025 08:00:00", "", "SD", "SemDestino");
        let linhas = vec![
            sem_destino,
            linha("06/01/2025 09:00:00", "OUTROS", "SD", "ComDestino"),
        ];
        let ordenadas = normalizar_e_ordenar(&cab(), &linhas);
        assert_eq!(ordenadas[0].nome, "ComDestino");
        assert_eq!(ordenadas[1].destino, Destino::Desconhecido);
    }

    #[test]
    fn destino_nao_reconhecido_preserva_o_texto_original() {
        let linhas = vec![linha("06/01/2025 08:00:00", "Base Marambaia", "SD", "Fulano")];
        let ordenadas = normalizar_e_ordenar(&cab(), &linhas);
        assert_eq!(ordenadas[0].destino, Destino::Desconhecido);
        assert_eq!(ordenadas[0].destino_raw, "Base Marambaia");
    }

    #[test]
    fn linha_irrecuperavel_e_descartada() {
        let linhas = vec![
            vec!["06/01/2025 08:00:00".to_string(), "QG".to_string(), "SD".to_string()],
            linha("06/01/2025 09:00:00", "QG", "SD", "Valido"),
        ];
        let ordenadas = normalizar_e_ordenar(&cab(), &linhas);
        assert_eq!(ordenadas.len(), 1);
        assert_eq!(ordenadas[0].nome, "Valido");
    }

    #[test]
    fn cenario_c_quarenta_inscricoes_geram_dois_excedentes() {
        let linhas: Vec<Vec<String>> = (0..40)
            .map(|i| {
                linha(
                    &format!("06/01/2025 08:{:02}:00", i),
                    "QG",
                    "SD",
                    &format!("P{:02}", i),
                )
            })
            .collect();
        let numeradas = numerar_assentos(normalizar_e_ordenar(&cab(), &linhas));

        assert_eq!(numeradas.len(), 40);
        assert_eq!(numeradas[0].assento, "1");
        assert_eq!(numeradas[37].assento, "38");
        assert!(!numeradas[37].excedente);
        assert_eq!(numeradas[38].assento, "Exc-01");
        assert_eq!(numeradas[39].assento, "Exc-02");
        assert!(numeradas[39].excedente);
        // Ordem monotónica de chegada preservada.
        assert_eq!(numeradas[38].inscricao.nome, "P38");
    }

    #[test]
    fn lista_dentro_da_lotacao_nao_tem_excedente() {
        let linhas: Vec<Vec<String>> = (0..38)
            .map(|i| linha(&format!("06/01/2025 08:{:02}:00", i), "QG", "SD", &format!("P{}", i)))
            .collect();
        let numeradas = numerar_assentos(normalizar_e_ordenar(&cab(), &linhas));
        assert!(numeradas.iter().all(|n| !n.excedente));
        assert_eq!(numeradas.last().unwrap().assento, "38");
    }
}
