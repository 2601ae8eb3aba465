// src/services/export_service.rs
//
// Formatação de exportações a partir da lista final numerada: o resumo em
// texto para WhatsApp (e o deep-link correspondente) e o documento tabular
// da versão de impressão. Nenhuma função aqui altera a ordem ou a
// numeração — só consomem o roster pronto.
use crate::models::inscricao::InscricaoNumerada;

/// Cabeçalho fixo do documento de impressão.
pub const COLUNAS_IMPRESSAO: [&str; 6] = [
    "Nº",
    "DATA/HORA",
    "DESTINO/ORIGEM",
    "GRADUAÇÃO",
    "NOME",
    "LOTAÇÃO",
];

/// Documento tabular pronto para a página de impressão (impressao.html).
#[derive(Debug, Clone)]
pub struct DocumentoRoster {
    pub colunas: [&'static str; 6],
    pub linhas: Vec<[String; 6]>,
}

pub fn documento_impressao(inscricoes: &[InscricaoNumerada]) -> DocumentoRoster {
    DocumentoRoster {
        colunas: COLUNAS_IMPRESSAO,
        linhas: inscricoes
            .iter()
            .map(|n| {
                [
                    n.assento.clone(),
                    n.inscricao.data_hora_raw.clone(),
                    n.inscricao.destino_raw.clone(),
                    n.inscricao.graduacao_raw.clone(),
                    n.inscricao.nome.clone(),
                    n.inscricao.lotacao.clone(),
                ]
            })
            .collect(),
    }
}

/// Resumo em texto simples: uma linha `"{assento}. {graduação} {nome}"`
/// por inscrito, na ordem final.
pub fn texto_whatsapp(inscricoes: &[InscricaoNumerada]) -> String {
    inscricoes
        .iter()
        .map(|n| {
            format!(
                "{}. {} {}",
                n.assento, n.inscricao.graduacao_raw, n.inscricao.nome
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Deep-link de partilha com o resumo percent-encoded.
pub fn link_whatsapp(inscricoes: &[InscricaoNumerada]) -> String {
    format!(
        "https://wa.me/?text={}",
        urlencoding::encode(&texto_whatsapp(inscricoes))
    )
}
