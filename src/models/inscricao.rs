// src/models/inscricao.rs
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Formato de data/hora gravado na planilha (dia primeiro, como nas
/// revisões originais da lista).
pub const FORMATO_DATA_HORA: &str = "%d/%m/%Y %H:%M:%S";

/// Destino/origem do passageiro na rota. Conjunto fechado; qualquer valor
/// não reconhecido cai em `Desconhecido` e ordena por último.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Destino {
    Qg,
    Rmcf,
    Outros,
    Desconhecido,
}

impl Destino {
    /// Interpreta o valor vindo da planilha (tolerante a caixa e espaços).
    pub fn parse(valor: &str) -> Destino {
        match valor.trim().to_uppercase().as_str() {
            "QG" => Destino::Qg,
            "RMCF" => Destino::Rmcf,
            "OUTROS" => Destino::Outros,
            _ => Destino::Desconhecido,
        }
    }

    /// Peso de ordenação: QG < RMCF < OUTROS < desconhecido.
    pub fn peso(&self) -> u8 {
        match self {
            Destino::Qg => 0,
            Destino::Rmcf => 1,
            Destino::Outros => 2,
            Destino::Desconhecido => 3,
        }
    }

}

/// Graduação (posto militar ou categoria de funcionário civil contratado).
///
/// A escada de pesos segue a hierarquia: TCEL primeiro, SD por último entre
/// os militares; graduações não reconhecidas ordenam depois de SD; as duas
/// categorias de contratados (FC COM e FC TER) ordenam depois de QUALQUER
/// militar, sempre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Graduacao {
    Tcel,
    Maj,
    Cap,
    Ten1,
    Ten2,
    Subten,
    Sgt1,
    Sgt2,
    Sgt3,
    Cb,
    Sd,
    /// Militar não reconhecido: depois de SD, antes dos contratados.
    OutraMilitar,
    FcCom,
    FcTer,
    /// Contratado não reconhecido (tem o marcador "FC"): por último.
    OutraFc,
}

impl Graduacao {
    pub fn parse(valor: &str) -> Graduacao {
        let limpo = valor.trim().to_uppercase();
        match limpo.as_str() {
            "TCEL" => Graduacao::Tcel,
            "MAJ" => Graduacao::Maj,
            "CAP" => Graduacao::Cap,
            "1ºTEN" | "1TEN" => Graduacao::Ten1,
            "2ºTEN" | "2TEN" => Graduacao::Ten2,
            "SUBTEN" => Graduacao::Subten,
            "1ºSGT" | "1SGT" => Graduacao::Sgt1,
            "2ºSGT" | "2SGT" => Graduacao::Sgt2,
            "3ºSGT" | "3SGT" => Graduacao::Sgt3,
            "CB" => Graduacao::Cb,
            "SD" => Graduacao::Sd,
            "FC COM" => Graduacao::FcCom,
            "FC TER" => Graduacao::FcTer,
            // O marcador "FC" decide a partição grossa mesmo quando a
            // categoria exata não é reconhecida.
            _ if limpo.contains("FC") => Graduacao::OutraFc,
            _ => Graduacao::OutraMilitar,
        }
    }

    pub fn peso(&self) -> u8 {
        match self {
            Graduacao::Tcel => 0,
            Graduacao::Maj => 1,
            Graduacao::Cap => 2,
            Graduacao::Ten1 => 3,
            Graduacao::Ten2 => 4,
            Graduacao::Subten => 5,
            Graduacao::Sgt1 => 6,
            Graduacao::Sgt2 => 7,
            Graduacao::Sgt3 => 8,
            Graduacao::Cb => 9,
            Graduacao::Sd => 10,
            Graduacao::OutraMilitar => 11,
            Graduacao::FcCom => 12,
            Graduacao::FcTer => 13,
            Graduacao::OutraFc => 14,
        }
    }

    /// Partição grossa da ordenação: militares antes de contratados.
    pub fn is_contratado(&self) -> bool {
        matches!(
            self,
            Graduacao::FcCom | Graduacao::FcTer | Graduacao::OutraFc
        )
    }
}

/// Uma inscrição normalizada do ciclo atual (uma linha da aba `presenca`
/// já com campos canónicos e pesos resolvidos).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inscricao {
    /// Texto original gravado na planilha (exibido como está).
    pub data_hora_raw: String,
    /// Data/hora interpretada; `None` se o texto for inválido (a linha não
    /// é descartada, apenas ordena por último dentro do seu grupo).
    pub data_hora: Option<NaiveDateTime>,
    pub destino: Destino,
    /// Texto original do destino; as exibições mostram sempre o que está
    /// na planilha, o enum só pesa a ordenação.
    pub destino_raw: String,
    /// Texto original da graduação, para exibição.
    pub graduacao_raw: String,
    pub graduacao: Graduacao,
    pub nome: String,
    pub lotacao: String,
    /// Chave de identidade durável (e-mail); vazia em linhas legadas.
    pub email: String,
}

/// Inscrição já ordenada e com assento atribuído.
#[derive(Debug, Clone, Serialize)]
pub struct InscricaoNumerada {
    /// "1".."38" ou "Exc-01", "Exc-02", ...
    pub assento: String,
    /// Excedente é só uma marcação de exibição; a ordenação não muda.
    pub excedente: bool,
    pub inscricao: Inscricao,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn destino_aceita_caixa_e_espacos() {
        assert_eq!(Destino::parse(" qg "), Destino::Qg);
        assert_eq!(Destino::parse("Rmcf"), Destino::Rmcf);
        assert_eq!(Destino::parse("OUTROS"), Destino::Outros);
        assert_eq!(Destino::parse("???"), Destino::Desconhecido);
        assert_eq!(Destino::parse(""), Destino::Desconhecido);
    }

    #[test]
    fn escada_de_graduacoes_respeita_hierarquia() {
        let escada = [
            "TCEL", "MAJ", "CAP", "1ºTEN", "2ºTEN", "SUBTEN", "1ºSGT",
            "2ºSGT", "3ºSGT", "CB", "SD",
        ];
        let pesos: Vec<u8> = escada
            .iter()
            .map(|g| Graduacao::parse(g).peso())
            .collect();
        let mut ordenados = pesos.clone();
        ordenados.sort();
        assert_eq!(pesos, ordenados, "escada militar fora de ordem");
    }

    #[test]
    fn contratados_depois_de_qualquer_militar() {
        let sd = Graduacao::parse("SD");
        let desconhecida = Graduacao::parse("ALUNO");
        let fc_com = Graduacao::parse("FC COM");
        let fc_ter = Graduacao::parse("FC TER");

        assert!(!sd.is_contratado());
        assert!(!desconhecida.is_contratado());
        assert!(fc_com.is_contratado());
        assert!(fc_ter.is_contratado());
        assert!(fc_com.peso() > desconhecida.peso());
        assert!(fc_ter.peso() > fc_com.peso());
    }

    #[test]
    fn marcador_fc_decide_particao_mesmo_sem_categoria_conhecida() {
        let g = Graduacao::parse("FC XYZ");
        assert!(g.is_contratado());
        assert!(g.peso() > Graduacao::FcTer.peso());
    }
}
