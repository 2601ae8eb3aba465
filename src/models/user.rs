// src/models/user.rs
use serde::{Deserialize, Serialize};

/// Situação do cadastro de um utilizador.
/// PENDENTE aguarda aprovação do admin; só ATIVO consegue entrar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCadastro {
    Pendente,
    Ativo,
    Inativo,
}

impl StatusCadastro {
    pub fn parse(valor: &str) -> StatusCadastro {
        match valor.trim().to_uppercase().as_str() {
            "ATIVO" => StatusCadastro::Ativo,
            "INATIVO" => StatusCadastro::Inativo,
            _ => StatusCadastro::Pendente,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCadastro::Pendente => "PENDENTE",
            StatusCadastro::Ativo => "ATIVO",
            StatusCadastro::Inativo => "INATIVO",
        }
    }
}

/// Cadastro de um passageiro, independente de qualquer ciclo.
/// Corresponde a uma linha posicional da aba `usuarios`:
/// `[nome, graduacao, lotacao, senha, destino_padrao, email, telefone, status]`.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub nome: String,
    pub graduacao: String,
    pub lotacao: String,
    /// Hash bcrypt gravado na coluna posicional `senha`.
    pub senha_hash: String,
    pub destino_padrao: String,
    /// Chave de identidade durável.
    pub email: String,
    pub telefone: String,
    pub status: StatusCadastro,
}

impl UserAccount {
    /// Reconstrói o cadastro a partir da linha posicional da planilha.
    /// Campos em falta viram string vazia (nunca aborta a leitura).
    pub fn from_linha(linha: &[String]) -> UserAccount {
        let campo = |i: usize| linha.get(i).cloned().unwrap_or_default();
        UserAccount {
            nome: campo(0),
            graduacao: campo(1),
            lotacao: campo(2),
            senha_hash: campo(3),
            destino_padrao: campo(4),
            email: campo(5),
            telefone: campo(6),
            status: StatusCadastro::parse(&campo(7)),
        }
    }

    pub fn to_linha(&self) -> Vec<String> {
        vec![
            self.nome.clone(),
            self.graduacao.clone(),
            self.lotacao.clone(),
            self.senha_hash.clone(),
            self.destino_padrao.clone(),
            self.email.clone(),
            self.telefone.clone(),
            self.status.as_str().to_string(),
        ]
    }
}

// --- Formulários ---

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CadastroForm {
    pub nome: String,
    pub graduacao: String,
    pub lotacao: String,
    pub destino_padrao: String,
    pub email: String,
    pub telefone: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linha_curta_nao_aborta() {
        let conta = UserAccount::from_linha(&["Fulano".to_string()]);
        assert_eq!(conta.nome, "Fulano");
        assert_eq!(conta.email, "");
        assert_eq!(conta.status, StatusCadastro::Pendente);
    }

    #[test]
    fn status_desconhecido_cai_em_pendente() {
        assert_eq!(StatusCadastro::parse("ativo"), StatusCadastro::Ativo);
        assert_eq!(StatusCadastro::parse("???"), StatusCadastro::Pendente);
    }

    #[test]
    fn ida_e_volta_da_linha_posicional() {
        let conta = UserAccount {
            nome: "Maria".into(),
            graduacao: "3ºSGT".into(),
            lotacao: "QG".into(),
            senha_hash: "$2b$x".into(),
            destino_padrao: "RMCF".into(),
            email: "maria@pm.rj.gov.br".into(),
            telefone: "21 99999-0000".into(),
            status: StatusCadastro::Ativo,
        };
        let relida = UserAccount::from_linha(&conta.to_linha());
        assert_eq!(relida.email, conta.email);
        assert_eq!(relida.status, StatusCadastro::Ativo);
    }
}
