// src/templates.rs
use crate::models::{inscricao::InscricaoNumerada, user::UserAccount};
use crate::services::export_service::DocumentoRoster;
use askama::Template;

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    // Campo opcional para passar uma mensagem de erro para o template
    pub error: Option<String>,
}

#[derive(Template)]
#[template(path = "cadastro.html")]
pub struct CadastroPage {
    pub error: Option<String>,
    pub ok: Option<String>,
}

#[derive(Template)]
#[template(path = "presenca.html")]
pub struct PresencaPage {
    pub nome_usuario: String,
    pub is_admin: bool,
    /// Janela de inscrições aberta neste instante?
    pub abertas: bool,
    /// O utilizador logado já está na lista deste ciclo?
    pub ja_inscrito: bool,
    pub inscricoes: Vec<InscricaoNumerada>,
    pub total: usize,
    pub excedentes: usize,
    pub msg: Option<String>,
    pub erro: Option<String>,
}

#[derive(Template)]
#[template(path = "impressao.html")]
pub struct ImpressaoPage {
    pub documento: DocumentoRoster,
    pub gerado_em: String,
}

#[derive(Template)]
#[template(path = "admin_usuarios.html")]
pub struct AdminUsuariosPage {
    pub contas: Vec<UserAccount>,
    pub limite: Option<usize>,
    pub msg: Option<String>,
    pub erro: Option<String>,
}
