// src/templates.rs
use askama::Template;
use crate::models::{evento::Evento, participante::Participante};

// Certificado imprimível (A4 paisagem)
#[derive(Template)]
#[template(path = "certificado.html")]
pub struct CertificadoPage {
    /// Imagem de fundo já em data URI; `None` deixa a página sem fundo.
    pub fundo: Option<String>,
    /// HTML do modelo com os campos preenchidos (sem escape).
    pub conteudo: String,
    pub local_data: String,
}

#[derive(Template)]
#[template(path = "emails/inscricao.html")]
pub struct InscricaoEmail<'a> {
    pub participante: &'a Participante,
    pub evento: &'a Evento,
    pub data_inicio: String,
    pub data_fim: String,
}

/// Linha da lista pública de eventos, com datas já formatadas.
#[derive(Clone, Debug)]
pub struct EventoResumo {
    pub id: i64,
    pub titulo: String,
    pub periodo: String,
    pub carga_horaria: i64,
}

#[derive(Template)]
#[template(path = "eventos.html")]
pub struct EventosPage {
    pub eventos: Vec<EventoResumo>,
}

#[derive(Template)]
#[template(path = "inscricao.html")]
pub struct InscricaoPage<'a> {
    pub evento: &'a Evento,
    pub periodo: String,
    pub aberto: bool,
    // Opções do campo "horário de chegada"
    pub horarios: Vec<String>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// Participante com CPF e telefone mascarados para a equipa.
#[derive(Clone, Debug)]
pub struct ParticipanteLinha {
    pub id: i64,
    pub nome: String,
    pub cpf: String,
    pub telefone: String,
    pub email: String,
    pub horario_chegada: String,
    pub inscrito_em: String,
}

#[derive(Template)]
#[template(path = "admin_participantes.html")]
pub struct AdminParticipantesPage<'a> {
    pub evento: &'a Evento,
    pub participantes: Vec<ParticipanteLinha>,
}
