// src/web/evento_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::{evento::Evento, participante::InscricaoForm},
    services::{
        evento_service::{self, ResultadoInscricao},
        formatacao, notificacao_service, participante_service,
    },
    state::AppState,
    templates::{EventoResumo, EventosPage, InscricaoPage},
};
use askama::Template;
use axum::{
    extract::{Form, Path, Query, State},
    response::{Html, IntoResponse, Redirect},
};
use chrono::Local;
use serde::Deserialize;

#[derive(Deserialize, Debug)]
pub struct FeedbackParams {
    success: Option<String>,
    error: Option<String>,
}

/// "10/05/2024 08:00 a 12/05/2024 18:00"
pub fn periodo(evento: &Evento) -> String {
    format!(
        "{} a {}",
        evento.inicio.format("%d/%m/%Y %H:%M"),
        evento.fim.format("%d/%m/%Y %H:%M")
    )
}

// GET /eventos
pub async fn listar_eventos(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let agora = Local::now().naive_local();
    let eventos = evento_service::find_eventos_abertos(&state.db_pool, agora)
        .await?
        .iter()
        .map(|e| EventoResumo {
            id: e.id,
            titulo: e.titulo.clone(),
            periodo: periodo(e),
            carga_horaria: e.carga_horaria,
        })
        .collect();

    let template = EventosPage { eventos };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template EventosPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// GET /eventos/{id}/inscricao
pub async fn show_inscricao_form(
    State(state): State<AppState>,
    Path(evento_id): Path<i64>,
    Query(params): Query<FeedbackParams>,
) -> AppResult<impl IntoResponse> {
    let evento = evento_service::find_evento_by_id(&state.db_pool, evento_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let template = InscricaoPage {
        periodo: periodo(&evento),
        aberto: evento.aceita_inscricoes(Local::now().naive_local()),
        evento: &evento,
        horarios: formatacao::horarios().collect(),
        success_message: params.success,
        error_message: params.error,
    };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template InscricaoPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

// POST /eventos/{id}/inscricao
pub async fn handle_inscricao(
    State(state): State<AppState>,
    Path(evento_id): Path<i64>,
    Form(form): Form<InscricaoForm>,
) -> AppResult<Redirect> {
    tracing::info!("POST /eventos/{}/inscricao", evento_id);
    let voltar = |chave: &str, msg: &str| {
        Redirect::to(&format!("/eventos/{}/inscricao?{}={}", evento_id, chave, urlencoding::encode(msg)))
    };

    let evento = evento_service::find_evento_by_id(&state.db_pool, evento_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !evento.aceita_inscricoes(Local::now().naive_local()) {
        tracing::warn!("Inscrição recusada: evento {} encerrado ou inativo.", evento_id);
        return Ok(voltar("error", "As inscrições para este evento estão encerradas."));
    }

    let novo = match participante_service::validar_form(&form) {
        Ok(novo) => novo,
        Err(msg) => {
            tracing::warn!("Inscrição recusada: {}", msg);
            return Ok(voltar("error", msg));
        }
    };

    let horario = match participante_service::validar_horario(&form) {
        Ok(horario) => horario,
        Err(msg) => {
            tracing::warn!("Inscrição recusada: {}", msg);
            return Ok(voltar("error", msg));
        }
    };

    let participante = participante_service::find_or_create_participante(&state.db_pool, &novo).await?;

    match evento_service::inscrever(&state.db_pool, participante.id, evento.id, horario.as_deref()).await? {
        ResultadoInscricao::Criada(inscricao) => {
            tracing::info!(
                "✅ Inscrição {} criada (participante {}, evento {}, chegada {}, em {:?}).",
                inscricao.id,
                inscricao.participante_id,
                inscricao.evento_id,
                inscricao.horario_chegada.as_deref().unwrap_or("-"),
                inscricao.created_at
            );
            // O email não bloqueia nem invalida a inscrição
            match notificacao_service::compor_confirmacao(&participante, &evento) {
                Ok(mensagem) => notificacao_service::enfileirar(state.mailer.clone(), mensagem),
                Err(e) => tracing::error!("Falha ao compor email de confirmação: {:?}", e),
            }
            Ok(voltar("success", "Inscrição realizada! Você receberá a confirmação por email."))
        }
        ResultadoInscricao::JaInscrito => Ok(voltar("error", "Este CPF já está inscrito neste evento.")),
    }
}
