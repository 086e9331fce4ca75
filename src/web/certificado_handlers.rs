// src/web/certificado_handlers.rs
use crate::{
    error::{AppError, AppResult},
    services::{certificado_service, evento_service, participante_service},
    state::AppState,
};
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse},
};
use chrono::Local;

// GET /certificados/{evento_id}/{participante_id} (protegido por IP)
pub async fn emitir_certificado(
    State(state): State<AppState>,
    Path((evento_id, participante_id)): Path<(i64, i64)>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("Emitindo certificado: evento {}, participante {}", evento_id, participante_id);

    let evento = evento_service::find_evento_by_id(&state.db_pool, evento_id)
        .await?
        .ok_or(AppError::NotFound)?;
    let participante = participante_service::find_participante_by_id(&state.db_pool, participante_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if evento_service::find_inscricao(&state.db_pool, participante.id, evento.id)
        .await?
        .is_none()
    {
        tracing::warn!("Participante {} não está inscrito no evento {}.", participante.id, evento.id);
        return Err(AppError::NotFound);
    }

    let Some(template) = evento.certificado_template() else {
        tracing::warn!("Evento {} não tem modelo de certificado.", evento.id);
        return Err(AppError::NotFound);
    };

    let campos = certificado_service::campos_para(&participante, &evento);
    let html = certificado_service::gerar_certificado(
        &state.config.storage_root,
        &template,
        &campos,
        Local::now().date_naive(),
    )
    .await?;

    tracing::info!("📜 Certificado emitido: evento {}, participante {}", evento.id, participante.id);
    Ok(Html(html))
}
