// src/web/admin_handlers.rs
use crate::{
    error::{AppError, AppResult},
    models::user::{User, UserCriteria},
    services::{evento_service, formatacao, participante_service},
    state::AppState,
    templates::{AdminParticipantesPage, ParticipanteLinha},
};
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse},
    Json,
};
use serde::Deserialize;

// GET /admin/eventos/{id}/participantes
pub async fn listar_participantes(
    State(state): State<AppState>,
    Path(evento_id): Path<i64>,
) -> AppResult<impl IntoResponse> {
    tracing::debug!("GET /admin/eventos/{}/participantes", evento_id);
    let evento = evento_service::find_evento_by_id(&state.db_pool, evento_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let participantes = participante_service::find_participantes_do_evento(&state.db_pool, evento_id)
        .await?
        .into_iter()
        .map(|inscrito| {
            let p = inscrito.participante;
            ParticipanteLinha {
                id: p.id,
                cpf: formatacao::formatar_cpf(&p.cpf),
                telefone: formatacao::formatar_telefone(&p.telefone),
                horario_chegada: inscrito.horario_chegada.unwrap_or_default(),
                inscrito_em: inscrito
                    .inscrito_em
                    .map(|d| formatacao::formatar_data(&d.format("%Y-%m-%d").to_string()))
                    .unwrap_or_default(),
                nome: p.nome,
                email: p.email,
            }
        })
        .collect();

    let template = AdminParticipantesPage { evento: &evento, participantes };
    match template.render() {
        Ok(html) => Ok(Html(html).into_response()),
        Err(e) => {
            tracing::error!("Falha ao renderizar template AdminParticipantesPage: {}", e);
            Err(AppError::InternalServerError)
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct UserFiltro {
    username: Option<String>,
    name: Option<String>,
    email: Option<String>,
    ativo: Option<bool>,
}

impl From<UserFiltro> for UserCriteria {
    fn from(f: UserFiltro) -> Self {
        UserCriteria { username: f.username, name: f.name, email: f.email, ativo: f.ativo }
    }
}

// GET /admin/usuarios?ativo=true
pub async fn listar_usuarios(
    State(state): State<AppState>,
    Query(filtro): Query<UserFiltro>,
) -> AppResult<Json<Vec<User>>> {
    let criteria = UserCriteria::from(filtro);
    let sem_filtro = criteria.username.is_none()
        && criteria.name.is_none()
        && criteria.email.is_none()
        && criteria.ativo.is_none();

    let users = if sem_filtro {
        state.users.find_all().await?
    } else {
        state.users.find_by(&criteria).await?
    };
    Ok(Json(users))
}

// GET /admin/usuarios/{id}
pub async fn mostrar_usuario(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let user = state.users.find_by_id(id).await?.ok_or(AppError::NotFound)?;
    Ok(Json(user))
}

// GET /admin/usuarios/username/{username}
pub async fn mostrar_usuario_por_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Json<User>> {
    let user = state
        .users
        .find_one_by(&UserCriteria::username(username))
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(user))
}
