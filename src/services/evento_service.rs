// src/services/evento_service.rs
use crate::{
    error::AppResult,
    models::{evento::Evento, inscricao::Inscricao},
};
use chrono::NaiveDateTime;
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT_EVENTO: &str = r#"
    SELECT id, titulo, descricao, inicio, fim, carga_horaria, ativo,
           certificado_imagem, certificado_conteudo
    FROM eventos
"#;

pub async fn find_evento_by_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Evento>> {
    tracing::debug!("Buscando evento por ID: {}", id);
    let evento = sqlx::query_as::<_, Evento>(&format!("{} WHERE id = ?1", SELECT_EVENTO))
        .bind(id)
        .fetch_optional(db_pool)
        .await?;
    Ok(evento)
}

/// Eventos ativos que ainda não terminaram, pela data de início.
pub async fn find_eventos_abertos(db_pool: &SqlitePool, agora: NaiveDateTime) -> AppResult<Vec<Evento>> {
    let eventos = sqlx::query_as::<_, Evento>(&format!(
        "{} WHERE ativo = 1 AND fim >= ?1 ORDER BY inicio ASC",
        SELECT_EVENTO
    ))
    .bind(agora)
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("{} eventos abertos.", eventos.len());
    Ok(eventos)
}

/// Desativa os eventos cujo fim já passou. Pode ser repetido sem efeito extra.
/// Devolve quantos eventos foram desativados nesta execução.
pub async fn inativar_expirados(db_pool: &SqlitePool, agora: NaiveDateTime) -> AppResult<u64> {
    let desativados = sqlx::query("UPDATE eventos SET ativo = 0 WHERE ativo = 1 AND fim < ?1")
        .bind(agora)
        .execute(db_pool)
        .await?
        .rows_affected();
    tracing::info!("🗓️ {} eventos expirados desativados.", desativados);
    Ok(desativados)
}

#[derive(Debug)]
pub enum ResultadoInscricao {
    Criada(Inscricao),
    JaInscrito,
}

pub async fn inscrever(
    db_pool: &SqlitePool,
    participante_id: i64,
    evento_id: i64,
    horario_chegada: Option<&str>,
) -> AppResult<ResultadoInscricao> {
    let id = Uuid::new_v4().to_string();
    let resultado = sqlx::query_as::<_, Inscricao>(
        r#"
        INSERT INTO inscricoes (id, participante_id, evento_id, horario_chegada)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING id, participante_id, evento_id, horario_chegada, created_at
        "#,
    )
    .bind(&id)
    .bind(participante_id)
    .bind(evento_id)
    .bind(horario_chegada)
    .fetch_one(db_pool)
    .await;

    match resultado {
        Ok(inscricao) => Ok(ResultadoInscricao::Criada(inscricao)),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            tracing::warn!("Participante {} já inscrito no evento {}.", participante_id, evento_id);
            Ok(ResultadoInscricao::JaInscrito)
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn find_inscricao(
    db_pool: &SqlitePool,
    participante_id: i64,
    evento_id: i64,
) -> AppResult<Option<Inscricao>> {
    let inscricao = sqlx::query_as::<_, Inscricao>(
        r#"
        SELECT id, participante_id, evento_id, horario_chegada, created_at
        FROM inscricoes
        WHERE participante_id = ?1 AND evento_id = ?2
        "#,
    )
    .bind(participante_id)
    .bind(evento_id)
    .fetch_optional(db_pool)
    .await?;
    Ok(inscricao)
}

/// Grava um evento diretamente (os eventos são geridos fora desta aplicação).
#[cfg(test)]
pub(crate) async fn inserir_evento_de_teste(db_pool: &SqlitePool, evento: &Evento) -> i64 {
    sqlx::query(
        r#"
        INSERT INTO eventos (titulo, descricao, inicio, fim, carga_horaria, ativo, certificado_imagem, certificado_conteudo)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        "#,
    )
    .bind(&evento.titulo)
    .bind(&evento.descricao)
    .bind(evento.inicio)
    .bind(evento.fim)
    .bind(evento.carga_horaria)
    .bind(evento.ativo)
    .bind(&evento.certificado_imagem)
    .bind(&evento.certificado_conteudo)
    .execute(db_pool)
    .await
    .unwrap()
    .last_insert_rowid()
}
