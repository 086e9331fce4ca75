// src/services/participante_service.rs
use crate::{
    error::AppResult,
    models::participante::{InscricaoForm, NovoParticipante, Participante, ParticipanteInscrito},
    services::formatacao,
};
use sqlx::SqlitePool;

const SELECT_PARTICIPANTE: &str =
    "SELECT id, nome, cpf, telefone, email, created_at FROM participantes";

pub async fn find_participante_by_id(db_pool: &SqlitePool, id: i64) -> AppResult<Option<Participante>> {
    tracing::debug!("Buscando participante por ID: {}", id);
    let participante = sqlx::query_as::<_, Participante>(&format!("{} WHERE id = ?1", SELECT_PARTICIPANTE))
        .bind(id)
        .fetch_optional(db_pool)
        .await?;
    Ok(participante)
}

/// Participantes inscritos num evento, por ordem alfabética,
/// com o horário de chegada e a data de cada inscrição.
pub async fn find_participantes_do_evento(
    db_pool: &SqlitePool,
    evento_id: i64,
) -> AppResult<Vec<ParticipanteInscrito>> {
    let participantes = sqlx::query_as::<_, ParticipanteInscrito>(
        r#"
        SELECT p.id, p.nome, p.cpf, p.telefone, p.email, p.created_at,
               i.horario_chegada, i.created_at AS inscrito_em
        FROM participantes p
        JOIN inscricoes i ON i.participante_id = p.id
        WHERE i.evento_id = ?1
        ORDER BY p.nome ASC
        "#,
    )
    .bind(evento_id)
    .fetch_all(db_pool)
    .await?;
    tracing::debug!("Evento {} tem {} participantes.", evento_id, participantes.len());
    Ok(participantes)
}

/// Valida e normaliza os dados do formulário.
/// Devolve a mensagem a mostrar ao utilizador quando algo está errado.
pub fn validar_form(form: &InscricaoForm) -> Result<NovoParticipante, &'static str> {
    let nome = form.nome.trim();
    if nome.is_empty() {
        return Err("Informe o nome completo.");
    }
    let cpf: String = form.cpf.chars().filter(char::is_ascii_digit).collect();
    if cpf.len() != 11 {
        return Err("CPF deve ter 11 dígitos.");
    }
    let email = form.email.trim();
    if !email.contains('@') || email.starts_with('@') || email.ends_with('@') {
        return Err("Email inválido.");
    }
    let telefone: String = form.telefone.chars().filter(char::is_ascii_digit).take(11).collect();

    Ok(NovoParticipante {
        nome: nome.to_string(),
        cpf,
        telefone,
        email: email.to_lowercase(),
    })
}

/// Horário de chegada escolhido no formulário. Vazio conta como não informado;
/// qualquer outro valor tem de ser uma das opções de `formatacao::horarios()`.
pub fn validar_horario(form: &InscricaoForm) -> Result<Option<String>, &'static str> {
    match form.horario.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(h) if formatacao::horarios().any(|opcao| opcao == h) => Ok(Some(h.to_string())),
        Some(_) => Err("Horário de chegada inválido."),
    }
}

/// Devolve o participante já registado com este CPF ou cria um novo.
/// Um registo existente nunca é alterado a partir do formulário público.
pub async fn find_or_create_participante(db_pool: &SqlitePool, novo: &NovoParticipante) -> AppResult<Participante> {
    let criado = sqlx::query(
        r#"
        INSERT INTO participantes (nome, cpf, telefone, email)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(cpf) DO NOTHING
        "#,
    )
    .bind(&novo.nome)
    .bind(&novo.cpf)
    .bind(&novo.telefone)
    .bind(&novo.email)
    .execute(db_pool)
    .await?
    .rows_affected()
        > 0;

    let participante = sqlx::query_as::<_, Participante>(&format!("{} WHERE cpf = ?1", SELECT_PARTICIPANTE))
        .bind(&novo.cpf)
        .fetch_one(db_pool)
        .await?;

    let final_cpf = &novo.cpf[novo.cpf.len().saturating_sub(2)..];
    if criado {
        tracing::info!("Participante {} criado (CPF terminado em {}).", participante.id, final_cpf);
    } else {
        tracing::debug!("Participante {} reaproveitado (CPF terminado em {}).", participante.id, final_cpf);
    }
    Ok(participante)
}
