// src/repositories/user_repository.rs
use crate::{
    error::AppResult,
    models::user::{User, UserCriteria},
};
use async_trait::async_trait;
use sqlx::SqlitePool;

/// Leitura dos utilizadores sincronizados do LDAP.
///
/// "Não encontrado" nunca é erro: `None` para as pesquisas de um registo,
/// lista vazia para as restantes.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>>;
    /// Primeiro utilizador (por id) que satisfaz os critérios.
    async fn find_one_by(&self, criteria: &UserCriteria) -> AppResult<Option<User>>;
    async fn find_by(&self, criteria: &UserCriteria) -> AppResult<Vec<User>>;
    async fn find_all(&self) -> AppResult<Vec<User>>;
}

#[derive(Clone)]
pub struct SqliteUserRepository {
    db_pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(db_pool: SqlitePool) -> Self {
        Self { db_pool }
    }
}

// Cada critério é ignorado quando o parâmetro correspondente é NULL
const SELECT_POR_CRITERIOS: &str = r#"
    SELECT id, username, name, email, ativo, synced_at
    FROM users
    WHERE (?1 IS NULL OR username = ?1)
      AND (?2 IS NULL OR name = ?2)
      AND (?3 IS NULL OR email = ?3)
      AND (?4 IS NULL OR ativo = ?4)
    ORDER BY id ASC
"#;

fn query_por_criteria<'q>(
    sql: &'q str,
    criteria: &'q UserCriteria,
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, User, sqlx::sqlite::SqliteArguments<'q>> {
    sqlx::query_as::<_, User>(sql)
        .bind(criteria.username.as_deref())
        .bind(criteria.name.as_deref())
        .bind(criteria.email.as_deref())
        .bind(criteria.ativo)
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        tracing::debug!("Buscando utilizador por ID: {}", id);
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, name, email, ativo, synced_at FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.db_pool)
        .await?;
        Ok(user)
    }

    async fn find_one_by(&self, criteria: &UserCriteria) -> AppResult<Option<User>> {
        tracing::debug!("Buscando primeiro utilizador com critérios {:?}", criteria);
        let sql = format!("{} LIMIT 1", SELECT_POR_CRITERIOS);
        let user = query_por_criteria(&sql, criteria)
            .fetch_optional(&self.db_pool)
            .await?;
        Ok(user)
    }

    async fn find_by(&self, criteria: &UserCriteria) -> AppResult<Vec<User>> {
        let users = query_por_criteria(SELECT_POR_CRITERIOS, criteria)
            .fetch_all(&self.db_pool)
            .await?;
        tracing::debug!("{} utilizadores para critérios {:?}", users.len(), criteria);
        Ok(users)
    }

    async fn find_all(&self) -> AppResult<Vec<User>> {
        self.find_by(&UserCriteria::default()).await
    }
}
