use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use super::repo_types::UserEntity;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("user not found")]
    NotFound,

    #[error("constraint violation: {0}")]
    Conflict(String),

    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Persistence port for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<UserEntity>, RepoError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, RepoError>;

    async fn find_by_login(&self, login: &str) -> Result<Option<UserEntity>, RepoError>;

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError>;

    /// Insert when `id` is `None`, otherwise replace the row with that id.
    /// Fails with `NotFound` when the id is gone and with `Conflict` when the
    /// login belongs to another row. Ids are only ever generated by the store.
    async fn save(&self, user: UserEntity) -> Result<UserEntity, RepoError>;

    /// Removing an absent id is not an error.
    async fn delete(&self, id: i64) -> Result<(), RepoError>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Name Postgres gives the `UNIQUE` on `users.login`.
const LOGIN_CONSTRAINT: &str = "users_login_key";

fn is_login_constraint(constraint: Option<&str>) -> bool {
    constraint == Some(LOGIN_CONSTRAINT)
}

fn map_write_err(e: sqlx::Error, login: &str) -> RepoError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_unique_violation() && is_login_constraint(db.constraint()) =>
        {
            RepoError::Conflict(format!("login '{}' is already taken", login))
        }
        _ => RepoError::Storage(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_all(&self) -> Result<Vec<UserEntity>, RepoError> {
        let rows = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, login, password, email, full_name
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, RepoError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, login, password, email, full_name
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<UserEntity>, RepoError> {
        let user = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, login, password, email, full_name
            FROM users
            WHERE login = $1
            "#,
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        let exists =
            sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)"#)
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn save(&self, user: UserEntity) -> Result<UserEntity, RepoError> {
        let Some(id) = user.id else {
            return sqlx::query_as::<_, UserEntity>(
                r#"
                INSERT INTO users (login, password, email, full_name)
                VALUES ($1, $2, $3, $4)
                RETURNING id, login, password, email, full_name
                "#,
            )
            .bind(&user.login)
            .bind(&user.password)
            .bind(&user.email)
            .bind(&user.full_name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_write_err(e, &user.login));
        };

        sqlx::query_as::<_, UserEntity>(
            r#"
            UPDATE users
            SET login = $2, password = $3, email = $4, full_name = $5
            WHERE id = $1
            RETURNING id, login, password, email, full_name
            "#,
        )
        .bind(id)
        .bind(&user.login)
        .bind(&user.password)
        .bind(&user.email)
        .bind(&user.full_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_err(e, &user.login))?
        .ok_or(RepoError::NotFound)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        sqlx::query(r#"DELETE FROM users WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
