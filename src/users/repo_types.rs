use sqlx::FromRow;

/// User record in the database.
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow)]
pub struct UserEntity {
    pub id: Option<i64>,           // generated on first save
    pub login: String,             // unique
    pub password: String,          // Argon2 hash at rest
    pub email: Option<String>,
    pub full_name: Option<String>,
}
