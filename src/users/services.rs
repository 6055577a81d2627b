use std::sync::Arc;

use tracing::{debug, error};

use super::repo::{RepoError, UserRepository};
use super::repo_types::UserEntity;
use crate::auth::password::verify_password;

/// Business operations on users. Passwords handed to `save` and
/// `partial_update` must already be hashed.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// True when a user with this login exists and `candidate.password`
    /// (plaintext) verifies against the stored hash.
    pub async fn is_user_exists(&self, candidate: &UserEntity) -> Result<bool, RepoError> {
        let Some(stored) = self.repo.find_by_login(&candidate.login).await? else {
            return Ok(false);
        };
        self.password_matches(&candidate.password, &stored)
    }

    /// Checks `plain` against the hash stored on `user`.
    pub fn password_matches(&self, plain: &str, user: &UserEntity) -> Result<bool, RepoError> {
        verify_password(plain, &user.password).map_err(|e| {
            error!(error = %e, user_id = ?user.id, "stored password hash is unreadable");
            RepoError::Hash(e.to_string())
        })
    }

    pub async fn is_login_occupied(&self, login: &str) -> Result<bool, RepoError> {
        Ok(self.repo.find_by_login(login).await?.is_some())
    }

    pub async fn is_exists(&self, id: i64) -> Result<bool, RepoError> {
        self.repo.exists_by_id(id).await
    }

    pub async fn find_all(&self) -> Result<Vec<UserEntity>, RepoError> {
        self.repo.find_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, RepoError> {
        self.repo.find_by_id(id).await
    }

    pub async fn find_by_login(&self, login: &str) -> Result<Option<UserEntity>, RepoError> {
        self.repo.find_by_login(login).await
    }

    pub async fn save(&self, user: UserEntity) -> Result<UserEntity, RepoError> {
        let saved = self.repo.save(user).await?;
        debug!(user_id = ?saved.id, login = %saved.login, "user saved");
        Ok(saved)
    }

    /// Overwrites only the non-empty `login`/`password` and the present
    /// `email`/`full_name` of `changes`.
    pub async fn partial_update(
        &self,
        id: i64,
        changes: UserEntity,
    ) -> Result<UserEntity, RepoError> {
        let mut existing = self.repo.find_by_id(id).await?.ok_or(RepoError::NotFound)?;

        if !changes.login.is_empty() {
            existing.login = changes.login;
        }
        if !changes.password.is_empty() {
            existing.password = changes.password;
        }
        if changes.email.is_some() {
            existing.email = changes.email;
        }
        if changes.full_name.is_some() {
            existing.full_name = changes.full_name;
        }

        self.save(existing).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.repo.delete(id).await
    }
}
