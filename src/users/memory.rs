//! In-memory user store, used by tests and when no database is configured.
//! Data is lost on restart.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::repo::{RepoError, UserRepository};
use super::repo_types::UserEntity;

#[derive(Default)]
struct Store {
    users: BTreeMap<i64, UserEntity>,
    last_id: i64,
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_all(&self) -> Result<Vec<UserEntity>, RepoError> {
        let store = self.store.read().await;
        Ok(store.users.values().cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, RepoError> {
        let store = self.store.read().await;
        Ok(store.users.get(&id).cloned())
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<UserEntity>, RepoError> {
        let store = self.store.read().await;
        Ok(store.users.values().find(|u| u.login == login).cloned())
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        let store = self.store.read().await;
        Ok(store.users.contains_key(&id))
    }

    async fn save(&self, mut user: UserEntity) -> Result<UserEntity, RepoError> {
        let mut store = self.store.write().await;

        // same rule as the UNIQUE(login) constraint
        let taken = store
            .users
            .values()
            .any(|u| u.login == user.login && u.id != user.id);
        if taken {
            return Err(RepoError::Conflict(format!(
                "login '{}' is already taken",
                user.login
            )));
        }

        let id = match user.id {
            Some(id) if store.users.contains_key(&id) => id,
            Some(_) => return Err(RepoError::NotFound),
            None => {
                store.last_id += 1;
                store.last_id
            }
        };
        user.id = Some(id);
        store.users.insert(id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let mut store = self.store.write().await;
        store.users.remove(&id);
        Ok(())
    }
}
