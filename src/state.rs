use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::users::{
    memory::InMemoryUserRepository,
    repo::{PgUserRepository, UserRepository},
    services::UserService,
};

#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let repo: Arc<dyn UserRepository> = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                sqlx::migrate!("./migrations")
                    .run(&db)
                    .await
                    .context("run migrations")?;
                info!("postgres user store ready");

                Arc::new(PgUserRepository::new(db)) as Arc<dyn UserRepository>
            }
            None => {
                warn!("DATABASE_URL not set; users are kept in memory and lost on restart");
                Arc::new(InMemoryUserRepository::new()) as Arc<dyn UserRepository>
            }
        };

        Ok(Self::from_parts(repo, config))
    }

    pub fn from_parts(repo: Arc<dyn UserRepository>, config: Arc<AppConfig>) -> Self {
        Self {
            users: UserService::new(repo),
            config,
        }
    }
}
