#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response, StatusCode},
    Router,
};
use dbwork::{
    app::build_app,
    config::{AppConfig, JwtConfig, RegistrationPolicy},
    state::AppState,
    users::{
        memory::InMemoryUserRepository,
        repo::{RepoError, UserRepository},
        repo_types::UserEntity,
    },
};
use serde_json::Value;
use tower::util::ServiceExt;

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: None,
        max_connections: 1,
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "test-issuer".into(),
            audience: "test-aud".into(),
            ttl_minutes: 5,
        },
        registration: RegistrationPolicy {
            min_login_length: 4,
            min_password_length: 8,
        },
    }
}

pub fn test_app() -> (Router, AppState) {
    app_with_repo(Arc::new(InMemoryUserRepository::new()))
}

pub fn app_with_repo(repo: Arc<dyn UserRepository>) -> (Router, AppState) {
    let state = AppState::from_parts(repo, Arc::new(test_config()));
    (build_app(state.clone()), state)
}

/// In-memory store whose read side lags behind its writes, the way a
/// concurrent request sees it between a pre-check and the write.
#[derive(Default)]
pub struct LaggingRepository {
    pub inner: InMemoryUserRepository,
    /// `find_by_login` never sees anything.
    pub hide_logins: bool,
    /// `exists_by_id` answers yes for every id.
    pub claim_every_id: bool,
}

#[async_trait]
impl UserRepository for LaggingRepository {
    async fn find_all(&self) -> Result<Vec<UserEntity>, RepoError> {
        self.inner.find_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserEntity>, RepoError> {
        self.inner.find_by_id(id).await
    }

    async fn find_by_login(&self, login: &str) -> Result<Option<UserEntity>, RepoError> {
        if self.hide_logins {
            return Ok(None);
        }
        self.inner.find_by_login(login).await
    }

    async fn exists_by_id(&self, id: i64) -> Result<bool, RepoError> {
        if self.claim_every_id {
            return Ok(true);
        }
        self.inner.exists_by_id(id).await
    }

    async fn save(&self, user: UserEntity) -> Result<UserEntity, RepoError> {
        self.inner.save(user).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepoError> {
        self.inner.delete(id).await
    }
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn test_user() -> Value {
    serde_json::json!({
        "login": "test-login",
        "password": "test-password",
        "email": "test@example.com",
        "fullName": "Test User"
    })
}

/// Creates a user via `POST /users` and returns its generated id.
pub async fn create_user(app: &Router, body: Value) -> i64 {
    let response = send(app, "POST", "/users", Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["userId"].as_i64().unwrap()
}
