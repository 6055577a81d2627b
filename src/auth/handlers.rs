use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::LoginResponse,
    jwt::JwtKeys,
    password::hash_password,
    validation::{is_valid_email, meets_policy},
};
use crate::{
    error::AppError,
    state::AppState,
    users::{dto::UserDto, repo::RepoError, repo_types::UserEntity},
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/registration", post(register))
        .route("/login", post(login))
}

/// POST /registration: `403` below the length policy, `409` when the login is taken.
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserDto>,
) -> Result<(StatusCode, Json<UserDto>), AppError> {
    let mut user = UserEntity::from(payload);

    if !meets_policy(&user.login, &user.password, &state.config.registration) {
        warn!(login = %user.login, "registration data too short");
        return Err(AppError::Forbidden("registration data too short".into()));
    }

    if let Some(email) = user.email.as_deref() {
        if !is_valid_email(email) {
            warn!(login = %user.login, "invalid email");
            return Err(AppError::BadRequest("invalid email".into()));
        }
    }

    if state.users.is_login_occupied(&user.login).await? {
        warn!(login = %user.login, "login already registered");
        return Err(AppError::Conflict("login already registered".into()));
    }

    user.id = None;
    user.password = hash_password(&user.password)?;

    let saved = state.users.save(user).await.map_err(|e| match e {
        RepoError::Conflict(msg) => {
            warn!(reason = %msg, "login registered concurrently");
            AppError::Conflict(msg)
        }
        other => other.into(),
    })?;

    info!(user_id = ?saved.id, login = %saved.login, "user registered");
    Ok((StatusCode::CREATED, Json(UserDto::from(saved))))
}

/// POST /login: `404` for an unknown login, `403` for a wrong password.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<UserDto>,
) -> Result<Json<LoginResponse>, AppError> {
    let candidate = UserEntity::from(payload);

    let user = match state.users.find_by_login(&candidate.login).await? {
        Some(u) => u,
        None => {
            warn!(login = %candidate.login, "login unknown");
            return Err(AppError::NotFound);
        }
    };

    if !state.users.password_matches(&candidate.password, &user)? {
        warn!(login = %user.login, user_id = ?user.id, "login invalid password");
        return Err(AppError::Forbidden("invalid password".into()));
    }

    let user_id = user
        .id
        .ok_or_else(|| AppError::Internal("stored user has no id".into()))?;
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(user_id, &user.login)?;

    info!(user_id, login = %user.login, "user logged in");
    Ok(Json(LoginResponse { access_token }))
}
