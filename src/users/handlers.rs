use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{dto::UserDto, repo::RepoError, repo_types::UserEntity};
use crate::{
    auth::{password::hash_password, validation::is_valid_email},
    error::AppError,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/auth", post(check_auth))
        .route("/users", post(create_user).get(list_users))
        .route(
            "/users/:user_id",
            get(get_user)
                .put(full_update_user)
                .patch(partial_update_user)
                .delete(delete_user),
        )
}

/// POST /auth: `200 true` when login and password match a stored user, else `401 false`.
#[instrument(skip(state, payload))]
pub async fn check_auth(
    State(state): State<AppState>,
    Json(payload): Json<UserDto>,
) -> Result<(StatusCode, Json<bool>), AppError> {
    let candidate = UserEntity::from(payload);
    if state.users.is_user_exists(&candidate).await? {
        Ok((StatusCode::OK, Json(true)))
    } else {
        warn!(login = %candidate.login, "auth check failed");
        Ok((StatusCode::UNAUTHORIZED, Json(false)))
    }
}

/// POST /users. A taken login answers `409` with the submitted body.
#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserDto>,
) -> Result<Response, AppError> {
    let mut user = UserEntity::from(payload.clone());
    require_credentials(&user)?;
    require_valid_email(&user)?;

    if state.users.is_login_occupied(&user.login).await? {
        warn!(login = %user.login, "login occupied");
        return Ok((StatusCode::CONFLICT, Json(payload)).into_response());
    }

    // ids are generated by the store
    user.id = None;
    user.password = hash_password(&user.password)?;

    match state.users.save(user).await {
        Ok(saved) => {
            info!(user_id = ?saved.id, login = %saved.login, "user created");
            Ok((StatusCode::CREATED, Json(UserDto::from(saved))).into_response())
        }
        Err(RepoError::Conflict(msg)) => {
            warn!(reason = %msg, "login taken concurrently");
            Ok((StatusCode::CONFLICT, Json(payload)).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserDto>>, AppError> {
    let users = state.users.find_all().await?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<UserDto>, AppError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(UserDto::from(user)))
}

/// PUT /users/{id}: replaces every field; the path id wins over the body.
#[instrument(skip(state, payload))]
pub async fn full_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(mut payload): Json<UserDto>,
) -> Result<Json<UserDto>, AppError> {
    if !state.users.is_exists(user_id).await? {
        return Err(AppError::NotFound);
    }

    payload.user_id = Some(user_id);
    let mut user = UserEntity::from(payload);
    require_credentials(&user)?;
    require_valid_email(&user)?;
    user.password = hash_password(&user.password)?;

    let saved = state.users.save(user).await?;
    info!(user_id, "user replaced");
    Ok(Json(UserDto::from(saved)))
}

/// PATCH /users/{id}: only the supplied fields change.
#[instrument(skip(state, payload))]
pub async fn partial_update_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(mut payload): Json<UserDto>,
) -> Result<Json<UserDto>, AppError> {
    if !state.users.is_exists(user_id).await? {
        return Err(AppError::NotFound);
    }

    payload.user_id = Some(user_id);
    let mut changes = UserEntity::from(payload);
    require_valid_email(&changes)?;
    if !changes.password.is_empty() {
        changes.password = hash_password(&changes.password)?;
    }

    let saved = state.users.partial_update(user_id, changes).await?;
    info!(user_id, "user patched");
    Ok(Json(UserDto::from(saved)))
}

/// DELETE /users/{id}: `204` whether or not the user existed.
#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    state.users.delete(user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn require_credentials(user: &UserEntity) -> Result<(), AppError> {
    if user.login.is_empty() || user.password.is_empty() {
        return Err(AppError::BadRequest("login and password are required".into()));
    }
    Ok(())
}

fn require_valid_email(user: &UserEntity) -> Result<(), AppError> {
    match user.email.as_deref() {
        Some(email) if !is_valid_email(email) => {
            Err(AppError::BadRequest("invalid email".into()))
        }
        _ => Ok(()),
    }
}
