//! Registration and login flows over the full router
mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{app_with_repo, body_json, send, test_app, test_user, LaggingRepository};
use dbwork::auth::jwt::JwtKeys;
use serde_json::json;

#[tokio::test]
async fn test_successfully_registered() {
    let (app, state) = test_app();

    let response = send(&app, "POST", "/registration", Some(test_user())).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await;
    assert_eq!(body["login"], "test-login");
    assert!(body.get("password").is_none());

    let stored = state
        .users
        .find_by_login("test-login")
        .await
        .unwrap()
        .expect("registered user is stored");
    assert_ne!(stored.password, "test-password");
}

#[tokio::test]
async fn test_too_short_registration_data() {
    let (app, _) = test_app();

    let short_login = json!({ "login": "abc", "password": "long-enough-password" });
    let response = send(&app, "POST", "/registration", Some(short_login)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let short_password = json!({ "login": "long-login", "password": "short" });
    let response = send(&app, "POST", "/registration", Some(short_password)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let missing = json!({});
    let response = send(&app, "POST", "/registration", Some(missing)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_login_is_occupied() {
    let (app, _) = test_app();

    let first = send(&app, "POST", "/registration", Some(test_user())).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send(&app, "POST", "/registration", Some(test_user())).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_login_taken_between_check_and_insert_conflicts() {
    let repo = LaggingRepository {
        hide_logins: true,
        ..Default::default()
    };
    let (app, state) = app_with_repo(Arc::new(repo));

    let first = send(&app, "POST", "/registration", Some(test_user())).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = send(&app, "POST", "/registration", Some(test_user())).await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(state.users.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_registration_rejects_bad_email() {
    let (app, _) = test_app();

    let body = json!({ "login": "emailless", "password": "long-enough", "email": "nope" });
    let response = send(&app, "POST", "/registration", Some(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_correct_login_responses() {
    let (app, state) = test_app();
    let response = send(&app, "POST", "/registration", Some(test_user())).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user_id = body_json(response).await["userId"].as_i64().unwrap();

    // OK
    let response = send(&app, "POST", "/login", Some(test_user())).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["accessToken"].as_str().expect("accessToken is a string");
    assert!(!token.is_empty());

    let claims = JwtKeys::from_config(&state.config.jwt)
        .verify(token)
        .expect("issued token verifies");
    assert_eq!(claims.sub, user_id);
    assert_eq!(claims.login, "test-login");

    // FORBIDDEN
    let mut wrong_password = test_user();
    wrong_password["password"] = json!("incorrect-password");
    let response = send(&app, "POST", "/login", Some(wrong_password)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // NOT FOUND
    let mut unknown = test_user();
    unknown["login"] = json!("not-existing-login");
    let response = send(&app, "POST", "/login", Some(unknown)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (app, _) = test_app();

    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/login")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = tower::util::ServiceExt::oneshot(app, request).await.unwrap();
    assert!(response.status().is_client_error());
}
