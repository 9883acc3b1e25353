use super::*;
use crate::config::AuthTimeouts;

use std::collections::HashMap;

use axum::extract::Query;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

const USER_ID: &str = "8f14e45f-ceea-467f-a0e6-3d3e2b7a4c10";

// =============================================================================
// auth_endpoint
// =============================================================================

#[test]
fn auth_endpoint_joins_without_double_slashes() {
    assert_eq!(auth_endpoint("https://abc.supabase.co", "user"), "https://abc.supabase.co/auth/v1/user");
    assert_eq!(auth_endpoint("https://abc.supabase.co/", "/token"), "https://abc.supabase.co/auth/v1/token");
}

// =============================================================================
// api_error
// =============================================================================

#[test]
fn api_error_prefers_msg() {
    let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
    assert_eq!(
        api_error(400, body),
        AuthError::Api { status: 400, message: "Invalid login credentials".into() }
    );
}

#[test]
fn api_error_reads_legacy_error_description() {
    let body = r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#;
    assert_eq!(api_error(400, body).to_string(), "Email not confirmed");
}

#[test]
fn api_error_falls_back_to_error_code() {
    let body = r#"{"error":"over_request_rate_limit"}"#;
    assert_eq!(api_error(429, body).to_string(), "over_request_rate_limit");
}

#[test]
fn api_error_skips_blank_messages() {
    let body = r#"{"msg":"  ","message":"User already registered"}"#;
    assert_eq!(api_error(422, body).to_string(), "User already registered");
}

#[test]
fn api_error_non_json_body_uses_status() {
    let err = api_error(502, "<html>Bad Gateway</html>");
    assert_eq!(err.status(), Some(502));
    assert_eq!(err.to_string(), "auth service returned status 502");
}

// =============================================================================
// parse_session / parse_user / parse_sign_up
// =============================================================================

fn session_json(access_token: &str) -> serde_json::Value {
    json!({
        "access_token": access_token,
        "token_type": "bearer",
        "expires_in": 3600,
        "expires_at": 1_700_000_000,
        "refresh_token": "rt-next",
        "user": { "id": USER_ID, "email": "test@test.com" }
    })
}

#[test]
fn parse_session_reads_token_response() {
    let session = parse_session(&session_json("at-1").to_string()).unwrap();
    assert_eq!(session.access_token, "at-1");
    assert_eq!(session.refresh_token.as_deref(), Some("rt-next"));
    assert_eq!(session.user.email.as_deref(), Some("test@test.com"));
}

#[test]
fn parse_session_rejects_missing_user() {
    let err = parse_session(r#"{"access_token":"at"}"#).unwrap_err();
    assert!(matches!(err, AuthError::Parse(_)));
}

#[test]
fn parse_user_rejects_bad_uuid() {
    assert!(matches!(parse_user(r#"{"id":"nope"}"#), Err(AuthError::Parse(_))));
}

#[test]
fn parse_sign_up_bare_user_is_pending() {
    let body = json!({ "id": USER_ID, "email": "new@test.com", "confirmation_sent_at": "2024-01-01T00:00:00Z" });
    let resp = parse_sign_up(&body.to_string()).unwrap();
    assert!(resp.confirmation_pending());
    assert_eq!(resp.user.email.as_deref(), Some("new@test.com"));
}

#[test]
fn parse_sign_up_nested_user_is_pending() {
    let body = json!({ "user": { "id": USER_ID, "email": "new@test.com" }, "session": null });
    let resp = parse_sign_up(&body.to_string()).unwrap();
    assert!(resp.confirmation_pending());
    assert_eq!(resp.user.id.to_string(), USER_ID);
}

#[test]
fn parse_sign_up_auto_confirmed_carries_session() {
    let resp = parse_sign_up(&session_json("at-auto").to_string()).unwrap();
    assert!(!resp.confirmation_pending());
    assert_eq!(resp.session.as_ref().map(|s| s.access_token.as_str()), Some("at-auto"));
    assert_eq!(resp.user.email.as_deref(), Some("test@test.com"));
}

#[test]
fn parse_sign_up_garbage_errors() {
    assert!(matches!(parse_sign_up("not json"), Err(AuthError::Parse(_))));
}

// =============================================================================
// SupabaseAuth against a local fake GoTrue
// =============================================================================

fn bearer(headers: &HeaderMap) -> &str {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
}

fn gotrue_error(status: StatusCode, msg: &str) -> Response {
    (status, Json(json!({ "code": status.as_u16(), "msg": msg }))).into_response()
}

async fn fake_user(headers: HeaderMap) -> Response {
    if headers.get("apikey").and_then(|v| v.to_str().ok()) != Some("anon") {
        return gotrue_error(StatusCode::UNAUTHORIZED, "No API key found in request");
    }
    match bearer(&headers) {
        "good" | "refreshed" => Json(json!({ "id": USER_ID, "email": "test@test.com" })).into_response(),
        "boom" => gotrue_error(StatusCode::INTERNAL_SERVER_ERROR, "database unavailable"),
        "not-found" => gotrue_error(StatusCode::NOT_FOUND, "user not found"),
        _ => gotrue_error(StatusCode::UNAUTHORIZED, "invalid JWT: token is expired"),
    }
}

async fn fake_token(Query(query): Query<HashMap<String, String>>, Json(body): Json<serde_json::Value>) -> Response {
    match query.get("grant_type").map(String::as_str) {
        Some("password") => {
            if body["email"] == "test@test.com" && body["password"] == "password123" {
                Json(session_json("good")).into_response()
            } else {
                gotrue_error(StatusCode::BAD_REQUEST, "Invalid login credentials")
            }
        }
        Some("refresh_token") => {
            if body["refresh_token"] == "rt-valid" {
                Json(session_json("refreshed")).into_response()
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "invalid_grant", "error_description": "Invalid Refresh Token" })),
                )
                    .into_response()
            }
        }
        _ => gotrue_error(StatusCode::BAD_REQUEST, "unsupported grant_type"),
    }
}

async fn fake_signup(Query(query): Query<HashMap<String, String>>, Json(body): Json<serde_json::Value>) -> Response {
    if body["email"] == "taken@test.com" {
        return gotrue_error(StatusCode::UNPROCESSABLE_ENTITY, "User already registered");
    }
    let email = body["email"].as_str().unwrap_or_default().to_owned();
    Json(json!({ "id": USER_ID, "email": email, "redirect_seen": query.get("redirect_to") })).into_response()
}

async fn fake_logout(headers: HeaderMap) -> StatusCode {
    if bearer(&headers) == "good" { StatusCode::NO_CONTENT } else { StatusCode::UNAUTHORIZED }
}

async fn spawn_fake_gotrue() -> String {
    let app = Router::new()
        .route("/auth/v1/user", get(fake_user))
        .route("/auth/v1/token", post(fake_token))
        .route("/auth/v1/signup", post(fake_signup))
        .route("/auth/v1/logout", post(fake_logout));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn client_for(url: String) -> SupabaseAuth {
    SupabaseAuth::new(&SupabaseConfig {
        url,
        anon_key: "anon".into(),
        redirect_to: Some("http://localhost:3000".into()),
        timeouts: AuthTimeouts { request_secs: 5, connect_secs: 5 },
    })
    .unwrap()
}

fn tokens(access: &str, refresh: Option<&str>) -> SessionTokens {
    SessionTokens { access_token: access.into(), refresh_token: refresh.map(str::to_owned) }
}

#[tokio::test]
async fn sign_in_success_returns_session() {
    let auth = client_for(spawn_fake_gotrue().await);
    let session = auth.sign_in_with_password("test@test.com", "password123").await.unwrap();
    assert_eq!(session.access_token, "good");
    assert_eq!(session.user.id.to_string(), USER_ID);
}

#[tokio::test]
async fn sign_in_bad_credentials_surfaces_message() {
    let auth = client_for(spawn_fake_gotrue().await);
    let err = auth.sign_in_with_password("test@test.com", "wrong").await.unwrap_err();
    assert_eq!(err, AuthError::Api { status: 400, message: "Invalid login credentials".into() });
}

#[tokio::test]
async fn sign_up_pending_confirmation() {
    let auth = client_for(spawn_fake_gotrue().await);
    let resp = auth.sign_up("new@test.com", "Password123!").await.unwrap();
    assert!(resp.confirmation_pending());
    assert_eq!(resp.user.email.as_deref(), Some("new@test.com"));
}

#[tokio::test]
async fn sign_up_conflict_surfaces_message() {
    let auth = client_for(spawn_fake_gotrue().await);
    let err = auth.sign_up("taken@test.com", "Password123!").await.unwrap_err();
    assert_eq!(err.to_string(), "User already registered");
    assert_eq!(err.status(), Some(422));
}

#[tokio::test]
async fn get_session_valid_access_token() {
    let auth = client_for(spawn_fake_gotrue().await);
    let session = auth.get_session(&tokens("good", Some("rt-valid"))).await.unwrap().unwrap();
    assert_eq!(session.access_token, "good");
    assert_eq!(session.refresh_token.as_deref(), Some("rt-valid"));
}

#[tokio::test]
async fn get_session_expired_token_refreshes() {
    let auth = client_for(spawn_fake_gotrue().await);
    let session = auth.get_session(&tokens("stale", Some("rt-valid"))).await.unwrap().unwrap();
    assert_eq!(session.access_token, "refreshed");
    assert_eq!(session.refresh_token.as_deref(), Some("rt-next"));
}

#[tokio::test]
async fn get_session_expired_without_refresh_is_none() {
    let auth = client_for(spawn_fake_gotrue().await);
    assert!(auth.get_session(&tokens("stale", None)).await.unwrap().is_none());
}

#[tokio::test]
async fn get_session_revoked_refresh_token_is_none() {
    let auth = client_for(spawn_fake_gotrue().await);
    assert!(auth.get_session(&tokens("stale", Some("rt-revoked"))).await.unwrap().is_none());
}

#[tokio::test]
async fn get_session_other_client_error_does_not_refresh() {
    let auth = client_for(spawn_fake_gotrue().await);
    let err = auth.get_session(&tokens("not-found", Some("rt-valid"))).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn get_session_server_error_propagates() {
    let auth = client_for(spawn_fake_gotrue().await);
    let err = auth.get_session(&tokens("boom", Some("rt-valid"))).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn get_session_unreachable_backend_is_request_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let auth = client_for(format!("http://{addr}"));
    let err = auth.get_session(&tokens("good", None)).await.unwrap_err();
    assert!(matches!(err, AuthError::Request(_)));
}

#[tokio::test]
async fn sign_out_revokes_with_user_token() {
    let auth = client_for(spawn_fake_gotrue().await);
    auth.sign_out("good").await.unwrap();
    assert_eq!(auth.sign_out("other").await.unwrap_err().status(), Some(401));
}
