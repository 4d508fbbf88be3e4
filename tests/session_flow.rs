use axum::body::to_bytes;
use axum::extract::FromRequestParts;
use axum::response::IntoResponse;
use http::{header, Request, StatusCode};

use bingus_session::{
    build_session_payload, session_cookie, sign_session_token, sign_session_token_with,
    OptionalSessionUser, SessionConfig, SessionError, SessionUser, SignOptions, TokenError,
};

fn config() -> SessionConfig {
    SessionConfig::new("integration-secret").unwrap()
}

fn parts_with(
    config: Option<&SessionConfig>,
    headers: &[(header::HeaderName, &str)],
) -> http::request::Parts {
    let mut builder = Request::builder().uri("/api/sync");
    for (name, value) in headers {
        builder = builder.header(name, *value);
    }
    let mut req = builder.body(()).unwrap();
    if let Some(cfg) = config {
        req.extensions_mut().insert(cfg.clone());
    }
    req.into_parts().0
}

#[tokio::test]
async fn bearer_token_authenticates() {
    let cfg = config();
    let token = sign_session_token("PlayerOne", &cfg).unwrap();
    let bearer = format!("Bearer {token}");
    let mut parts = parts_with(Some(&cfg), &[(header::AUTHORIZATION, bearer.as_str())]);

    let user = SessionUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.subject, "PlayerOne");
    assert_eq!(user.claims.sub, "PlayerOne");
    assert_eq!(user.token, token);
}

#[tokio::test]
async fn session_cookie_authenticates() {
    let cfg = config();
    let token = sign_session_token("Syncer", &cfg).unwrap();
    let cookie = format!("sugar=Syncer; bingus_session={token}");
    let mut parts = parts_with(Some(&cfg), &[(header::COOKIE, cookie.as_str())]);

    let user = SessionUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.subject, "Syncer");
}

#[tokio::test]
async fn set_cookie_value_is_read_back() {
    let cfg = config().cookie_name("sid");
    let token = sign_session_token("Syncer", &cfg).unwrap();
    let set_cookie = session_cookie(&token, &cfg);
    let pair = set_cookie.split(';').next().unwrap();
    let mut parts = parts_with(Some(&cfg), &[(header::COOKIE, pair)]);

    let user = SessionUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.subject, "Syncer");
}

#[tokio::test]
async fn no_token_is_missing() {
    let cfg = config();
    let mut parts = parts_with(Some(&cfg), &[]);
    let err = SessionUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert!(matches!(err, SessionError::Token(TokenError::Missing)));
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_bearer_authorization_falls_back_to_cookie() {
    let cfg = config();
    let token = sign_session_token("Syncer", &cfg).unwrap();
    let cookie = format!("bingus_session={token}");
    let mut parts = parts_with(
        Some(&cfg),
        &[
            (header::AUTHORIZATION, "Basic dXNlcjpwYXNz"),
            (header::COOKIE, cookie.as_str()),
        ],
    );
    let user = SessionUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.subject, "Syncer");
}

#[tokio::test]
async fn non_bearer_authorization_alone_is_missing() {
    let cfg = config();
    let mut parts = parts_with(Some(&cfg), &[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
    let err = SessionUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert!(matches!(err, SessionError::Token(TokenError::Missing)));
}

#[tokio::test]
async fn expired_cookie_is_rejected() {
    let cfg = config();
    let token =
        sign_session_token_with("PlayerOne", &cfg, SignOptions::default().exp(1)).unwrap();
    let cookie = format!("bingus_session={token}");
    let mut parts = parts_with(Some(&cfg), &[(header::COOKIE, cookie.as_str())]);

    let err = SessionUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert!(matches!(err, SessionError::Token(TokenError::Expired)));

    let res = err.into_response();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["ok"], false);
    assert_eq!(json["error"], "expired");
}

#[tokio::test]
async fn token_from_another_server_is_invalid() {
    let other = SessionConfig::new("someone-elses-secret").unwrap();
    let token = sign_session_token("PlayerOne", &other).unwrap();
    let bearer = format!("Bearer {token}");
    let mut parts = parts_with(Some(&config()), &[(header::AUTHORIZATION, bearer.as_str())]);

    let err = SessionUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert!(matches!(err, SessionError::Token(TokenError::Invalid)));
}

#[tokio::test]
async fn missing_config_is_a_server_error() {
    let mut parts = parts_with(None, &[(header::AUTHORIZATION, "Bearer a.b.c")]);
    let err = SessionUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert!(matches!(err, SessionError::Config(_)));
    assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn optional_user_absent_without_token() {
    let cfg = config();
    let mut parts = parts_with(Some(&cfg), &[(header::COOKIE, "sugar=PlayerOne")]);
    let user = OptionalSessionUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert!(user.as_ref().is_none());
}

#[tokio::test]
async fn optional_user_still_rejects_bad_tokens() {
    let cfg = config();
    let mut parts = parts_with(Some(&cfg), &[(header::COOKIE, "bingus_session=a.b.c")]);
    let err = OptionalSessionUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert!(matches!(err, SessionError::Token(TokenError::Invalid)));
}

#[tokio::test]
async fn optional_user_present_with_token() {
    let cfg = config();
    let token = sign_session_token("PlayerOne", &cfg).unwrap();
    let cookie = format!("bingus_session={token}");
    let mut parts = parts_with(Some(&cfg), &[(header::COOKIE, cookie.as_str())]);
    let user = OptionalSessionUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.into_inner().map(|u| u.subject).as_deref(), Some("PlayerOne"));
}

#[tokio::test]
async fn session_payload_response_body() {
    let cfg = config();
    let res = build_session_payload("PlayerOne", &cfg).into_response();
    assert_eq!(res.status(), StatusCode::OK);

    let body = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    let token = json["sessionToken"].as_str().unwrap();
    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments.len(), 3);
    assert!(segments.iter().all(|s| !s.is_empty()));

    let bearer = format!("Bearer {token}");
    let mut parts = parts_with(Some(&cfg), &[(header::AUTHORIZATION, bearer.as_str())]);
    let user = SessionUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.subject, "PlayerOne");
}
