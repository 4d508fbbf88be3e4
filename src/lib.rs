//! # bingus-session
//!
//! Stateless signed session tokens for the Bingus game server.
//!
//! A player who registers or identifies a username receives a token; later
//! requests present it and the server checks authenticity and freshness
//! with no session store.  Tokens are three URL-safe base64 segments,
//! `header.payload.signature`, signed with HMAC-SHA256 under one
//! process-wide secret.  The payload carries only `sub`, `iat` and an
//! optional `exp`.
//!
//! This answers "is this token authentic and current", never "what may this
//! player do".
//!
//! ## Usage
//!
//! ```rust
//! use bingus_session::{sign_session_token, verify_session_token, SessionConfig, TokenError};
//!
//! # fn main() -> Result<(), bingus_session::SessionError> {
//! let config = SessionConfig::new("server-secret")?;
//!
//! let token = sign_session_token("PlayerOne", &config).unwrap();
//! let claims = verify_session_token(Some(&*token), &config)?;
//! assert_eq!(claims.sub, "PlayerOne");
//!
//! assert_eq!(verify_session_token(None, &config), Err(TokenError::Missing));
//! assert_eq!(verify_session_token(Some("a.b.c"), &config), Err(TokenError::Invalid));
//! # Ok(())
//! # }
//! ```
//!
//! ## Axum
//!
//! ```rust,no_run
//! use axum::{routing::get, Extension, Router};
//! use bingus_session::{build_session_payload, SessionConfig, SessionPayload, SessionUser};
//!
//! async fn refresh(user: SessionUser, Extension(config): Extension<SessionConfig>) -> SessionPayload {
//!     build_session_payload(&user.subject, &config)
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = SessionConfig::from_env().unwrap();
//!
//!     let app: Router = Router::new()
//!         .route("/api/session", get(refresh))
//!         .layer(Extension(config));
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, app).await.unwrap();
//! }
//! ```
//!
//! ## Environment variables (`SessionConfig::from_env`)
//!
//! This crate does **not** load `.env` files.
//!
//! | Variable           | Required | Default            | Notes                              |
//! |--------------------|----------|--------------------|------------------------------------|
//! | `SESSION_SECRET`   | **yes**  | —                  | HMAC key; never logged             |
//! | `SESSION_TTL_SECS` | no       | *(unset)*          | Stamps `exp = iat + ttl` on issue  |
//! | `SESSION_COOKIE`   | no       | `bingus_session`   | Cookie read by [`SessionUser`]     |

pub mod claims;
pub mod codec;
pub mod config;
pub mod error;
pub mod middleware;
pub mod signer;
pub mod token;

pub use claims::{SessionClaims, SessionHeader};
pub use codec::{base64_url_decode, base64_url_encode};
pub use config::{SessionConfig, SignOptions, VerifyOptions};
pub use error::{SessionError, TokenError};
pub use middleware::{session_cookie, OptionalSessionUser, SessionUser};
pub use signer::SessionSecret;
pub use token::{
    build_session_payload, sign_session_token, sign_session_token_with,
    verify_session_token, verify_session_token_with, SessionPayload,
};
