use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::claims::SessionClaims;
use crate::config::SessionConfig;
use crate::error::{SessionError, TokenError};
use crate::token::verify_session_token;

/// Fallback cookie lifetime when the config has no TTL: one year.
const DEFAULT_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Axum extractor: verifies the player's session token.
///
/// The token is read from `Authorization: Bearer <token>`, falling back to
/// the session cookie named by the config's `cookie_name` when there is no
/// bearer header (an `Authorization` header with another scheme does not
/// count).  The
/// [`SessionConfig`] must be registered as an extension.
///
/// ```rust,no_run
/// use axum::{routing::get, Extension, Router};
/// use bingus_session::{SessionConfig, SessionUser};
///
/// async fn me(user: SessionUser) -> String {
///     format!("hello {}", user.subject)
/// }
///
/// # async fn example() {
/// let config = SessionConfig::from_env().unwrap();
/// let app: Router = Router::new()
///     .route("/api/me", get(me))
///     .layer(Extension(config));
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SessionUser {
    /// Username from `sub`.
    pub subject: String,

    pub claims: SessionClaims,

    /// The raw token as presented.
    pub token: String,
}

impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let config = parts.extensions.get::<SessionConfig>().ok_or_else(|| {
            SessionError::Config(
                "SessionConfig not found: add `.layer(Extension(config))`".into(),
            )
        })?;

        let token = extract_token(parts, &config.cookie_name)?;
        let claims = verify_session_token(token.as_deref(), config)?;

        Ok(SessionUser {
            subject: claims.sub.clone(),
            claims,
            token: token.unwrap_or_default(),
        })
    }
}

/// Like [`SessionUser`] but yields `None` when the request carries no
/// token at all.  A token that is present but bad is still rejected.
#[derive(Debug, Clone)]
pub struct OptionalSessionUser(Option<SessionUser>);

impl OptionalSessionUser {
    pub fn into_inner(self) -> Option<SessionUser> {
        self.0
    }
    pub fn as_ref(&self) -> Option<&SessionUser> {
        self.0.as_ref()
    }
}

impl<S> FromRequestParts<S> for OptionalSessionUser
where
    S: Send + Sync,
{
    type Rejection = SessionError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match SessionUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(Self(Some(user))),
            Err(SessionError::Token(TokenError::Missing)) => Ok(Self(None)),
            Err(e) => Err(e),
        }
    }
}

/// `Set-Cookie` value that stores `token` in the session cookie.
pub fn session_cookie(token: &str, config: &SessionConfig) -> String {
    let max_age = config
        .ttl
        .map(|ttl| ttl.as_secs())
        .unwrap_or(DEFAULT_COOKIE_MAX_AGE);
    format!(
        "{}={token}; Max-Age={max_age}; Path=/; SameSite=Lax; HttpOnly",
        config.cookie_name
    )
}

/// Bearer header first, then the named cookie.  `Ok(None)` when neither
/// carries a token.  An `Authorization` header with another scheme (say,
/// `Basic` from a proxy) is skipped in favour of the cookie.
fn extract_token(parts: &Parts, cookie_name: &str) -> Result<Option<String>, TokenError> {
    if let Some(header) = parts.headers.get(http::header::AUTHORIZATION) {
        let header = header.to_str().map_err(|_| TokenError::Invalid)?;
        if let Some(token) = header.strip_prefix("Bearer ") {
            return Ok(Some(token.trim().to_owned()));
        }
    }

    let cookie = parts
        .headers
        .get_all(http::header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|header| find_cookie(header, cookie_name));
    Ok(cookie)
}

/// Value of cookie `name`, percent-decoded.  A value that does not decode
/// is returned as sent.
fn find_cookie(header: &str, name: &str) -> Option<String> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        let v = v.trim();
        (k.trim() == name).then(|| {
            urlencoding::decode(v)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| v.to_owned())
        })
    })
}
