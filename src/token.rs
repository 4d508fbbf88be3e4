use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::claims::{decode_record, encode_record, SessionClaims, SessionHeader, ALGORITHM};
use crate::codec::{decode_segment, encode_segment};
use crate::config::{epoch_secs, now_ms, SessionConfig, SignOptions, VerifyOptions};
use crate::error::TokenError;

/// Issue a session token for `subject` using the config's secret, clock
/// and default TTL.
///
/// Returns `None` when `subject` is empty.  See [`sign_session_token_with`]
/// to override the secret, clock or expiry.
pub fn sign_session_token(subject: &str, config: &SessionConfig) -> Option<String> {
    sign_session_token_with(subject, config, SignOptions::default())
}

/// Issue a session token with per-call overrides.
///
/// ```rust
/// use bingus_session::{sign_session_token_with, SessionConfig, SignOptions};
///
/// # fn main() -> Result<(), bingus_session::SessionError> {
/// let config = SessionConfig::new("secret")?;
/// let token = sign_session_token_with(
///     "PlayerOne",
///     &config,
///     SignOptions::default().now_ms(1_700_000_000_000).exp(1_700_003_600),
/// );
/// assert_eq!(token.map(|t| t.split('.').count()), Some(3));
/// # Ok(())
/// # }
/// ```
pub fn sign_session_token_with(
    subject: &str,
    config: &SessionConfig,
    options: SignOptions<'_>,
) -> Option<String> {
    if subject.is_empty() {
        return None;
    }

    let secret = options.secret.unwrap_or(&config.secret);
    let iat = options
        .iat
        .unwrap_or_else(|| epoch_secs(options.now_ms.unwrap_or_else(now_ms)));
    let exp = options.exp.or_else(|| {
        config
            .ttl
            .map(|ttl| iat.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)))
    });

    let claims = SessionClaims {
        sub: subject.to_owned(),
        iat,
        exp,
    };

    let (header, payload) = match (encode_record(&SessionHeader::default()), encode_record(&claims)) {
        (Ok(h), Ok(p)) => (h, p),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "failed to encode session token segment");
            return None;
        }
    };

    let signing_input = format!("{header}.{payload}");
    let signature = encode_segment(&secret.sign(signing_input.as_bytes()));
    Some(format!("{signing_input}.{signature}"))
}

/// Verify a session token using the config's secret and the wall clock.
///
/// `None` and the empty string are [`TokenError::Missing`].
pub fn verify_session_token(
    token: Option<&str>,
    config: &SessionConfig,
) -> Result<SessionClaims, TokenError> {
    verify_session_token_with(token, config, VerifyOptions::default())
}

/// Verify a session token with per-call overrides.
///
/// Every structural, decoding or signature failure is reported as
/// [`TokenError::Invalid`]; an authentic token past its `exp` is
/// [`TokenError::Expired`].  Never panics on untrusted input.
pub fn verify_session_token_with(
    token: Option<&str>,
    config: &SessionConfig,
    options: VerifyOptions<'_>,
) -> Result<SessionClaims, TokenError> {
    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => return Err(TokenError::Missing),
    };

    let mut segments = token.split('.');
    let (header_b64, payload_b64, signature_b64) =
        match (segments.next(), segments.next(), segments.next(), segments.next()) {
            (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() && !s.is_empty() => {
                (h, p, s)
            }
            _ => return Err(reject("malformed")),
        };

    let signature = decode_segment(signature_b64).map_err(|_| reject("undecodable signature"))?;

    // Sign the received text verbatim, not a re-serialization of it.
    let secret = options.secret.unwrap_or(&config.secret);
    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
    if !secret.verify(signing_input.as_bytes(), &signature) {
        return Err(reject("signature mismatch"));
    }

    let header: SessionHeader = decode_record(header_b64).ok_or_else(|| reject("bad header"))?;
    if header.alg != ALGORITHM {
        return Err(reject("unsupported algorithm"));
    }

    let claims: SessionClaims = decode_record(payload_b64).ok_or_else(|| reject("bad payload"))?;
    if claims.sub.is_empty() {
        return Err(reject("empty subject"));
    }

    let now = epoch_secs(options.now_ms.unwrap_or_else(now_ms));
    if claims.is_expired_at(now) {
        tracing::debug!(sub = %claims.sub, "session token expired");
        return Err(TokenError::Expired);
    }

    Ok(claims)
}

fn reject(reason: &'static str) -> TokenError {
    tracing::debug!(reason, "session token rejected");
    TokenError::Invalid
}

/// Response fragment delivering a freshly issued token to the client.
///
/// Serializes as `{"sessionToken": "..."}`, or `{"sessionToken": null}`
/// when no token could be issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
    pub session_token: Option<String>,
}

impl IntoResponse for SessionPayload {
    fn into_response(self) -> Response {
        axum::Json(self).into_response()
    }
}

/// Issue a token for `subject` and wrap it for a response body.
pub fn build_session_payload(subject: &str, config: &SessionConfig) -> SessionPayload {
    SessionPayload {
        session_token: sign_session_token(subject, config),
    }
}
