use std::time::Duration;

use crate::error::SessionError;
use crate::signer::SessionSecret;

/// Cookie the game client stores its session token in.
pub const DEFAULT_COOKIE_NAME: &str = "bingus_session";

/// Process-wide configuration for issuing and verifying session tokens.
///
/// Build with [`new`](Self::new) or [`from_env`](Self::from_env), then
/// share it (for example as an `axum::Extension`).  It is immutable once
/// built; per-call overrides go through [`SignOptions`] and
/// [`VerifyOptions`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub secret: SessionSecret,
    /// Default lifetime stamped into issued tokens as `exp`.  `None`
    /// issues tokens that never expire by time.
    pub ttl: Option<Duration>,
    pub cookie_name: String,
}

impl SessionConfig {
    /// New config with no default TTL and the standard cookie name.
    ///
    /// Fails with [`SessionError::Config`] if `secret` is empty.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, SessionError> {
        Ok(Self {
            secret: SessionSecret::new(secret)?,
            ttl: None,
            cookie_name: DEFAULT_COOKIE_NAME.into(),
        })
    }

    /// Build from environment variables already set in the process.
    ///
    /// | Variable           | Required | Default            |
    /// |--------------------|----------|--------------------|
    /// | `SESSION_SECRET`   | **yes**  | —                  |
    /// | `SESSION_TTL_SECS` | no       | *(unset, no `exp`)*|
    /// | `SESSION_COOKIE`   | no       | `bingus_session`   |
    pub fn from_env() -> Result<Self, SessionError> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| SessionError::Config("SESSION_SECRET is not set".into()))?;

        let ttl = match std::env::var("SESSION_TTL_SECS") {
            Ok(v) if !v.trim().is_empty() => match v.trim().parse::<u64>() {
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %v, "ignoring unparsable SESSION_TTL_SECS");
                    None
                }
            },
            _ => None,
        };

        let cookie_name = std::env::var("SESSION_COOKIE")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_COOKIE_NAME.into());

        let config = Self::new(secret)?;
        Ok(Self {
            ttl,
            cookie_name,
            ..config
        })
    }

    pub fn secret(mut self, v: SessionSecret) -> Self {
        self.secret = v;
        self
    }
    pub fn ttl(mut self, v: Duration) -> Self {
        self.ttl = Some(v);
        self
    }
    pub fn cookie_name(mut self, v: impl Into<String>) -> Self {
        self.cookie_name = v.into();
        self
    }
}

/// Per-call overrides for issuing a token.  Every field defaults to the
/// config value or the wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignOptions<'a> {
    /// Sign with this secret instead of the config's.
    pub secret: Option<&'a SessionSecret>,
    /// Current time in milliseconds, used for `iat` and the default TTL.
    pub now_ms: Option<i64>,
    /// Explicit `iat` in epoch seconds.
    pub iat: Option<i64>,
    /// Explicit `exp` in epoch seconds.  Takes precedence over the TTL.
    pub exp: Option<i64>,
}

impl<'a> SignOptions<'a> {
    pub fn secret(mut self, v: &'a SessionSecret) -> Self {
        self.secret = Some(v);
        self
    }
    pub fn now_ms(mut self, v: i64) -> Self {
        self.now_ms = Some(v);
        self
    }
    pub fn iat(mut self, v: i64) -> Self {
        self.iat = Some(v);
        self
    }
    pub fn exp(mut self, v: i64) -> Self {
        self.exp = Some(v);
        self
    }
}

/// Per-call overrides for verifying a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyOptions<'a> {
    /// Verify against this secret instead of the config's.
    pub secret: Option<&'a SessionSecret>,
    /// Current time in milliseconds for the expiry check.
    pub now_ms: Option<i64>,
}

impl<'a> VerifyOptions<'a> {
    pub fn secret(mut self, v: &'a SessionSecret) -> Self {
        self.secret = Some(v);
        self
    }
    pub fn now_ms(mut self, v: i64) -> Self {
        self.now_ms = Some(v);
        self
    }
}

/// Wall-clock milliseconds since the Unix epoch.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

/// Whole seconds for a millisecond timestamp, rounding down.
pub fn epoch_secs(ms: i64) -> i64 {
    ms.div_euclid(1000)
}
