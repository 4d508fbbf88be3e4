use std::fmt;

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::SessionError;

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of an HS256 signature.
pub const SIGNATURE_LEN: usize = 32;

/// The symmetric key used to sign and verify session tokens.
///
/// Holds pre-keyed HMAC-SHA256 state; every signature starts from a clone
/// of it, so a value can be shared freely between threads.  The key is
/// never printed: `Debug` output is redacted.
#[derive(Clone)]
pub struct SessionSecret {
    mac: HmacSha256,
}

impl SessionSecret {
    /// Key the signer with `secret`.
    ///
    /// An empty secret is a configuration error.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, SessionError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(SessionError::Config("session secret must not be empty".into()));
        }
        let mac = HmacSha256::new_from_slice(secret)
            .map_err(|e| SessionError::Config(format!("unusable session secret: {e}")))?;
        Ok(Self { mac })
    }

    /// Random alphanumeric secret suitable for `SESSION_SECRET`.
    pub fn generate(length: usize) -> String {
        const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
        let mut rng = rand::rng();
        (0..length)
            .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
            .collect()
    }

    /// HMAC-SHA256 of `message`.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = self.mac.clone();
        mac.update(message);
        mac.finalize().into_bytes().to_vec()
    }

    /// Recompute the signature of `message` and compare it with `candidate`
    /// in constant time.  A candidate of the wrong length never matches.
    pub fn verify(&self, message: &[u8], candidate: &[u8]) -> bool {
        let expected = self.sign(message);
        expected.as_slice().ct_eq(candidate).into()
    }
}

impl fmt::Debug for SessionSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionSecret(<redacted>)")
    }
}
