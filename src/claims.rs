use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};

use crate::codec::{decode_segment, encode_segment};

/// The only signing scheme this crate issues or accepts.
pub const ALGORITHM: &str = "HS256";

/// Token type tag carried in the header.
pub const TOKEN_TYPE: &str = "JWT";

/// First token segment: names the signing scheme.
///
/// Sent in clear (encoded) form.  Verification rejects any `alg` other
/// than [`ALGORITHM`]; there is no negotiation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHeader {
    pub alg: String,
    pub typ: String,
}

impl Default for SessionHeader {
    fn default() -> Self {
        Self {
            alg: ALGORITHM.into(),
            typ: TOKEN_TYPE.into(),
        }
    }
}

/// Second token segment: who the token is for and how long it lives.
///
/// Unknown keys are ignored when decoding.  An `iat` or `exp` that is not
/// an integer (including an explicit `null`) fails to decode, which
/// verification reports as invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// The player's username.
    pub sub: String,

    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,

    /// Expiry, seconds since the Unix epoch.  `None` never expires by time.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "integer_if_present"
    )]
    pub exp: Option<i64>,
}

/// Absent field is `None` via `#[serde(default)]`; a present one must be an
/// integer, so `"exp": null` is an error rather than "never expires".
fn integer_if_present<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i64>, D::Error> {
    i64::deserialize(d).map(Some)
}

impl SessionClaims {
    /// The raw subject string.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    /// Whether the token has expired at `now_secs`.
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.exp.is_some_and(|exp| now_secs >= exp)
    }
}

/// Serialize `record` to compact JSON and encode it as a token segment.
///
/// Field order follows the struct definition, so the same logical record
/// always produces the same bytes.
pub fn encode_record<T: Serialize>(record: &T) -> Result<String, serde_json::Error> {
    serde_json::to_vec(record).map(|bytes| encode_segment(&bytes))
}

/// Decode a token segment produced by [`encode_record`].
///
/// `None` if the segment is not valid base64 or not the expected shape.
pub fn decode_record<T: DeserializeOwned>(segment: &str) -> Option<T> {
    let bytes = decode_segment(segment).ok()?;
    serde_json::from_slice(&bytes).ok()
}
