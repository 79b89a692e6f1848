//! Cookie record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored cookie. `value` is plaintext in caller hands and ciphertext
/// whenever the record is resident in a store or on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Sole identity within a store; at most one record per name.
    pub name: String,
    #[serde(with = "base64_bytes")]
    pub value: Vec<u8>,
    /// Scoping hint only; not used for access control.
    #[serde(default)]
    pub domain: String,
    pub expires: DateTime<Utc>,
    #[serde(default)]
    pub max_age: i64,
    #[serde(default)]
    pub http_only: bool,
}

impl Cookie {
    /// Whether the cookie should be treated as expired. A non-positive
    /// max-age marks a cookie deletable regardless of its expiry time.
    /// The store never enforces this; callers decide when to purge.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.max_age <= 0 || self.expires <= now
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        STANDARD.decode(s.as_bytes()).map_err(serde::de::Error::custom)
    }
}
