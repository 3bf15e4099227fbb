//! API credentials injected into every request.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

/// Wire names of the three credential fields.
pub const IDENTIFIER_KEY: &str = "identifier";
pub const SECRET_KEY: &str = "secret";
pub const ACCESS_KEY_KEY: &str = "accesskey";

/// Identifier, secret and access key for the remote API.
///
/// Values are opaque and accepted as-is; the remote side is the only
/// judge of whether they are valid.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Auth {
    identifier: String,
    secret: String,
    #[serde(rename = "accesskey")]
    access_key: String,
}

impl Auth {
    pub fn new(
        identifier: impl Into<String>,
        secret: impl Into<String>,
        access_key: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
            access_key: access_key.into(),
        }
    }

    /// Build from a map keyed by the wire names. Missing keys are empty.
    pub fn from_map(map: &HashMap<String, String>) -> Self {
        let get = |key: &str| map.get(key).cloned().unwrap_or_default();
        Self {
            identifier: get(IDENTIFIER_KEY),
            secret: get(SECRET_KEY),
            access_key: get(ACCESS_KEY_KEY),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// The `(wire key, value)` pairs sent with every call.
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            (IDENTIFIER_KEY, &self.identifier),
            (SECRET_KEY, &self.secret),
            (ACCESS_KEY_KEY, &self.access_key),
        ]
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("identifier", &mask(&self.identifier))
            .field("secret", &mask(&self.secret))
            .field("access_key", &mask(&self.access_key))
            .finish()
    }
}

/// Mask a credential for logs, keeping at most the first and last 4 chars.
pub(crate) fn mask(value: &str) -> String {
    let len = value.chars().count();
    if len <= 8 {
        return "*".repeat(len);
    }
    let head: String = value.chars().take(4).collect();
    let tail: String = value.chars().skip(len - 4).collect();
    format!("{head}...{tail}")
}
