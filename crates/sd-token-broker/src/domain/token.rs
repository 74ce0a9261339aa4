//! # Transaction Tokens
//!
//! `token = hex(HMAC-SHA256(salt, identity))`
//!
//! The token only has to be stable and collision resistant. The salt is a
//! shared system secret, so the token is not a security boundary on its
//! own: the access key is.

use std::fmt;

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Length of a token string (hex-encoded SHA-256 output).
pub const TOKEN_LEN: usize = 64;

/// Handle returned at registration and presented at retrieval.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Derive the token for a payload identity.
    pub fn derive(salt: &str, identity: &str) -> Self {
        let mut mac =
            HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC key size is always valid");
        mac.update(identity.as_bytes());
        Token(hex::encode(mac.finalize().into_bytes()))
    }

    /// Accept a caller-supplied token string if it has the token shape.
    pub fn parse(raw: &str) -> Option<Self> {
        is_well_formed(raw).then(|| Token(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// 64 lowercase hex characters.
pub fn is_well_formed(raw: &str) -> bool {
    raw.len() == TOKEN_LEN
        && raw
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Collapse runs of `/` so that equivalent spellings of a path share a token.
pub fn sanitize_path(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut previous_slash = false;
    for c in raw.chars() {
        if c == '/' {
            if !previous_slash {
                out.push(c);
            }
            previous_slash = true;
        } else {
            out.push(c);
            previous_slash = false;
        }
    }
    out
}
