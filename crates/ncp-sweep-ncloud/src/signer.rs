//! API gateway request signing
//!
//! Every call carries an HMAC-SHA256 signature over
//! `"{method} {path}\n{timestamp}\n{access_key}"`, keyed with the secret key
//! and base64 encoded. `path` is the request path including its query string.

use crate::error::{NcloudError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

pub const HEADER_TIMESTAMP: &str = "x-ncp-apigw-timestamp";
pub const HEADER_ACCESS_KEY: &str = "x-ncp-iam-access-key";
pub const HEADER_SIGNATURE: &str = "x-ncp-apigw-signature-v2";

/// Access key / secret key pair that signs requests.
#[derive(Clone)]
pub struct Signer {
    access_key: String,
    secret_key: String,
}

impl Signer {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Signature for `method` on `path` at `timestamp` (milliseconds since epoch).
    pub fn sign(&self, method: &str, path: &str, timestamp: &str) -> Result<String> {
        let message = format!("{} {}\n{}\n{}", method, path, timestamp, self.access_key);
        let mut mac = HmacSha256::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| NcloudError::InvalidCredentials(e.to_string()))?;
        mac.update(message.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer")
            .field("access_key", &self.access_key)
            .field("secret_key", &"***")
            .finish()
    }
}

/// The part of `url` that is signed: everything from the third `/` on.
pub fn sign_path(url: &str) -> &str {
    url.match_indices('/')
        .nth(2)
        .map(|(i, _)| &url[i..])
        .unwrap_or("/")
}

/// Current time as the gateway expects it.
pub fn timestamp_millis() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}
