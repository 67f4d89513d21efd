//! Signed preference cookie.
//!
//! The rover page remembers the last rover a visitor looked at. The value is
//! stored in a cookie signed with HMAC-SHA256 over the session secret:
//!
//! ```text
//! astro_rover=<value>.<hex(HMAC-SHA256(secret, "rover:" + value))>
//! ```
//!
//! Cookies whose signature does not verify are ignored.

use axum::http::{header, HeaderMap, HeaderValue};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Cookie holding the last rover shown.
pub const ROVER_COOKIE: &str = "astro_rover";

/// Cookie lifetime in seconds (30 days).
pub const COOKIE_MAX_AGE: u64 = 30 * 24 * 3600;

/// Signs and verifies cookie values with the session secret.
#[derive(Clone)]
pub struct SessionSigner {
    secret_key: Vec<u8>,
}

impl SessionSigner {
    pub fn new(secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
        }
    }

    /// Produce `value.signature` for cookie `name`.
    pub fn sign(&self, name: &str, value: &str) -> String {
        format!("{}.{}", value, self.compute_signature(name, value))
    }

    /// Return the value of a signed token if its signature matches.
    pub fn verify<'a>(&self, name: &str, token: &'a str) -> Option<&'a str> {
        let (value, signature) = token.rsplit_once('.')?;
        let provided = hex::decode(signature).ok()?;
        let expected = hex::decode(self.compute_signature(name, value)).ok()?;

        if provided.ct_eq(&expected).into() {
            Some(value)
        } else {
            debug!(cookie = name, "Ignoring cookie with invalid signature");
            None
        }
    }

    /// Read and verify a signed cookie from request headers.
    pub fn read_cookie<'a>(&self, headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .and_then(|(_, token)| self.verify(name, token))
    }

    /// Build a `Set-Cookie` header value for a signed cookie.
    pub fn cookie_header(&self, name: &str, value: &str) -> Option<HeaderValue> {
        let cookie = format!(
            "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
            name,
            self.sign(name, value),
            COOKIE_MAX_AGE
        );
        HeaderValue::from_str(&cookie).ok()
    }

    fn compute_signature(&self, name: &str, value: &str) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret_key).expect("HMAC can take key of any size");
        mac.update(name.as_bytes());
        mac.update(b":");
        mac.update(value.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}
