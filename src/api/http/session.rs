// src/api/http/session.rs
// `sid` cookie: reading, signing, and issuing the session token.

use axum::http::header::{InvalidHeaderValue, COOKIE};
use axum::http::{HeaderMap, HeaderValue};
use sha2::{Digest, Sha256};

pub const SESSION_COOKIE: &str = "sid";

/// Hex chars kept from the SHA-256 signature.
const SIGNATURE_LEN: usize = 32;

#[derive(Clone)]
pub struct SessionCookies {
    secret: String,
}

impl SessionCookies {
    pub fn new(secret: impl Into<String>) -> Self {
        Self { secret: secret.into() }
    }

    fn signature(&self, token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())[..SIGNATURE_LEN].to_string()
    }

    /// Cookie value for a token: `<token>.<signature>`.
    pub fn sign(&self, token: &str) -> String {
        format!("{}.{}", token, self.signature(token))
    }

    /// The token inside a cookie value, if the signature checks out.
    pub fn verify(&self, value: &str) -> Option<String> {
        let (token, signature) = value.rsplit_once('.')?;
        if token.is_empty() || signature != self.signature(token) {
            return None;
        }
        Some(token.to_string())
    }

    /// Session token from the request's `Cookie` headers. Missing, malformed,
    /// or tampered cookies all read as no session.
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|raw| raw.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == SESSION_COOKIE)
            .and_then(|(_, value)| self.verify(value.trim()))
    }

    /// `Set-Cookie` value issuing `token`: http-only, same-site lax, not secure.
    pub fn issue(&self, token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
        HeaderValue::from_str(&format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax",
            SESSION_COOKIE,
            self.sign(token)
        ))
    }
}
