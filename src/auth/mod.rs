use serde::{ Deserialize, Serialize };

use crate::error::Result;

pub mod jwt;
pub use jwt::{ HmacSigner, InsecureSigner };

pub const ISSUER: &str = "magnum-bank";
pub const AUDIENCE: &str = "web";

/// Which of the two bearer tokens a claim set belongs to. Verification must
/// reject a token presented for the wrong flow even when the signature is
/// valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's normalized email.
    pub sub: String,
    pub typ: TokenKind,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// Token issuance and verification behind a trait so the HMAC signer can be
/// swapped for the deterministic test double via injection.
pub trait TokenSigner: Send + Sync {
    fn issue(&self, email: &str, kind: TokenKind, ttl: chrono::Duration) -> Result<String>;
    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims>;
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn read_bearer(value: &str) -> Option<&str> {
    let (scheme, rest) = value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
