use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{ decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation };

use crate::error::{ AppError, Result };

use super::{ Claims, TokenKind, TokenSigner, AUDIENCE, ISSUER };

fn build_claims(email: &str, kind: TokenKind, ttl: chrono::Duration) -> Claims {
    let now = chrono::Utc::now();
    Claims {
        sub: super::normalize_email(email),
        typ: kind,
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
        iss: ISSUER.to_string(),
        aud: AUDIENCE.to_string(),
    }
}

fn check_kind(claims: Claims, expected: TokenKind) -> Result<Claims> {
    if claims.typ != expected {
        return Err(AppError::Token(format!("not an {} token", expected.as_str())));
    }
    Ok(claims)
}

/// HS256 signer with issuer/audience claims.
pub struct HmacSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl HmacSigner {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_audience(&[AUDIENCE]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

impl TokenSigner for HmacSigner {
    fn issue(&self, email: &str, kind: TokenKind, ttl: chrono::Duration) -> Result<String> {
        let claims = build_claims(email, kind, ttl);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e|
            AppError::Token(e.to_string())
        )
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e|
            AppError::Token(e.to_string())
        )?;

        check_kind(data.claims, expected)
    }
}

/// Unsigned test double: same claim shape and expiry behavior as the HMAC
/// signer, but the signature is a fixed placeholder that is never checked.
/// For offline tests only.
pub struct InsecureSigner;

impl TokenSigner for InsecureSigner {
    fn issue(&self, email: &str, kind: TokenKind, ttl: chrono::Duration) -> Result<String> {
        let claims = build_claims(email, kind, ttl);

        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&claims).map_err(|e| AppError::Token(e.to_string()))?
        );

        Ok(format!("{}.{}.testsig", header, payload))
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<Claims> {
        let parts: Vec<&str> = token.split('.').collect();
        if parts.len() != 3 {
            return Err(AppError::Token("bad token".to_string()));
        }

        let payload = URL_SAFE_NO_PAD.decode(parts[1]).map_err(|e|
            AppError::Token(e.to_string())
        )?;
        let claims: Claims = serde_json
            ::from_slice(&payload)
            .map_err(|e| AppError::Token(e.to_string()))?;

        if chrono::Utc::now().timestamp() >= claims.exp {
            return Err(AppError::Token("expired".to_string()));
        }

        check_kind(claims, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn signers() -> Vec<Box<dyn TokenSigner>> {
        vec![Box::new(HmacSigner::new("test-secret")), Box::new(InsecureSigner)]
    }

    #[test]
    fn test_issue_verify_roundtrip() {
        for signer in signers() {
            let token = signer
                .issue("Diego@Teste.com", TokenKind::Access, Duration::minutes(15))
                .unwrap();
            let claims = signer.verify(&token, TokenKind::Access).unwrap();

            assert_eq!(claims.sub, "diego@teste.com");
            assert_eq!(claims.typ, TokenKind::Access);
            assert!(claims.exp > claims.iat);
        }
    }

    #[test]
    fn test_kind_mismatch_rejected() {
        for signer in signers() {
            let refresh = signer
                .issue("a@x.com", TokenKind::Refresh, Duration::days(7))
                .unwrap();
            assert!(signer.verify(&refresh, TokenKind::Access).is_err());

            let access = signer
                .issue("a@x.com", TokenKind::Access, Duration::minutes(15))
                .unwrap();
            assert!(signer.verify(&access, TokenKind::Refresh).is_err());
        }
    }

    #[test]
    fn test_expired_token_rejected() {
        for signer in signers() {
            let token = signer
                .issue("a@x.com", TokenKind::Access, Duration::seconds(-120))
                .unwrap();
            assert!(signer.verify(&token, TokenKind::Access).is_err());
        }
    }

    #[test]
    fn test_tampered_signature_rejected() {
        let signer = HmacSigner::new("test-secret");
        let token = signer.issue("a@x.com", TokenKind::Access, Duration::minutes(15)).unwrap();

        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(signer.verify(&tampered, TokenKind::Access).is_err());
    }

    #[test]
    fn test_secret_mismatch_rejected() {
        let a = HmacSigner::new("secret-a");
        let b = HmacSigner::new("secret-b");

        let token = a.issue("a@x.com", TokenKind::Access, Duration::minutes(15)).unwrap();
        assert!(b.verify(&token, TokenKind::Access).is_err());
    }

    #[test]
    fn test_garbage_token_rejected() {
        for signer in signers() {
            assert!(signer.verify("not-a-token", TokenKind::Access).is_err());
        }
    }
}
