use std::sync::Arc;

use serde::{ Deserialize, Serialize };

use crate::auth::{ TokenKind, TokenSigner };
use crate::db::{ Store, User, UserPublic };
use crate::error::{ AppError, Result };

/// Token pair handed out on register/login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserPublic,
}

pub struct AuthService {
    store: Arc<Store>,
    signer: Arc<dyn TokenSigner>,
    access_ttl: chrono::Duration,
    refresh_ttl: chrono::Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<Store>,
        signer: Arc<dyn TokenSigner>,
        access_ttl: chrono::Duration,
        refresh_ttl: chrono::Duration
    ) -> Self {
        Self {
            store,
            signer,
            access_ttl,
            refresh_ttl,
        }
    }

    fn issue_pair(&self, user: &User) -> Result<SessionTokens> {
        let access_token = self.signer.issue(&user.email, TokenKind::Access, self.access_ttl)?;
        let refresh_token = self.signer.issue(&user.email, TokenKind::Refresh, self.refresh_ttl)?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
            user: UserPublic::from(user),
        })
    }

    pub fn register(&self, name: &str, email: &str, password: &str) -> Result<SessionTokens> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AppError::InvalidInput("Dados inválidos".to_string()));
        }

        if self.store.find_user_by_email(email).is_some() {
            return Err(AppError::EmailTaken);
        }

        let user = self.store.create_user(
            name.to_string(),
            email.to_string(),
            password.to_string()
        );
        self.store.ensure_account(user.id);
        self.store.set_session_email(Some(user.email.clone()));

        tracing::info!(user_id = user.id, "registered user");

        self.issue_pair(&user)
    }

    pub fn login(&self, email: &str, password: &str) -> Result<SessionTokens> {
        let user = self.store
            .find_user_by_email(email)
            .filter(|u| u.password == password)
            .ok_or(AppError::InvalidCredentials)?;

        self.store.ensure_account(user.id);
        self.store.set_session_email(Some(user.email.clone()));

        tracing::debug!(user_id = user.id, "login ok");

        self.issue_pair(&user)
    }

    /// Resolves a bearer access token to its user.
    pub fn authenticate(&self, token: &str) -> Result<User> {
        let claims = self.signer.verify(token, TokenKind::Access)?;

        self.store.find_user_by_email(&claims.sub).ok_or(AppError::Unauthorized)
    }

    /// Mints a new access token from a refresh token. Any verification
    /// failure collapses into a generic invalid-refresh error.
    pub fn refresh(&self, refresh_token: &str) -> Result<String> {
        let claims = self.signer
            .verify(refresh_token, TokenKind::Refresh)
            .map_err(|_| AppError::InvalidRefresh)?;

        self.signer.issue(&claims.sub, TokenKind::Access, self.access_ttl)
    }

    /// Stateless: clears the session marker but already-issued tokens stay
    /// valid until their natural expiry.
    pub fn logout(&self) {
        self.store.set_session_email(None);
    }
}
