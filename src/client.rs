//! HTTP client for the banking API with the 401-refresh-retry interceptor.
//!
//! Concurrent requests that all hit a 401 while a refresh is pending are
//! collapsed into a single refresh call: the refresh gate serializes them,
//! the first caller through performs the refresh, and later callers observe
//! the rotated access token and just retry.

use std::sync::{ Arc, Mutex };

use reqwest::{ Method, StatusCode };
use serde_json::Value;

use crate::error::{ AppError, Result };

/// Shared token storage for the client, the Rust stand-in for the browser's
/// local storage slots.
#[derive(Default)]
pub struct TokenCell {
    access: Mutex<Option<String>>,
    refresh: Mutex<Option<String>>,
}

impl TokenCell {
    pub fn access(&self) -> Option<String> {
        self.access.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_access(&self, token: Option<String>) {
        *self.access.lock().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn refresh(&self) -> Option<String> {
        self.refresh.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set_refresh(&self, token: Option<String>) {
        *self.refresh.lock().unwrap_or_else(|e| e.into_inner()) = token;
    }

    pub fn set_pair(&self, access: &str, refresh: &str) {
        self.set_access(Some(access.to_string()));
        self.set_refresh(Some(refresh.to_string()));
    }

    pub fn clear(&self) {
        self.set_access(None);
        self.set_refresh(None);
    }
}

pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenCell>,
    refresh_gate: tokio::sync::Mutex<()>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_tokens(base_url, Arc::new(TokenCell::default()))
    }

    pub fn with_tokens(base_url: impl Into<String>, tokens: Arc<TokenCell>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            tokens,
            refresh_gate: tokio::sync::Mutex::new(()),
        }
    }

    pub fn tokens(&self) -> &Arc<TokenCell> {
        &self.tokens
    }

    pub async fn get(&self, path: &str) -> Result<Value> {
        self.send(Method::GET, path, None).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::POST, path, Some(body)).await
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Result<Value> {
        self.send(Method::PATCH, path, Some(body)).await
    }

    async fn dispatch(
        &self,
        method: &Method,
        path: &str,
        body: Option<&Value>,
        token: Option<&str>
    ) -> Result<reqwest::Response> {
        let mut req = self.http.request(method.clone(), format!("{}{}", self.base_url, path));
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        req.send().await.map_err(|e| AppError::Internal(e.to_string()))
    }

    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Value> {
        let mut retried = false;

        loop {
            let token = self.tokens.access();
            let response = self.dispatch(&method, path, body, token.as_deref()).await?;
            let status = response.status();

            // One retry per request, and never for the refresh flow itself.
            if status == StatusCode::UNAUTHORIZED && !retried && path != "/auth/refresh" {
                retried = true;
                self.refresh_access(token).await?;
                continue;
            }

            if status.is_success() {
                return response.json().await.map_err(|e| AppError::Internal(e.to_string()));
            }

            let message = response
                .json::<Value>().await
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_default();

            return Err(match status {
                StatusCode::BAD_REQUEST => AppError::InvalidInput(message),
                StatusCode::UNAUTHORIZED => AppError::Unauthorized,
                StatusCode::FORBIDDEN => AppError::Forbidden,
                StatusCode::NOT_FOUND => AppError::AccountNotFound,
                StatusCode::CONFLICT => AppError::EmailTaken,
                _ => AppError::Internal(format!("HTTP {}: {}", status, message)),
            });
        }
    }

    /// Rotates the access token through POST /auth/refresh. `stale` is the
    /// access token the failing request was sent with; if the stored token
    /// has already moved past it, a refresh happened while this caller was
    /// waiting for the gate and no second call is made.
    async fn refresh_access(&self, stale: Option<String>) -> Result<()> {
        let _gate = self.refresh_gate.lock().await;

        if self.tokens.access() != stale {
            return Ok(());
        }

        let refresh = match self.tokens.refresh() {
            Some(refresh) => refresh,
            None => {
                self.tokens.clear();
                return Err(AppError::Unauthorized);
            }
        };

        let response = self.http
            .post(format!("{}/auth/refresh", self.base_url))
            .json(&serde_json::json!({ "refreshToken": refresh }))
            .send().await
            .map_err(|e| AppError::Internal(e.to_string()))?;

        if response.status() != StatusCode::OK {
            tracing::warn!("token refresh failed, clearing session");
            self.tokens.clear();
            return Err(AppError::Unauthorized);
        }

        let body: Value = response.json().await.map_err(|e| AppError::Internal(e.to_string()))?;
        match body.get("accessToken").and_then(Value::as_str) {
            Some(new_access) => {
                self.tokens.set_access(Some(new_access.to_string()));
                Ok(())
            }
            None => {
                self.tokens.clear();
                Err(AppError::Unauthorized)
            }
        }
    }
}
