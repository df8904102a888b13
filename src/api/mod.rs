use std::sync::Arc;

use axum::http::HeaderMap;
use axum::routing::{ get, patch, post };
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod account;
pub mod transaction;

use crate::db::User;
use crate::error::{ AppError, Result };
use crate::services::{ AccountService, AuthService, TransactionService };

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub account_service: Arc<AccountService>,
    pub transaction_service: Arc<TransactionService>,
}

impl AppState {
    pub fn new(
        auth_service: Arc<AuthService>,
        account_service: Arc<AccountService>,
        transaction_service: Arc<TransactionService>
    ) -> Self {
        Self {
            auth_service,
            account_service,
            transaction_service,
        }
    }
}

/// Resolves the caller from the Authorization header.
pub(crate) fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User> {
    let token = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(crate::auth::read_bearer)
        .ok_or(AppError::Unauthorized)?;

    state.auth_service.authenticate(token)
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh))
        .route("/account/me", get(account::my_account))
        .route("/accounts", get(account::list_accounts))
        .route("/accounts/{id}", patch(account::patch_account))
        .route(
            "/transactions",
            get(transaction::list_transactions).post(transaction::create_transaction)
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
