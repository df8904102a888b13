use std::sync::Arc;

use magnum_bank::api::AppState;
use magnum_bank::auth::{ HmacSigner, TokenSigner };
use magnum_bank::db::Store;
use magnum_bank::services::{ AccountService, AuthService, TransactionService };
use magnum_bank::{ AppError, Config, Result };
use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "magnum_bank=debug,tower_http=debug".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| AppError::Config(e.to_string()))?;

    tracing::info!("Starting magnum-bank");

    // Initialize the in-memory store
    let store = Arc::new(Store::new(config.opening_balance));

    if config.seed_demo_data {
        let user = store.seed_demo();
        tracing::info!(user_id = user.id, email = %user.email, "seeded demo user");
    }

    // Initialize the token signer
    let signer: Arc<dyn TokenSigner> = Arc::new(HmacSigner::new(&config.jwt_secret));

    // Initialize services
    let auth_service = Arc::new(
        AuthService::new(store.clone(), signer, config.access_ttl(), config.refresh_ttl())
    );
    let account_service = Arc::new(AccountService::new(store.clone()));
    let transaction_service = Arc::new(TransactionService::new(store.clone()));

    // Create app state and build the router
    let state = AppState::new(auth_service, account_service, transaction_service);
    let app = magnum_bank::api::router(state);

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener
        ::bind(&addr).await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    axum::serve(listener, app).await.map_err(|e| AppError::Internal(e.to_string()))?;

    Ok(())
}
