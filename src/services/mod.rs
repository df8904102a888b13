pub mod auth_service;
pub mod account_service;
pub mod transaction_service;

pub use auth_service::{ AuthService, SessionTokens };
pub use account_service::AccountService;
pub use transaction_service::{ TransactionService, TxListParams };
