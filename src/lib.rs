pub mod config;
pub mod error;
pub mod auth;
pub mod db;
pub mod services;
pub mod api;
pub mod client;
pub mod statement;

pub use config::Config;
pub use error::{ AppError, Result };
