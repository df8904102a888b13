use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")] InvalidInput(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid refresh")]
    InvalidRefresh,

    #[error("Forbidden")]
    Forbidden,

    #[error("Conta não encontrada")]
    AccountNotFound,

    #[error("Email já cadastrado")]
    EmailTaken,

    #[error("Token error: {0}")] Token(String),

    #[error("Configuration error: {0}")] Config(String),

    #[error("Internal error: {0}")] Internal(String),
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub message: String,
}

impl AppError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;

        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            | AppError::InvalidCredentials
            | AppError::Unauthorized
            | AppError::InvalidRefresh
            | AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::AccountNotFound => StatusCode::NOT_FOUND,
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();

        // Token failures surface to the caller as a generic unauthorized
        let message = match &self {
            AppError::Token(_) | AppError::Unauthorized => "Unauthorized".to_string(),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                "Internal error".to_string()
            }
            other => other.to_string(),
        };

        (status, axum::Json(ErrorBody { message })).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
