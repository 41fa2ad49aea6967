use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;

use crate::utils::jwt::TokenError;

/// Taxonomie des erreurs de l'API. Chaque variante porte un code stable
/// (champ `code` de la réponse JSON) pour que le frontend matche sur le
/// code et jamais sur le texte du message.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Password must be at least 8 characters and include a number, an uppercase letter, and a symbol.")]
    WeakPassword,

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Please verify your email.")]
    Unverified,

    #[error("Invalid verification code or user already verified")]
    InvalidVerification,

    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Admin access required")]
    AdminOnly,

    #[error("Email required")]
    EmailRequired,

    #[error("Address required for delivery")]
    AddressRequired,

    #[error("Product not found")]
    ProductNotFound,

    #[error("Order not found")]
    OrderNotFound,

    #[error("User not found")]
    UserNotFound,

    #[error("Cannot change order status from '{from}' to '{to}'")]
    IllegalTransition { from: String, to: String },

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Code machine stable exposé au frontend.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unverified => "UNVERIFIED",
            Self::InvalidVerification => "INVALID_VERIFICATION",
            Self::MissingToken => "MISSING_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::AdminOnly => "ADMIN_ONLY",
            Self::EmailRequired => "EMAIL_REQUIRED",
            Self::AddressRequired => "ADDRESS_REQUIRED",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::IllegalTransition { .. } => "ILLEGAL_TRANSITION",
            Self::Database(_) => "DATABASE",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => Self::TokenExpired,
            TokenError::Invalid(_) => Self::InvalidToken,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Internal(format!("password hashing failed: {}", err))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_)
            | Self::WeakPassword
            | Self::PasswordMismatch
            | Self::InvalidVerification
            | Self::EmailRequired
            | Self::AddressRequired => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials
            | Self::MissingToken
            | Self::TokenExpired
            | Self::InvalidToken => StatusCode::UNAUTHORIZED,
            Self::Unverified | Self::AdminOnly => StatusCode::FORBIDDEN,
            Self::ProductNotFound | Self::OrderNotFound | Self::UserNotFound => {
                StatusCode::NOT_FOUND
            }
            Self::EmailTaken | Self::IllegalTransition { .. } => StatusCode::CONFLICT,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.code(), "request failed");
        } else {
            tracing::debug!(error = %self, code = self.code(), "request rejected");
        }

        // Ne jamais exposer le détail des erreurs BD au client
        let message = match self {
            Self::Database(_) => "Database operation failed".to_string(),
            other => other.to_string(),
        };

        HttpResponse::build(status).json(json!({
            "error": message,
            "code": self.code(),
        }))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
