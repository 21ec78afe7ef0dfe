//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every domain error carries a stable machine-readable code; the HTTP boundary renders
//! all of them with the same JSON shape:
//!
//! ```json
//! {"error": {"code": "...", "message": "...", "details": {"field": "...", "issue": "..."}}}
//! ```
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers can return
//! `Result<_, AppError>` and rely on the automatic conversion into HTTP responses.
//! `From` implementations for `sqlx::Error`, `validator::ValidationErrors` and
//! `bcrypt::BcryptError` keep the `?` operator usable at every layer.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// All domain errors the service can surface to a client.
///
/// Variants are named for what went wrong, not where; the mapping to HTTP
/// status and stable code lives in [`AppError::code`] and the
/// `ResponseError` implementation.
#[derive(Debug)]
pub enum AppError {
    /// Registration attempted with an email that already has an account (409).
    EmailAlreadyExists,
    /// A domain-level input rule was violated, e.g. password strength (400).
    Validation {
        field: &'static str,
        message: String,
    },
    /// Request payload failed structural validation via `validator` (422).
    PayloadInvalid(String),
    /// Verification or reset token is unknown or expired (400). Deliberately
    /// uninformative: absent and expired tokens produce the identical error.
    InvalidToken,
    /// Login failed; unknown email and wrong password are indistinguishable (401).
    InvalidCredentials,
    /// No bearer token on a protected route (401).
    MissingToken,
    /// Bearer token failed signature/expiry/shape checks (401).
    TokenRejected,
    /// Token was well-formed but the session could not be resolved to a
    /// usable user record (401).
    TokenError,
    /// Login attempted on a deactivated account (403).
    AccountDisabled,
    /// Login attempted before email verification (403).
    EmailNotVerified,
    /// Session user has been deactivated since the token was issued (403).
    InactiveUser,
    /// Session user has not verified their email (403).
    UnverifiedUser,
    /// Template missing or owned by someone else; identical either way (404).
    TemplateNotFound,
    /// A `template_id` reference on an item operation did not resolve to a
    /// template owned by the caller (400, the item input is at fault).
    TemplateRefNotFound,
    /// Item missing or owned by someone else; identical either way (404).
    ItemNotFound,
    /// Persistence-layer failure (500).
    Database(String),
    /// Any other unexpected server-side failure (500).
    Internal(String),
}

impl AppError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::PayloadInvalid(_) => "VALIDATION_ERROR",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::MissingToken => "MISSING_TOKEN",
            AppError::TokenRejected => "INVALID_TOKEN",
            AppError::TokenError => "TOKEN_ERROR",
            AppError::AccountDisabled => "ACCOUNT_DISABLED",
            AppError::EmailNotVerified => "EMAIL_NOT_VERIFIED",
            AppError::InactiveUser => "INACTIVE_USER",
            AppError::UnverifiedUser => "UNVERIFIED_USER",
            AppError::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            AppError::TemplateRefNotFound => "TEMPLATE_NOT_FOUND",
            AppError::ItemNotFound => "ITEM_NOT_FOUND",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::EmailAlreadyExists => StatusCode::CONFLICT,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::PayloadInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidToken => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials
            | AppError::MissingToken
            | AppError::TokenRejected
            | AppError::TokenError => StatusCode::UNAUTHORIZED,
            AppError::AccountDisabled
            | AppError::EmailNotVerified
            | AppError::InactiveUser
            | AppError::UnverifiedUser => StatusCode::FORBIDDEN,
            AppError::TemplateNotFound | AppError::ItemNotFound => StatusCode::NOT_FOUND,
            AppError::TemplateRefNotFound => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Database/internal details are not echoed back.
    fn message(&self) -> String {
        match self {
            AppError::EmailAlreadyExists => "An account with this email already exists".into(),
            AppError::Validation { message, .. } => message.clone(),
            AppError::PayloadInvalid(message) => message.clone(),
            AppError::InvalidToken => "Invalid or expired token".into(),
            AppError::InvalidCredentials => "Incorrect email or password".into(),
            AppError::MissingToken => "Authentication token is required".into(),
            AppError::TokenRejected => "Invalid or expired token".into(),
            AppError::TokenError => "Error processing token".into(),
            AppError::AccountDisabled => "Account has been disabled".into(),
            AppError::EmailNotVerified => {
                "Please verify your email address before logging in".into()
            }
            AppError::InactiveUser => "User account is inactive".into(),
            AppError::UnverifiedUser => "User email is not verified".into(),
            AppError::TemplateNotFound => "Task template not found".into(),
            AppError::TemplateRefNotFound => "Template not found".into(),
            AppError::ItemNotFound => "Task item not found".into(),
            AppError::Database(_) | AppError::Internal(_) => "Internal server error".into(),
        }
    }

    /// `(field, issue)` pair for the `details` object, when one applies.
    fn details(&self) -> Option<(&'static str, String)> {
        match self {
            AppError::EmailAlreadyExists => Some(("email", "Email already exists".into())),
            AppError::Validation { field, message } => Some((field, message.clone())),
            AppError::InvalidToken => Some(("token", "Token is invalid or has expired".into())),
            AppError::InvalidCredentials => {
                Some(("credentials", "Email or password is incorrect".into()))
            }
            AppError::MissingToken => {
                Some(("authorization", "Authorization header is missing".into()))
            }
            AppError::TokenRejected => {
                Some(("authorization", "Token is invalid or has expired".into()))
            }
            AppError::TokenError => Some((
                "authorization",
                "Unable to process authentication token".into(),
            )),
            AppError::AccountDisabled => Some(("account", "Account is disabled".into())),
            AppError::EmailNotVerified => Some(("email", "Email address not verified".into())),
            AppError::InactiveUser => Some(("user", "User account has been deactivated".into())),
            AppError::UnverifiedUser => {
                Some(("user", "Email address has not been verified".into()))
            }
            AppError::TemplateNotFound | AppError::TemplateRefNotFound => Some((
                "template_id",
                "Template does not exist or does not belong to user".into(),
            )),
            AppError::ItemNotFound => Some((
                "item_id",
                "Item does not exist or does not belong to user".into(),
            )),
            AppError::PayloadInvalid(_) | AppError::Database(_) | AppError::Internal(_) => None,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Database(msg) | AppError::Internal(msg) => {
                write!(f, "{}: {}", self.code(), msg)
            }
            _ => write!(f, "{}: {}", self.code(), self.message()),
        }
    }
}

/// Converts `AppError` variants into JSON `HttpResponse` objects carrying the
/// stable error envelope.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        // Server-side detail stays in the log, never in the response body.
        if let AppError::Database(msg) | AppError::Internal(msg) = self {
            log::error!("{}: {}", self.code(), msg);
        }
        let details = self
            .details()
            .map(|(field, issue)| json!({ "field": field, "issue": issue }))
            .unwrap_or(serde_json::Value::Null);
        HttpResponse::build(self.status()).json(json!({
            "error": {
                "code": self.code(),
                "message": self.message(),
                "details": details,
            }
        }))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        AppError::Database(error.to_string())
    }
}

/// Structural payload validation failures surface as 422 with the
/// detailed `validator` messages preserved.
impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::PayloadInvalid(error.to_string())
    }
}

/// Hashing/verification failures are server-side faults, never input faults.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::Internal(error.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Internal(error.to_string())
    }
}
