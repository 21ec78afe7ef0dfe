pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedClaims;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, validate_password_strength, verify_password};
pub use token::{generate_opaque_token, issue_access_token, verify_access_token, Claims};

/// Payload for a new user registration request.
///
/// Password strength is a domain rule checked by the auth service, not a
/// structural constraint, so the only payload-level rule here is email shape.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,
    pub password: String,
}

/// Payload carrying an email-verification token.
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    #[validate(length(min = 1))]
    pub token: String,
}

/// Payload for requesting a password-reset email.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    #[validate(email)]
    pub email: String,
}

/// Payload for consuming a password-reset token.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 1))]
    pub token: String,
    pub new_password: String,
}

/// Response structure for every auth operation.
///
/// `user_id`, `access_token` and `token_type` are present only when the
/// operation yields them; registration for instance never returns a token.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
}

impl AuthResponse {
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            user_id: None,
            access_token: None,
            token_type: None,
        }
    }

    pub fn for_user(message: impl Into<String>, user_id: String) -> Self {
        Self {
            message: message.into(),
            user_id: Some(user_id),
            access_token: None,
            token_type: None,
        }
    }

    pub fn with_token(message: impl Into<String>, user_id: String, access_token: String) -> Self {
        Self {
            message: message.into(),
            user_id: Some(user_id),
            access_token: Some(access_token),
            token_type: Some("bearer".into()),
        }
    }
}
