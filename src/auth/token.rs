use crate::error::AppError;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};

/// Length of the opaque verification/reset tokens.
pub const OPAQUE_TOKEN_LENGTH: usize = 32;

/// Claims encoded within an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the user's email address.
    pub sub: String,
    /// The user's unique identifier, carried alongside the subject.
    pub user_id: String,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: usize,
    /// Expiration timestamp (seconds since epoch).
    pub exp: usize,
}

/// Issues a signed access token for the given user.
///
/// The subject claim is the email; a separate `user_id` claim carries the id.
/// Signed with HS256 using the configured server secret.
pub fn issue_access_token(
    email: &str,
    user_id: &str,
    secret: &str,
    ttl_minutes: i64,
) -> Result<String, AppError> {
    let now = chrono::Utc::now();
    let expiration = now
        .checked_add_signed(chrono::Duration::minutes(ttl_minutes))
        .ok_or_else(|| AppError::Internal("Token expiry overflowed".into()))?;

    let claims = Claims {
        sub: email.to_string(),
        user_id: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

/// Verifies an access token's signature and expiry and decodes its claims.
///
/// Every failure mode -- bad signature, expired, malformed -- collapses to
/// `None` so callers cannot tell them apart.
pub fn verify_access_token(token: &str, secret: &str) -> Option<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .ok()
}

/// Generates a cryptographically secure random token over `[A-Za-z0-9]`.
///
/// Used for both email-verification and password-reset tokens. Collisions are
/// not checked for; at this length the probability is negligible.
pub fn generate_opaque_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}
