use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::token::{
    generate_opaque_token, issue_access_token, Claims, OPAQUE_TOKEN_LENGTH,
};
use crate::auth::{hash_password, validate_password_strength, verify_password, AuthResponse};
use crate::config::Config;
use crate::email::Mailer;
use crate::error::AppError;
use crate::models::User;
use crate::store::Store;

/// Returned by forgot-password for every input, eligible or not. Revealing
/// whether an account exists would allow email enumeration, so the message is
/// byte-identical in all branches.
pub const FORGOT_PASSWORD_MESSAGE: &str =
    "If email exists, password reset instructions have been sent";

/// Orchestrates the account lifecycle: registration, email verification,
/// login, and the password-reset flow.
///
/// The per-user state machine is `PendingVerification -> Verified`, with an
/// orthogonal active flag and a transient reset-token sub-state. All
/// collaborators are injected at construction.
pub struct AuthService {
    store: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
    jwt_secret: String,
    access_token_expire_minutes: i64,
    bcrypt_cost: u32,
    password_reset_expire_hours: i64,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, mailer: Arc<dyn Mailer>, config: &Config) -> Self {
        Self {
            store,
            mailer,
            jwt_secret: config.jwt_secret.clone(),
            access_token_expire_minutes: config.access_token_expire_minutes,
            bcrypt_cost: config.bcrypt_cost,
            password_reset_expire_hours: config.password_reset_expire_hours,
        }
    }

    fn access_token_for(&self, user: &User) -> Result<String, AppError> {
        issue_access_token(
            &user.email,
            &user.id.to_string(),
            &self.jwt_secret,
            self.access_token_expire_minutes,
        )
    }

    /// Registers a new account in the pending-verification state.
    ///
    /// Never returns an access token; the caller has not proven control of
    /// the email address yet. The verification email is best-effort: a send
    /// failure is logged and the user can still verify with the token that
    /// was already persisted.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        if self.store.user_by_email(email).await?.is_some() {
            return Err(AppError::EmailAlreadyExists);
        }

        validate_password_strength(password).map_err(|reason| AppError::Validation {
            field: "password",
            message: reason.into(),
        })?;

        let password_hash = hash_password(password, self.bcrypt_cost)?;
        let verification_token = generate_opaque_token(OPAQUE_TOKEN_LENGTH);
        let user = User::new(email.to_string(), password_hash, verification_token.clone());

        // The store's unique email index backstops the existence check above:
        // two concurrent registrations can both pass it, and the second
        // insert must then fail with the same conflict.
        self.store.insert_user(&user).await?;

        if !self
            .mailer
            .send_verification(&user.email, &verification_token)
            .await
        {
            log::warn!("Failed to send verification email to {}", user.email);
        }

        Ok(AuthResponse::for_user(
            "Registration successful. Please check your email for verification.",
            user.id.to_string(),
        ))
    }

    /// Consumes an email-verification token.
    ///
    /// Token validity is presence-only: there is no expiry on verification
    /// tokens, and an unknown token is the only failure mode.
    pub async fn verify_email(&self, token: &str) -> Result<AuthResponse, AppError> {
        let mut user = self
            .store
            .user_by_verification_token(token)
            .await?
            .ok_or(AppError::InvalidToken)?;

        user.is_verified = true;
        user.email_verification_token = None;
        user.updated_at = Utc::now();
        self.store.save_user(&user).await?;

        let access_token = self.access_token_for(&user)?;

        self.mailer.send_welcome(&user.email).await;

        Ok(AuthResponse::with_token(
            "Email verified successfully",
            user.id.to_string(),
            access_token,
        ))
    }

    /// Authenticates credentials and issues an access token.
    ///
    /// Unknown email and wrong password collapse into the same error; only a
    /// caller holding correct credentials learns whether the account is
    /// disabled or unverified.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, AppError> {
        let user = match self.store.user_by_email(email).await? {
            Some(user) if verify_password(password, &user.password_hash)? => user,
            _ => return Err(AppError::InvalidCredentials),
        };

        if !user.is_active {
            return Err(AppError::AccountDisabled);
        }
        if !user.is_verified {
            return Err(AppError::EmailNotVerified);
        }

        let access_token = self.access_token_for(&user)?;

        Ok(AuthResponse::with_token(
            "Login successful",
            user.id.to_string(),
            access_token,
        ))
    }

    /// Starts the password-reset flow.
    ///
    /// Only an existing, active, verified account gets a token and an email;
    /// every other input silently no-ops. All branches return
    /// [`FORGOT_PASSWORD_MESSAGE`] verbatim.
    pub async fn forgot_password(&self, email: &str) -> Result<AuthResponse, AppError> {
        if let Some(mut user) = self.store.user_by_email(email).await? {
            if user.is_active && user.is_verified {
                let reset_token = generate_opaque_token(OPAQUE_TOKEN_LENGTH);
                // Overwrites any outstanding reset token; at most one is
                // valid per user at any time.
                user.password_reset_token = Some(reset_token.clone());
                user.password_reset_expires =
                    Some(Utc::now() + Duration::hours(self.password_reset_expire_hours));
                user.updated_at = Utc::now();
                self.store.save_user(&user).await?;

                if !self
                    .mailer
                    .send_password_reset(&user.email, &reset_token)
                    .await
                {
                    log::warn!("Failed to send password reset email to {}", user.email);
                }
            }
        }

        Ok(AuthResponse::message_only(FORGOT_PASSWORD_MESSAGE))
    }

    /// Consumes a password-reset token and stores the new password.
    ///
    /// An expired token and an unknown token produce the identical error.
    /// The expiry comparison happens here, at reset time, against current
    /// UTC. No access token is issued; the user logs in again.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<AuthResponse, AppError> {
        let mut user = self
            .store
            .user_by_reset_token(token)
            .await?
            .ok_or(AppError::InvalidToken)?;

        let expires = user.password_reset_expires.ok_or(AppError::InvalidToken)?;
        if expires <= Utc::now() {
            return Err(AppError::InvalidToken);
        }

        validate_password_strength(new_password).map_err(|reason| AppError::Validation {
            field: "new_password",
            message: reason.into(),
        })?;

        user.password_hash = hash_password(new_password, self.bcrypt_cost)?;
        user.password_reset_token = None;
        user.password_reset_expires = None;
        user.updated_at = Utc::now();
        self.store.save_user(&user).await?;

        Ok(AuthResponse::message_only("Password reset successfully"))
    }

    /// Resolves verified token claims to a live user record.
    ///
    /// Requires both the subject and user-id claims, and rejects users that
    /// no longer exist or have been deactivated since the token was issued.
    pub async fn resolve_session(&self, claims: &Claims) -> Result<User, AppError> {
        if claims.sub.is_empty() || claims.user_id.is_empty() {
            return Err(AppError::TokenError);
        }

        let user_id = Uuid::parse_str(&claims.user_id).map_err(|_| AppError::TokenError)?;

        match self.store.user_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(AppError::TokenError),
        }
    }

    /// The full three-tier request gate: valid token, active account,
    /// verified email. Resource handlers call this before touching data.
    pub async fn current_verified_user(&self, claims: &Claims) -> Result<User, AppError> {
        let user = self.resolve_session(claims).await?;
        if !user.is_active {
            return Err(AppError::InactiveUser);
        }
        if !user.is_verified {
            return Err(AppError::UnverifiedUser);
        }
        Ok(user)
    }
}
