//!
//! # Notification Gateway
//!
//! Outbound email lives behind the [`Mailer`] trait. Every send returns a
//! plain `bool`: a failed email is logged by the implementation and must
//! never abort the operation that requested it. The SMTP implementation is in
//! [`smtp`]; tests substitute their own recording mailers.

pub mod smtp;

use async_trait::async_trait;

pub use smtp::SmtpMailer;

/// Outbound notification contract consumed by the auth service.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Sends the email-verification link for a fresh registration.
    async fn send_verification(&self, to_email: &str, token: &str) -> bool;
    /// Sends the password-reset link.
    async fn send_password_reset(&self, to_email: &str, token: &str) -> bool;
    /// Sends the post-verification welcome note.
    async fn send_welcome(&self, to_email: &str) -> bool;
}

/// Subject and HTML body for a verification email.
pub(crate) fn verification_email(app_name: &str, link: &str) -> (String, String) {
    (
        format!("Verify your {} email address", app_name),
        format!(
            "<html><body>\
             <h1>Confirm your email</h1>\
             <p>Thanks for signing up for {}. Click the link below to verify \
             your email address and activate your account.</p>\
             <p><a href=\"{}\">Verify email</a></p>\
             <p>If you did not create this account, you can ignore this message.</p>\
             </body></html>",
            app_name, link
        ),
    )
}

/// Subject and HTML body for a password-reset email.
pub(crate) fn password_reset_email(app_name: &str, link: &str) -> (String, String) {
    (
        format!("Reset your {} password", app_name),
        format!(
            "<html><body>\
             <h1>Password reset requested</h1>\
             <p>A password reset was requested for your {} account. Click the \
             link below to choose a new password. The link expires shortly.</p>\
             <p><a href=\"{}\">Reset password</a></p>\
             <p>If you did not request this, you can ignore this message.</p>\
             </body></html>",
            app_name, link
        ),
    )
}

/// Subject and HTML body for the welcome email.
pub(crate) fn welcome_email(app_name: &str) -> (String, String) {
    (
        format!("Welcome to {}!", app_name),
        format!(
            "<html><body>\
             <h1>Welcome to {}!</h1>\
             <p>Your email has been verified and your account is now active.</p>\
             <p>Best regards,<br>The {} Team</p>\
             </body></html>",
            app_name, app_name
        ),
    )
}
