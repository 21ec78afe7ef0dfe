use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::Config;
use crate::email::{password_reset_email, verification_email, welcome_email, Mailer};

/// SMTP-backed mailer built on lettre's async transport.
///
/// Verification and reset links point into the configured frontend, which
/// owns the pages that post the tokens back to the API.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_email: String,
    frontend_url: String,
    app_name: String,
}

impl SmtpMailer {
    /// Builds a STARTTLS relay mailer from configuration.
    pub fn new(config: &Config) -> Result<Self, lettre::transport::smtp::Error> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port);
        if !config.smtp_user.is_empty() {
            builder = builder.credentials(Credentials::new(
                config.smtp_user.clone(),
                config.smtp_password.clone(),
            ));
        }
        Ok(Self {
            transport: builder.build(),
            from_email: config.from_email.clone(),
            frontend_url: config.frontend_url.clone(),
            app_name: config.app_name.clone(),
        })
    }

    /// Plaintext local transport for development inboxes (Mailpit, MailHog).
    pub fn new_local(host: &str, port: u16, config: &Config) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();
        Self {
            transport,
            from_email: config.from_email.clone(),
            frontend_url: config.frontend_url.clone(),
            app_name: config.app_name.clone(),
        }
    }

    async fn send(&self, to_email: &str, subject: &str, html_body: &str) -> bool {
        let message = Message::builder()
            .from(match self.from_email.parse() {
                Ok(mailbox) => mailbox,
                Err(e) => {
                    log::error!("Invalid from address {}: {}", self.from_email, e);
                    return false;
                }
            })
            .to(match to_email.parse() {
                Ok(mailbox) => mailbox,
                Err(e) => {
                    log::error!("Invalid recipient address {}: {}", to_email, e);
                    return false;
                }
            })
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html_body.to_string());

        let message = match message {
            Ok(message) => message,
            Err(e) => {
                log::error!("Failed to build email to {}: {}", to_email, e);
                return false;
            }
        };

        match self.transport.send(message).await {
            Ok(_) => {
                log::info!("Email sent successfully to {}", to_email);
                true
            }
            Err(e) => {
                log::error!("Failed to send email to {}: {}", to_email, e);
                false
            }
        }
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_verification(&self, to_email: &str, token: &str) -> bool {
        let link = format!("{}/verify-email?token={}", self.frontend_url, token);
        let (subject, body) = verification_email(&self.app_name, &link);
        self.send(to_email, &subject, &body).await
    }

    async fn send_password_reset(&self, to_email: &str, token: &str) -> bool {
        let link = format!("{}/reset-password?token={}", self.frontend_url, token);
        let (subject, body) = password_reset_email(&self.app_name, &link);
        self.send(to_email, &subject, &body).await
    }

    async fn send_welcome(&self, to_email: &str) -> bool {
        let (subject, body) = welcome_email(&self.app_name);
        self.send(to_email, &subject, &body).await
    }
}
