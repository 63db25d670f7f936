//! Outbound email service
//!
//! SMTP delivery of verification codes and account notifications via lettre.
//! Sends follow the same best-effort policy as the notification bot: a failed
//! email is logged and never propagated to the caller.

use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

use crate::config::MailConfig;
use crate::utils::errors::{AluMapError, Result};

#[derive(Clone)]
pub struct EmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl EmailService {
    /// Create a new EmailService instance
    pub fn new(config: &MailConfig) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AluMapError::Config(format!("Invalid SMTP relay: {}", e)))?
            .port(config.smtp_port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| AluMapError::Config(format!("Invalid from address: {}", e)))?;

        Ok(Self { transport, from })
    }

    /// Send the 6-digit verification code to a freshly registered account
    pub async fn send_verification_code(&self, email: &str, first_name: &str, code: &str) {
        let body = format!(
            "Hi {},\n\n\
             Thank you for registering with the AluMap alumni platform. To complete your \
             registration, please use the verification code below:\n\n\
             {}\n\n\
             This code will expire in 1 hour.\n\n\
             If you didn't request this verification, please ignore this email.",
            first_name, code
        );

        self.send(email, "Verify your alumni account", body).await;
    }

    /// Confirm a completed verification
    pub async fn send_verification_success(&self, email: &str, first_name: &str) {
        let body = format!(
            "Hi {},\n\n\
             Your alumni account has been verified. You can now sign in and join events.",
            first_name
        );

        self.send(email, "Your alumni account is verified", body).await;
    }

    /// Alert one admin about a pending manual-verification request
    pub async fn send_manual_verification_alert(
        &self,
        admin_email: &str,
        user_email: &str,
        user_name: &str,
    ) {
        let body = format!(
            "A manual verification request is waiting for review.\n\n\
             Name: {}\nEmail: {}\n\n\
             You can verify this account via the admin dashboard.",
            user_name, user_email
        );

        self.send(admin_email, "Manual verification request", body).await;
    }

    async fn send(&self, to: &str, subject: &str, body: String) {
        let to_mailbox: Mailbox = match to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                error!(to = to, error = %e, "Invalid recipient address, skipping email");
                return;
            }
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(to_mailbox)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body);

        let message = match message {
            Ok(message) => message,
            Err(e) => {
                error!(to = to, error = %e, "Failed to build email message");
                return;
            }
        };

        match self.transport.send(message).await {
            Ok(_) => info!(to = to, subject = subject, "Email sent successfully"),
            Err(e) => error!(to = to, subject = subject, error = %e, "Failed to send email"),
        }
    }
}
