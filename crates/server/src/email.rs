//! # Outbound Email
//!
//! The mail capability the flows depend on, behind a trait so tests can
//! substitute a recording fake. The contract is fire-and-forget: the flows
//! only care whether the relay accepted the message, and record accepted
//! sends in the `email_logs` ledger; bounce tracking is out of scope.

use async_trait::async_trait;
use error::AppError;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::settings::SmtpConfig;

/// What the transport reported for one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    /// True when the relay accepted the message.
    pub accepted: bool,
    /// Provider/queue id of the accepted message, if one was reported.
    pub provider_message_id: Option<String>,
}

/// Outbound mail capability.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a plain-text email.
    ///
    /// # Errors
    ///
    /// Returns an error when the transport itself fails; a relay that answers
    /// with a rejection comes back as `accepted: false` instead.
    async fn send(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<DeliveryReceipt, AppError>;
}

/// SMTP-backed mailer used in production.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// Build a pooled TLS transport from configuration.
    ///
    /// # Errors
    ///
    /// Returns a config error if the relay host is invalid.
    pub fn new(config: &SmtpConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(config.username.clone(), config.password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| AppError::config(format!("Invalid SMTP relay {}: {e}", config.host)))?
            .port(config.port)
            .credentials(credentials)
            .build();

        Ok(Self { transport })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<DeliveryReceipt, AppError> {
        let message = Message::builder()
            .from(from.parse().map_err(|e| AppError::email(format!("Bad sender address: {e}")))?)
            .to(to.parse().map_err(|e| AppError::email(format!("Bad recipient address: {e}")))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())
            .map_err(|e| AppError::email(format!("Failed to build message: {e}")))?;

        let response = self
            .transport
            .send(message)
            .await
            .map_err(|e| AppError::email(format!("SMTP send failed: {e}")))?;

        Ok(DeliveryReceipt {
            accepted: response.is_positive(),
            provider_message_id: response.message().next().map(str::to_string),
        })
    }
}

/// Message templates for the three transactional emails.
pub mod templates {
    /// Welcome email sent after signup.
    pub fn welcome(first_name: &str) -> (String, String) {
        let subject = "Welcome to Janus".to_string();
        let body = format!("Hi {first_name},\n\nWelcome to Janus. Your account is ready.\n\nBest,\nThe Janus team\n");
        (subject, body)
    }

    /// Password-reset OTP email.
    pub fn reset_otp(first_name: &str, request_ip: Option<&str>, otp: &str) -> (String, String) {
        let subject = "Reset your Janus password".to_string();
        let origin = request_ip.unwrap_or("an unknown address");
        let body = format!(
            "Hi {first_name},\n\nWe received a password reset request from {origin}.\n\nYour OTP: {otp}\n\nIf this \
             wasn't you, you can ignore this email.\n"
        );
        (subject, body)
    }

    /// Email-verification OTP email.
    pub fn verification_otp(request_ip: Option<&str>, otp: &str) -> (String, String) {
        let subject = "Verify your email address".to_string();
        let origin = request_ip.unwrap_or("an unknown address");
        let body = format!(
            "Hi,\n\nWe received an email verification request from {origin}.\n\nYour OTP: {otp}\n"
        );
        (subject, body)
    }
}
