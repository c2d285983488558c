//! # Common Test Utilities
//!
//! Shared test infrastructure: an in-memory sqlite database with the schema
//! built from the entities, and a recording mailer standing in for the SMTP
//! relay so tests can read the OTPs that flows "deliver".

// Each test binary uses its own subset of these helpers.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use auth::{SealingKey, TokenConfig};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use error::AppError;
use otp::Alphabet;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DbConn, Schema};
use server::{
    AppState, OtpFlowConfig,
    email::{DeliveryReceipt, Mailer},
};

/// One email captured by the recording mailer.
#[derive(Debug, Clone)]
pub struct SentEmail {
    pub from:    String,
    pub to:      String,
    pub subject: String,
    pub body:    String,
}

impl SentEmail {
    /// Pull the OTP out of a delivered message body.
    pub fn otp(&self) -> Option<String> {
        self.body
            .split("Your OTP: ")
            .nth(1)?
            .split_whitespace()
            .next()
            .map(str::to_string)
    }
}

/// Mailer fake that records instead of sending.
pub struct RecordingMailer {
    pub outbox: Mutex<Vec<SentEmail>>,
    accept: bool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self {
            outbox: Mutex::new(Vec::new()),
            accept: true,
        }
    }

    /// A mailer whose relay refuses every message.
    pub fn rejecting() -> Self {
        Self {
            outbox: Mutex::new(Vec::new()),
            accept: false,
        }
    }

    pub fn sent_count(&self) -> usize {
        self.outbox.lock().unwrap().len()
    }

    pub fn last_email(&self) -> Option<SentEmail> {
        self.outbox.lock().unwrap().last().cloned()
    }

    pub fn last_otp(&self) -> Option<String> {
        self.last_email().and_then(|email| email.otp())
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, from: &str, to: &str, subject: &str, body: &str) -> Result<DeliveryReceipt, AppError> {
        self.outbox.lock().unwrap().push(SentEmail {
            from:    from.to_string(),
            to:      to.to_string(),
            subject: subject.to_string(),
            body:    body.to_string(),
        });

        Ok(DeliveryReceipt {
            accepted: self.accept,
            provider_message_id: self.accept.then(|| "test-message-id".to_string()),
        })
    }
}

/// A ready-to-use application state plus a handle on its mailer.
pub struct TestHarness {
    pub state:  AppState,
    pub mailer: Arc<RecordingMailer>,
}

pub fn token_config() -> TokenConfig {
    TokenConfig {
        secret: STANDARD.encode("integration-test-signing-secret!"),
        algorithm: "HS256".to_string(),
        access_ttl_seconds: 900,
        refresh_ttl_seconds: 7 * 24 * 3600,
        issuer: "janus-test".to_string(),
    }
}

pub fn reset_config() -> OtpFlowConfig {
    OtpFlowConfig {
        otp_length: 12,
        otp_alphabet: Alphabet::alphanumeric(),
        cooldown_minutes: 2,
        validity_minutes: 15,
    }
}

pub fn verification_config() -> OtpFlowConfig {
    OtpFlowConfig {
        otp_length: 6,
        otp_alphabet: Alphabet::digits(),
        cooldown_minutes: 2,
        validity_minutes: 15,
    }
}

async fn connect_in_memory() -> DbConn {
    // A pool would hand each connection its own private in-memory database;
    // cap it at one so every query sees the same schema.
    let mut options = ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1);

    Database::connect(options).await.expect("sqlite connect failed")
}

async fn create_schema(db: &DbConn) {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let statements = [
        schema.create_table_from_entity(entity::users::Entity),
        schema.create_table_from_entity(entity::password_reset_requests::Entity),
        schema.create_table_from_entity(entity::email_verification_requests::Entity),
        schema.create_table_from_entity(entity::email_logs::Entity),
    ];

    for statement in statements {
        db.execute(backend.build(&statement)).await.expect("schema create failed");
    }
}

/// Harness with default policy windows.
pub async fn harness() -> TestHarness {
    harness_with(reset_config(), verification_config()).await
}

/// Harness with caller-chosen policy windows.
pub async fn harness_with(reset: OtpFlowConfig, verification: OtpFlowConfig) -> TestHarness {
    harness_with_mailer(reset, verification, Arc::new(RecordingMailer::new())).await
}

/// Harness with a caller-supplied mailer.
pub async fn harness_with_mailer(
    reset: OtpFlowConfig,
    verification: OtpFlowConfig,
    mailer: Arc<RecordingMailer>,
) -> TestHarness {
    let db = connect_in_memory().await;
    create_schema(&db).await;

    let state = AppState {
        db,
        tokens: token_config(),
        reset,
        verification,
        sealing_key: SealingKey::from_bytes(&[42u8; 32]).unwrap(),
        mailer: mailer.clone(),
        email_from: "no-reply@janus.test".to_string(),
    };

    TestHarness { state, mailer }
}
