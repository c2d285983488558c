//! Outbound email log.

use chrono::Utc;
use entity::email_logs::{ActiveModel, EmailBodyType, Model};
use error::Result;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use uuid::Uuid;

/// Record an accepted outbound email.
#[allow(clippy::too_many_arguments)]
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    user_id: Option<Uuid>,
    provider_message_id: Option<&str>,
    sender: &str,
    recipient: &str,
    subject: &str,
    body: &str,
) -> Result<Model> {
    let row = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        provider_message_id: Set(provider_message_id.map(str::to_string)),
        sender: Set(sender.to_string()),
        recipient: Set(recipient.to_string()),
        subject: Set(subject.to_string()),
        body_type: Set(EmailBodyType::Text),
        body: Set(body.to_string()),
        created_at: Set(Utc::now()),
    };

    let model = row.insert(conn).await?;
    Ok(model)
}
