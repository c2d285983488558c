//! Email-verification request ledger.
//!
//! Keyed by email rather than user id — verification can run before an
//! account exists. `requested_at` moves on every delivery (resend support);
//! `created_at` stays at first issue and anchors validity.

use chrono::{DateTime, Utc};
use entity::email_verification_requests::{ActiveModel, Column, Entity as VerificationEntity, Model};
use error::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, prelude::Expr,
};
use uuid::Uuid;

/// Append a new verification request row.
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    email: &str,
    request_ip: Option<&str>,
    otp_sealed: Vec<u8>,
    requested_at: DateTime<Utc>,
) -> Result<Model> {
    let row = ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        request_ip: Set(request_ip.map(str::to_string)),
        otp_sealed: Set(otp_sealed),
        is_otp_usable: Set(true),
        requested_at: Set(requested_at),
        created_at: Set(requested_at),
        updated_at: Set(requested_at),
    };

    let model = row.insert(conn).await?;
    Ok(model)
}

/// Most recent verification request for an email, if any.
pub async fn latest_for_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<Model>> {
    let row = VerificationEntity::find()
        .filter(Column::Email.eq(email))
        .order_by_desc(Column::CreatedAt)
        .one(conn)
        .await?;

    Ok(row)
}

/// Mark one verification request's OTP as no longer usable.
pub async fn invalidate<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<()> {
    VerificationEntity::update_many()
        .col_expr(Column::IsOtpUsable, Expr::value(false))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .exec(conn)
        .await?;

    Ok(())
}

/// Bump the last-sent timestamp after re-delivering the same OTP. The OTP
/// value and the validity anchor (`created_at`) are untouched.
pub async fn touch_requested_at<C: ConnectionTrait>(conn: &C, id: Uuid, sent_at: DateTime<Utc>) -> Result<()> {
    VerificationEntity::update_many()
        .col_expr(Column::RequestedAt, Expr::value(sent_at))
        .col_expr(Column::UpdatedAt, Expr::value(sent_at))
        .filter(Column::Id.eq(id))
        .exec(conn)
        .await?;

    Ok(())
}

/// Count all rows for an email. Used by tests asserting resend behavior.
pub async fn count_for_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<u64> {
    use sea_orm::PaginatorTrait;

    let count = VerificationEntity::find().filter(Column::Email.eq(email)).count(conn).await?;
    Ok(count)
}
