//! Password-reset request ledger.
//!
//! Append-style: issuing writes a new row, consuming or superseding flips
//! `is_otp_usable`. The latest row per user is the only one policy ever
//! consults.

use chrono::{DateTime, Utc};
use entity::password_reset_requests::{ActiveModel, Column, Entity as ResetEntity, Model};
use error::Result;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, prelude::Expr,
};
use uuid::Uuid;

/// Append a new reset request row.
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    email: &str,
    request_ip: Option<&str>,
    requested_at: DateTime<Utc>,
    otp_hash: &str,
) -> Result<Model> {
    let row = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        email: Set(email.to_string()),
        request_ip: Set(request_ip.map(str::to_string)),
        requested_at: Set(requested_at),
        otp_hash: Set(otp_hash.to_string()),
        is_otp_usable: Set(true),
        created_at: Set(requested_at),
    };

    let model = row.insert(conn).await?;
    Ok(model)
}

/// Most recent reset request for a user, if any.
pub async fn latest_for_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<Option<Model>> {
    let row = ResetEntity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_desc(Column::CreatedAt)
        .one(conn)
        .await?;

    Ok(row)
}

/// Mark one reset request's OTP as no longer usable.
pub async fn invalidate<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<()> {
    ResetEntity::update_many()
        .col_expr(Column::IsOtpUsable, Expr::value(false))
        .filter(Column::Id.eq(id))
        .exec(conn)
        .await?;

    Ok(())
}

/// Count all rows for a user. Used by tests asserting throttle behavior.
pub async fn count_for_user<C: ConnectionTrait>(conn: &C, user_id: Uuid) -> Result<u64> {
    use sea_orm::PaginatorTrait;

    let count = ResetEntity::find().filter(Column::UserId.eq(user_id)).count(conn).await?;
    Ok(count)
}
