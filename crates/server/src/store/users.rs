//! User repository.

use chrono::Utc;
use entity::users::{ActiveModel, Column, Entity as UsersEntity, Model};
use error::Result;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, prelude::Expr};
use uuid::Uuid;

/// Find a user by email.
pub async fn find_by_email<C: ConnectionTrait>(conn: &C, email: &str) -> Result<Option<Model>> {
    let user = UsersEntity::find().filter(Column::Email.eq(email)).one(conn).await?;
    Ok(user)
}

/// Find a user by id.
pub async fn find_by_id<C: ConnectionTrait>(conn: &C, id: Uuid) -> Result<Option<Model>> {
    let user = UsersEntity::find_by_id(id).one(conn).await?;
    Ok(user)
}

/// Insert a new user and return the stored row.
pub async fn insert<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    first_name: &str,
    last_name: &str,
    email: &str,
    password_hash: &str,
) -> Result<Model> {
    let now = Utc::now();
    let user = ActiveModel {
        id: Set(id),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    };

    let model = user.insert(conn).await?;
    Ok(model)
}

/// Replace a user's password hash.
pub async fn update_password<C: ConnectionTrait>(conn: &C, user_id: Uuid, password_hash: &str) -> Result<()> {
    UsersEntity::update_many()
        .col_expr(Column::PasswordHash, Expr::value(password_hash))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(user_id))
        .exec(conn)
        .await?;

    Ok(())
}
