use sea_orm_migration::{prelude::*, schema::*};

use crate::m20260110_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PasswordResetRequests::Table)
                    .if_not_exists()
                    .col(pk_uuid(PasswordResetRequests::Id))
                    .col(uuid(PasswordResetRequests::UserId))
                    .col(string(PasswordResetRequests::Email))
                    .col(string_null(PasswordResetRequests::RequestIp))
                    .col(timestamp_with_time_zone(PasswordResetRequests::RequestedAt))
                    .col(string(PasswordResetRequests::OtpHash))
                    .col(boolean(PasswordResetRequests::IsOtpUsable).default(true))
                    .col(
                        timestamp_with_time_zone(PasswordResetRequests::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_password_reset_requests_user")
                            .from(PasswordResetRequests::Table, PasswordResetRequests::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // The hot path reads the most recent row for one user.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_password_reset_requests_user_created")
                    .table(PasswordResetRequests::Table)
                    .col(PasswordResetRequests::UserId)
                    .col(PasswordResetRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PasswordResetRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum PasswordResetRequests {
    Table,
    Id,
    UserId,
    Email,
    RequestIp,
    RequestedAt,
    OtpHash,
    IsOtpUsable,
    CreatedAt,
}
