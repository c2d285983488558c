use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmailVerificationRequests::Table)
                    .if_not_exists()
                    .col(pk_uuid(EmailVerificationRequests::Id))
                    .col(string(EmailVerificationRequests::Email))
                    .col(string_null(EmailVerificationRequests::RequestIp))
                    .col(binary(EmailVerificationRequests::OtpSealed))
                    .col(boolean(EmailVerificationRequests::IsOtpUsable).default(true))
                    .col(timestamp_with_time_zone(EmailVerificationRequests::RequestedAt))
                    .col(
                        timestamp_with_time_zone(EmailVerificationRequests::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(EmailVerificationRequests::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // The hot path reads the most recent row for one email; verification
        // runs before an account exists, so the key is the address itself.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_email_verification_requests_email_created")
                    .table(EmailVerificationRequests::Table)
                    .col(EmailVerificationRequests::Email)
                    .col(EmailVerificationRequests::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmailVerificationRequests::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum EmailVerificationRequests {
    Table,
    Id,
    Email,
    RequestIp,
    OtpSealed,
    IsOtpUsable,
    RequestedAt,
    CreatedAt,
    UpdatedAt,
}
