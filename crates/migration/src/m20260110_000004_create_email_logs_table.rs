use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EmailLogs::Table)
                    .if_not_exists()
                    .col(pk_uuid(EmailLogs::Id))
                    .col(uuid_null(EmailLogs::UserId))
                    .col(string_null(EmailLogs::ProviderMessageId))
                    .col(string(EmailLogs::Sender))
                    .col(string(EmailLogs::Recipient))
                    .col(string(EmailLogs::Subject))
                    .col(string(EmailLogs::BodyType))
                    .col(text(EmailLogs::Body))
                    .col(
                        timestamp_with_time_zone(EmailLogs::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_email_logs_recipient")
                    .table(EmailLogs::Table)
                    .col(EmailLogs::Recipient)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EmailLogs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum EmailLogs {
    Table,
    Id,
    UserId,
    ProviderMessageId,
    Sender,
    Recipient,
    Subject,
    BodyType,
    CreatedAt,
    Body,
}
