use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExtraService::Table)
                    .if_not_exists()
                    .col(pk_auto(ExtraService::Id))
                    .col(string_len(ExtraService::Name, 255).not_null())
                    .col(string_len(ExtraService::Code, 50).not_null().unique_key())
                    .col(string_len(ExtraService::Status, 16).not_null())
                    .col(
                        timestamp_with_time_zone(ExtraService::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(ExtraService::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExtraService::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum ExtraService {
    Table,
    Id,
    Name,
    Code,
    Status,
    CreatedAt,
    UpdatedAt,
}
