use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bank::Table)
                    .if_not_exists()
                    .col(pk_auto(Bank::Id))
                    .col(string_len(Bank::Name, 255).not_null())
                    .col(string_len(Bank::Bic, 20).not_null().unique_key())
                    .col(string_len(Bank::Status, 16).not_null())
                    .col(
                        timestamp_with_time_zone(Bank::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Bank::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Bank::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Bank {
    Table,
    Id,
    Name,
    Bic,
    Status,
    CreatedAt,
    UpdatedAt,
}
