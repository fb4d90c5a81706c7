use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Food::Table)
                    .if_not_exists()
                    .col(pk_auto(Food::Id))
                    .col(string_len(Food::Name, 255).not_null())
                    .col(string_len(Food::Status, 16).not_null())
                    .col(
                        timestamp_with_time_zone(Food::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Food::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Food::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Food {
    Table,
    Id,
    Name,
    Status,
    CreatedAt,
    UpdatedAt,
}
