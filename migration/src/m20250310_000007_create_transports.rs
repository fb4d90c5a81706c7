use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Transport::Table)
                    .if_not_exists()
                    .col(pk_auto(Transport::Id))
                    .col(string_len(Transport::Name, 255).not_null())
                    .col(string_len(Transport::Kind, 16).not_null())
                    .col(string_len_null(Transport::Description, 1000))
                    .col(string_len(Transport::Status, 16).not_null())
                    .col(
                        timestamp_with_time_zone(Transport::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Transport::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TransportPhoto::Table)
                    .if_not_exists()
                    .col(pk_auto(TransportPhoto::Id))
                    .col(integer(TransportPhoto::TransportId).not_null())
                    .col(string_len(TransportPhoto::Url, 500).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_transport_photo_transport")
                            .from(TransportPhoto::Table, TransportPhoto::TransportId)
                            .to(Transport::Table, Transport::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TransportPhoto::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Transport::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Transport {
    Table,
    Id,
    Name,
    Kind,
    Description,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum TransportPhoto {
    Table,
    Id,
    TransportId,
    Url,
}
