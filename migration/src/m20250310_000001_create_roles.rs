use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Role::Table)
                    .if_not_exists()
                    .col(pk_auto(Role::Id))
                    .col(string_len(Role::Name, 100).not_null())
                    .col(string_len(Role::Code, 50).not_null().unique_key())
                    .col(json_binary(Role::Permissions).not_null())
                    .col(string_len(Role::Status, 16).not_null())
                    .col(
                        timestamp_with_time_zone(Role::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Role::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Seed the role catalogue
        let all = serde_json::json!(["read", "create", "update", "delete"]);
        let read_write = serde_json::json!(["read", "create", "update"]);
        let read_only = serde_json::json!(["read"]);

        let insert = Query::insert()
            .into_table(Role::Table)
            .columns([Role::Name, Role::Code, Role::Permissions, Role::Status])
            .values_panic([
                "Суперадмин".into(),
                "superadmin".into(),
                all.clone().into(),
                "active".into(),
            ])
            .values_panic([
                "Владелец".into(),
                "owner".into(),
                all.clone().into(),
                "active".into(),
            ])
            .values_panic([
                "Администратор".into(),
                "admin".into(),
                all.into(),
                "active".into(),
            ])
            .values_panic([
                "Менеджер".into(),
                "manager".into(),
                read_write.into(),
                "active".into(),
            ])
            .values_panic([
                "Оператор".into(),
                "operator".into(),
                read_only.into(),
                "active".into(),
            ])
            .to_owned();

        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Role::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Role {
    Table,
    Id,
    Name,
    Code,
    Permissions,
    Status,
    CreatedAt,
    UpdatedAt,
}
