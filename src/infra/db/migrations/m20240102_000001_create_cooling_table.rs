//! Migration: Create the cooling_model table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CoolingModel::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CoolingModel::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CoolingModel::Name).string_len(255).null())
                    .col(ColumnDef::new(CoolingModel::Components).json_binary().null())
                    .col(ColumnDef::new(CoolingModel::Losses).json_binary().null())
                    .col(ColumnDef::new(CoolingModel::Faces).json_binary().null())
                    .col(ColumnDef::new(CoolingModel::Passages).json_binary().null())
                    .col(ColumnDef::new(CoolingModel::Fluids).json_binary().null())
                    .col(ColumnDef::new(CoolingModel::OwnerId).uuid().null())
                    .col(
                        ColumnDef::new(CoolingModel::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CoolingModel::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cooling_model_owner")
                            .from(CoolingModel::Table, CoolingModel::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cooling_model_owner_id")
                    .table(CoolingModel::Table)
                    .col(CoolingModel::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CoolingModel::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum CoolingModel {
    Table,
    Id,
    Name,
    Components,
    Losses,
    Faces,
    Passages,
    Fluids,
    OwnerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Users {
    Table,
    Id,
}
