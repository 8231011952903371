use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Guide::Table)
                    .if_not_exists()
                    .col(pk_auto(Guide::Id))
                    .col(string_len(Guide::FirstName, 100).not_null())
                    .col(string_len(Guide::LastName, 100).not_null())
                    .col(string_len(Guide::Email, 255).not_null())
                    .col(string_len_null(Guide::Phone, 50))
                    .col(string_null(Guide::Languages))
                    .col(integer(Guide::YearsExperience).not_null().default(0))
                    .col(string_null(Guide::Photo))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Guide::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Guide {
    Table,
    Id,
    FirstName,
    LastName,
    Email,
    Phone,
    Languages,
    YearsExperience,
    Photo,
}
