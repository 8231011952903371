use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Hotel::Table)
                    .if_not_exists()
                    .col(pk_auto(Hotel::Id))
                    .col(string_len(Hotel::Name, 150).not_null())
                    .col(string_null(Hotel::Address))
                    .col(string_len(Hotel::City, 100).not_null())
                    .col(string_len(Hotel::Country, 100).not_null())
                    .col(integer(Hotel::Stars).not_null().default(3))
                    .col(string_len_null(Hotel::Phone, 50))
                    .col(string_null(Hotel::Email))
                    .col(string_null(Hotel::Website))
                    .col(string_null(Hotel::Image))
                    .col(text_null(Hotel::Services))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Hotel::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Hotel {
    Table,
    Id,
    Name,
    Address,
    City,
    Country,
    Stars,
    Phone,
    Email,
    Website,
    Image,
    Services,
}
