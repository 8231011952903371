use sea_orm_migration::{prelude::*, schema::*};

use super::m20250301_000001_create_guides::Guide;
use super::m20250301_000002_create_hotels::Hotel;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trip::Table)
                    .if_not_exists()
                    .col(pk_auto(Trip::Id))
                    .col(string(Trip::Title).not_null())
                    .col(double(Trip::Price).not_null())
                    .col(date(Trip::StartDate).not_null())
                    .col(date(Trip::EndDate).not_null())
                    .col(string(Trip::Image).not_null())
                    .col(
                        string_len(Trip::ImageKind, 16)
                            .not_null()
                            .default("placeholder"),
                    )
                    .col(text(Trip::Description).not_null())
                    .col(integer(Trip::AvailableSlots).not_null())
                    .col(string(Trip::Slug).not_null())
                    .col(text_null(Trip::Itinerary))
                    .col(json(Trip::Waypoints).not_null())
                    .col(text_null(Trip::Inclusions))
                    .col(text_null(Trip::Exclusions))
                    .col(text_null(Trip::Requirements))
                    .col(string_null(Trip::MeetingPoint))
                    .col(integer(Trip::GuideId).not_null())
                    .col(integer(Trip::HotelId).not_null())
                    .col(
                        timestamp_with_time_zone(Trip::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Trip::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_guide")
                            .from(Trip::Table, Trip::GuideId)
                            .to(Guide::Table, Guide::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trip_hotel")
                            .from(Trip::Table, Trip::HotelId)
                            .to(Hotel::Table, Hotel::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_trip_slug")
                    .table(Trip::Table)
                    .col(Trip::Slug)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trip::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Trip {
    Table,
    Id,
    Title,
    Price,
    StartDate,
    EndDate,
    Image,
    ImageKind,
    Description,
    AvailableSlots,
    Slug,
    Itinerary,
    Waypoints,
    Inclusions,
    Exclusions,
    Requirements,
    MeetingPoint,
    GuideId,
    HotelId,
    CreatedAt,
    UpdatedAt,
}
