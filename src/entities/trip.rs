use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Where a trip's image lives.
///
/// `Uploaded` images were written by the upload step under the public
/// directory and are removed together with the trip. `Placeholder` images are
/// just a name derived from the title and never touch the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ImageKind {
    #[sea_orm(string_value = "uploaded")]
    Uploaded,
    #[sea_orm(string_value = "placeholder")]
    Placeholder,
}

/// A single stop of the itinerary map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
    #[serde(rename = "descripcion", default)]
    pub description: String,
}

/// Ordered itinerary stops, stored as a JSON array.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct Waypoints(pub Vec<Waypoint>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub price: f64,
    pub start_date: Date,
    pub end_date: Date,
    pub image: String,
    pub image_kind: ImageKind,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub available_slots: i32,
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub itinerary: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub waypoints: Waypoints,
    #[sea_orm(column_type = "Text", nullable)]
    pub inclusions: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub exclusions: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub requirements: Option<String>,
    pub meeting_point: Option<String>,
    pub guide_id: i32,
    pub hotel_id: i32,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl Model {
    /// Path or URL the browser should load for this trip's image.
    pub fn image_src(&self) -> String {
        match self.image_kind {
            ImageKind::Uploaded => self.image.clone(),
            ImageKind::Placeholder => format!("/img/destinos_{}.jpg", self.image),
        }
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::guide::Entity",
        from = "Column::GuideId",
        to = "super::guide::Column::Id"
    )]
    Guide,
    #[sea_orm(
        belongs_to = "super::hotel::Entity",
        from = "Column::HotelId",
        to = "super::hotel::Column::Id"
    )]
    Hotel,
}

impl Related<super::guide::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Guide.def()
    }
}

impl Related<super::hotel::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotel.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
