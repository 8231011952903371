use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, Set};

use crate::entities::trip::{self, ImageKind, Waypoint, Waypoints};
use crate::entities::{guide, hotel};
use crate::error::{AppError, AppResult};
use crate::utils::slug::slug_for;

/// Insert a sample guide, hotel and trip when the database has no guides yet.
/// Returns whether anything was inserted.
pub async fn seed_sample_data(db: &DatabaseConnection) -> AppResult<bool> {
    if guide::Entity::find().count(db).await? > 0 {
        return Ok(false);
    }

    let guide = guide::ActiveModel {
        first_name: Set("Juan".to_string()),
        last_name: Set("Pérez".to_string()),
        email: Set("juan@example.com".to_string()),
        phone: Set(Some("+212 666-555-444".to_string())),
        languages: Set(Some("Español, Inglés, Francés".to_string())),
        years_experience: Set(8),
        photo: Set(Some("guia1.jpg".to_string())),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let hotel = hotel::ActiveModel {
        name: Set("Hotel Riad Marrakech".to_string()),
        address: Set(Some("Medina 123".to_string())),
        city: Set("Marrakech".to_string()),
        country: Set("Marruecos".to_string()),
        stars: Set(5),
        phone: Set(Some("+212 524-555-666".to_string())),
        email: Set(Some("info@riadmarrakech.com".to_string())),
        website: Set(Some("https://riadmarrakech.com".to_string())),
        image: Set(Some("hotel1.jpg".to_string())),
        services: Set(Some(
            "WiFi, Piscina, Spa, Restaurante, Servicio de habitaciones".to_string(),
        )),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let title = "Viaje a Marrakech";
    let now = Utc::now();
    let trip = trip::ActiveModel {
        title: Set(title.to_string()),
        price: Set(2500.0),
        start_date: Set(date(2025, 3, 15)?),
        end_date: Set(date(2025, 3, 22)?),
        image: Set("marrakech".to_string()),
        image_kind: Set(ImageKind::Placeholder),
        description: Set("Descubre la magia de Marrakech en este viaje inolvidable.".to_string()),
        available_slots: Set(15),
        slug: Set(slug_for(title)),
        itinerary: Set(Some(
            [
                "Día 1: Llegada y check-in en el hotel",
                "Día 2: Tour por la Medina y zocos",
                "Día 3: Visita a los Jardines Majorelle y la Mezquita Koutoubia",
                "Día 4: Excursión al desierto de Agafay",
                "Día 5: Día libre para compras y spa",
            ]
            .join("\n"),
        )),
        waypoints: Set(Waypoints(vec![
            stop(31.631794, -8.008889, "Aeropuerto de Marrakech"),
            stop(31.631111, -7.984167, "Hotel Riad Marrakech"),
            stop(31.628674, -7.989178, "Medina y zocos"),
            stop(31.641673, -8.003914, "Jardines Majorelle"),
            stop(31.625132, -7.989397, "Mezquita Koutoubia"),
            stop(31.464722, -8.166667, "Desierto de Agafay"),
        ])),
        inclusions: Set(Some(
            "Vuelos, Hotel, Desayuno, Guía, Traslados, Tours mencionados en el itinerario"
                .to_string(),
        )),
        exclusions: Set(Some(
            "Comidas no especificadas, Propinas, Gastos personales".to_string(),
        )),
        requirements: Set(Some(
            "Pasaporte vigente con al menos 6 meses de validez".to_string(),
        )),
        meeting_point: Set(Some("Aeropuerto de Marrakech".to_string())),
        guide_id: Set(guide.id),
        hotel_id: Set(hotel.id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    tracing::info!(
        guide = guide.id,
        hotel = hotel.id,
        trip = %trip.slug,
        "Sample data created"
    );
    Ok(true)
}

fn stop(lat: f64, lng: f64, description: &str) -> Waypoint {
    Waypoint {
        lat,
        lng,
        description: description.to_string(),
    }
}

fn date(year: i32, month: u32, day: u32) -> AppResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::Internal(format!("Invalid seed date {year}-{month}-{day}")))
}
