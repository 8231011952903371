use chrono::NaiveDate;
use serde::Deserialize;

use crate::entities::trip::{self, Waypoint, Waypoints};
use crate::utils::geo::is_valid_coordinate;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw trip form as submitted. Field names follow the HTML form.
///
/// Kept as strings so a rejected submission can be shown again exactly as
/// typed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TripForm {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "precio")]
    pub price: String,
    #[serde(rename = "fecha_ida")]
    pub start_date: String,
    #[serde(rename = "fecha_vuelta")]
    pub end_date: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "disponibles")]
    pub available_slots: String,
    #[serde(rename = "itinerario")]
    pub itinerary: String,
    #[serde(rename = "puntos_itinerario")]
    pub waypoints: String,
    #[serde(rename = "incluye")]
    pub inclusions: String,
    #[serde(rename = "no_incluye")]
    pub exclusions: String,
    #[serde(rename = "requisitos")]
    pub requirements: String,
    #[serde(rename = "punto_encuentro")]
    pub meeting_point: String,
    #[serde(rename = "guia_id")]
    pub guide_id: String,
    #[serde(rename = "hotel_id")]
    pub hotel_id: String,
}

/// A form that passed validation, with every value in its storage type.
/// Waypoints and the image are resolved separately.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidTrip {
    pub title: String,
    pub price: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub description: String,
    pub available_slots: i32,
    pub itinerary: Option<String>,
    pub inclusions: Option<String>,
    pub exclusions: Option<String>,
    pub requirements: Option<String>,
    pub meeting_point: Option<String>,
    pub guide_id: i32,
    pub hotel_id: i32,
}

impl TripForm {
    /// Prefill values for editing a stored trip.
    pub fn from_model(trip: &trip::Model) -> Self {
        Self {
            title: trip.title.clone(),
            price: trip.price.to_string(),
            start_date: trip.start_date.format(DATE_FORMAT).to_string(),
            end_date: trip.end_date.format(DATE_FORMAT).to_string(),
            description: trip.description.clone(),
            available_slots: trip.available_slots.to_string(),
            itinerary: trip.itinerary.clone().unwrap_or_default(),
            waypoints: waypoints_json(&trip.waypoints),
            inclusions: trip.inclusions.clone().unwrap_or_default(),
            exclusions: trip.exclusions.clone().unwrap_or_default(),
            requirements: trip.requirements.clone().unwrap_or_default(),
            meeting_point: trip.meeting_point.clone().unwrap_or_default(),
            guide_id: trip.guide_id.to_string(),
            hotel_id: trip.hotel_id.to_string(),
        }
    }

    /// Check required fields and parse typed values.
    ///
    /// Collects one message per problem instead of stopping at the first.
    pub fn validate(&self) -> Result<ValidTrip, Vec<String>> {
        let mut errors = Vec::new();

        let title = required(&self.title, "El título es obligatorio", &mut errors);
        let price = required(&self.price, "El precio es obligatorio", &mut errors).and_then(|v| {
            parse_with(v, "El precio debe ser un número positivo", &mut errors, |s| {
                s.replace(',', ".").parse::<f64>().ok().filter(|p| p.is_finite() && *p >= 0.0)
            })
        });
        let start_date = required(&self.start_date, "La fecha de ida es obligatoria", &mut errors)
            .and_then(|v| {
                parse_with(v, "La fecha de ida no es válida", &mut errors, |s| {
                    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
                })
            });
        let end_date = required(&self.end_date, "La fecha de vuelta es obligatoria", &mut errors)
            .and_then(|v| {
                parse_with(v, "La fecha de vuelta no es válida", &mut errors, |s| {
                    NaiveDate::parse_from_str(s, DATE_FORMAT).ok()
                })
            });
        let description = required(&self.description, "La descripción es obligatoria", &mut errors);
        let available_slots = required(
            &self.available_slots,
            "Las plazas disponibles son obligatorias",
            &mut errors,
        )
        .and_then(|v| {
            parse_with(
                v,
                "Las plazas disponibles deben ser un número entero",
                &mut errors,
                |s| s.parse::<i32>().ok().filter(|n| *n >= 0),
            )
        });
        let guide_id = parse_with(
            self.guide_id.trim(),
            "Selecciona un guía turístico",
            &mut errors,
            |s| s.parse::<i32>().ok(),
        );
        let hotel_id = parse_with(
            self.hotel_id.trim(),
            "Selecciona un hotel",
            &mut errors,
            |s| s.parse::<i32>().ok(),
        );

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                errors.push("La fecha de vuelta no puede ser anterior a la fecha de ida".to_string());
            }
        }

        match (
            title,
            price,
            start_date,
            end_date,
            description,
            available_slots,
            guide_id,
            hotel_id,
        ) {
            (
                Some(title),
                Some(price),
                Some(start_date),
                Some(end_date),
                Some(description),
                Some(available_slots),
                Some(guide_id),
                Some(hotel_id),
            ) if errors.is_empty() => Ok(ValidTrip {
                title: title.to_string(),
                price,
                start_date,
                end_date,
                description: description.to_string(),
                available_slots,
                itinerary: optional(&self.itinerary),
                inclusions: optional(&self.inclusions),
                exclusions: optional(&self.exclusions),
                requirements: optional(&self.requirements),
                meeting_point: optional(&self.meeting_point),
                guide_id,
                hotel_id,
            }),
            _ => Err(errors),
        }
    }

    /// Parse the waypoints payload.
    ///
    /// `None` when the field is blank or unusable: callers then keep the
    /// previous value (or an empty list for a new trip). A malformed payload
    /// is logged, never reported to the user.
    pub fn parse_waypoints(&self) -> Option<Waypoints> {
        let raw = self.waypoints.trim();
        if raw.is_empty() {
            return None;
        }

        let points: Vec<Waypoint> = match serde_json::from_str(raw) {
            Ok(points) => points,
            Err(e) => {
                tracing::warn!("Ignoring malformed itinerary points: {}", e);
                return None;
            }
        };

        if let Some(bad) = points.iter().find(|p| !is_valid_coordinate(p.lat, p.lng)) {
            tracing::warn!(
                lat = bad.lat,
                lng = bad.lng,
                "Ignoring itinerary points with out-of-range coordinates"
            );
            return None;
        }

        Some(Waypoints(points))
    }
}

pub fn waypoints_json(waypoints: &Waypoints) -> String {
    if waypoints.0.is_empty() {
        return String::new();
    }
    serde_json::to_string(waypoints).unwrap_or_default()
}

fn required<'a>(value: &'a str, message: &str, errors: &mut Vec<String>) -> Option<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(message.to_string());
        None
    } else {
        Some(value)
    }
}

fn parse_with<T>(
    value: &str,
    message: &str,
    errors: &mut Vec<String>,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Option<T> {
    let parsed = parse(value);
    if parsed.is_none() {
        errors.push(message.to_string());
    }
    parsed
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}
