use std::collections::HashMap;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, EntityTrait, ModelTrait, QueryOrder, Set};

use crate::entities::trip::{self, ImageKind};
use crate::entities::{guide, hotel};
use crate::error::{AppError, AppResult};
use crate::handlers::trip_form::{waypoints_json, TripForm, ValidTrip};
use crate::middleware::upload::{remove_uploaded_image, UploadForm, UploadedImage};
use crate::utils::geo::route_length_km;
use crate::utils::slug::{placeholder_image_name, slug_for};
use crate::views::{render, Layout, SelectOption, TripFormPage, TripListPage, TripRow};
use crate::AppState;

pub const TRIPS_PATH: &str = "/admin/viajes";

/// GET /admin/viajes
pub async fn list_trips(State(state): State<AppState>) -> AppResult<Html<String>> {
    let trips = trip::Entity::find()
        .order_by_asc(trip::Column::Id)
        .all(&state.db)
        .await?;
    let guides: HashMap<i32, guide::Model> = guide::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|g| (g.id, g))
        .collect();
    let hotels: HashMap<i32, hotel::Model> = hotel::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|h| (h.id, h))
        .collect();

    let rows = trips
        .into_iter()
        .map(|t| TripRow {
            id: t.id,
            image_src: t.image_src(),
            price: format!("{:.2}", t.price),
            start_date: t.start_date.format("%d/%m/%Y").to_string(),
            end_date: t.end_date.format("%d/%m/%Y").to_string(),
            available_slots: t.available_slots,
            guide_name: guides
                .get(&t.guide_id)
                .map(|g| g.full_name())
                .unwrap_or_default(),
            hotel_name: hotels
                .get(&t.hotel_id)
                .map(|h| h.name.clone())
                .unwrap_or_default(),
            stops: t.waypoints.0.len(),
            route_km: format!("{:.1}", route_length_km(&t.waypoints.0)),
            title: t.title,
            slug: t.slug,
        })
        .collect();

    render(&TripListPage {
        layout: Layout::new("Administrar Viajes"),
        trips: rows,
    })
}

/// GET /admin/viajes/crear
pub async fn new_trip_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    let page = form_page(
        &state,
        "Crear Nuevo Viaje".to_string(),
        format!("{}/crear", TRIPS_PATH),
        "Crear viaje",
        TripForm::default(),
        Vec::new(),
        None,
    )
    .await?;
    render(&page)
}

/// POST /admin/viajes/crear
pub async fn create_trip(State(state): State<AppState>, upload: UploadForm) -> AppResult<Response> {
    let form: TripForm = upload.parse_fields()?;

    let valid = match validate_with_references(&state, &form).await? {
        Ok(valid) => valid,
        Err(errors) => {
            discard_upload(upload.image.as_ref()).await;
            let page = form_page(
                &state,
                "Crear Nuevo Viaje".to_string(),
                format!("{}/crear", TRIPS_PATH),
                "Crear viaje",
                form,
                errors,
                None,
            )
            .await?;
            return Ok(render(&page)?.into_response());
        }
    };

    let (image, image_kind) = match upload.image {
        Some(uploaded) => (uploaded.url, ImageKind::Uploaded),
        None => (placeholder_image_name(&valid.title), ImageKind::Placeholder),
    };
    let waypoints = form.parse_waypoints().unwrap_or_default();
    let now = Utc::now();

    let new_trip = trip::ActiveModel {
        slug: Set(slug_for(&valid.title)),
        image: Set(image),
        image_kind: Set(image_kind),
        waypoints: Set(waypoints),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..active_fields(valid)
    };

    let created = new_trip.insert(&state.db).await?;
    tracing::info!(id = created.id, slug = %created.slug, "Trip created");

    Ok(Redirect::to(TRIPS_PATH).into_response())
}

/// GET /admin/viajes/editar/{id}
pub async fn edit_trip_form(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Html<String>> {
    let trip = trip::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("El viaje que intentas editar no existe".to_string()))?;

    let page = form_page(
        &state,
        format!("Editar Viaje: {}", trip.title),
        format!("{}/editar/{}", TRIPS_PATH, trip.id),
        "Guardar cambios",
        TripForm::from_model(&trip),
        Vec::new(),
        Some(trip.image_src()),
    )
    .await?;
    render(&page)
}

/// POST /admin/viajes/editar/{id}
pub async fn update_trip(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    upload: UploadForm,
) -> AppResult<Response> {
    let Some(existing) = trip::Entity::find_by_id(id).one(&state.db).await? else {
        discard_upload(upload.image.as_ref()).await;
        return Err(AppError::NotFound(
            "El viaje que intentas actualizar no existe".to_string(),
        ));
    };

    let mut form: TripForm = upload.parse_fields()?;

    let valid = match validate_with_references(&state, &form).await? {
        Ok(valid) => valid,
        Err(errors) => {
            discard_upload(upload.image.as_ref()).await;
            if form.waypoints.trim().is_empty() {
                form.waypoints = waypoints_json(&existing.waypoints);
            }
            let page = form_page(
                &state,
                format!("Editar Viaje: {}", existing.title),
                format!("{}/editar/{}", TRIPS_PATH, existing.id),
                "Guardar cambios",
                form,
                errors,
                Some(existing.image_src()),
            )
            .await?;
            return Ok(render(&page)?.into_response());
        }
    };

    let slug = if valid.title != existing.title {
        slug_for(&valid.title)
    } else {
        existing.slug.clone()
    };

    let replaced_image = match (&upload.image, existing.image_kind) {
        (Some(_), ImageKind::Uploaded) => Some(existing.image.clone()),
        _ => None,
    };
    let (image, image_kind) = match upload.image {
        Some(uploaded) => (uploaded.url, ImageKind::Uploaded),
        None => (existing.image.clone(), existing.image_kind),
    };

    let waypoints = form
        .parse_waypoints()
        .unwrap_or_else(|| existing.waypoints.clone());

    let mut active: trip::ActiveModel = existing.into();
    let fields = active_fields(valid);
    active.title = fields.title;
    active.price = fields.price;
    active.start_date = fields.start_date;
    active.end_date = fields.end_date;
    active.description = fields.description;
    active.available_slots = fields.available_slots;
    active.itinerary = fields.itinerary;
    active.inclusions = fields.inclusions;
    active.exclusions = fields.exclusions;
    active.requirements = fields.requirements;
    active.meeting_point = fields.meeting_point;
    active.guide_id = fields.guide_id;
    active.hotel_id = fields.hotel_id;
    active.slug = Set(slug);
    active.image = Set(image);
    active.image_kind = Set(image_kind);
    active.waypoints = Set(waypoints);
    active.updated_at = Set(Utc::now().into());

    let updated = active.update(&state.db).await?;
    tracing::info!(id = updated.id, slug = %updated.slug, "Trip updated");

    if let Some(old) = replaced_image {
        remove_uploaded_image(&state.config.public_dir, &old).await;
    }

    Ok(Redirect::to(TRIPS_PATH).into_response())
}

/// POST /admin/viajes/eliminar/{id}
pub async fn delete_trip(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Redirect> {
    let trip = trip::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("El viaje que intentas eliminar no existe".to_string())
        })?;

    if trip.image_kind == ImageKind::Uploaded {
        remove_uploaded_image(&state.config.public_dir, &trip.image).await;
    }

    let slug = trip.slug.clone();
    trip.delete(&state.db).await?;
    tracing::info!(id, slug = %slug, "Trip deleted");

    Ok(Redirect::to(TRIPS_PATH))
}

/// Form validation plus a lookup of the selected guide and hotel.
///
/// The outer `Result` carries storage failures, the inner one the messages
/// to show next to the form.
async fn validate_with_references(
    state: &AppState,
    form: &TripForm,
) -> AppResult<Result<ValidTrip, Vec<String>>> {
    let valid = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => return Ok(Err(errors)),
    };

    let mut errors = Vec::new();
    if guide::Entity::find_by_id(valid.guide_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        errors.push("El guía turístico seleccionado no existe".to_string());
    }
    if hotel::Entity::find_by_id(valid.hotel_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        errors.push("El hotel seleccionado no existe".to_string());
    }

    if errors.is_empty() {
        Ok(Ok(valid))
    } else {
        Ok(Err(errors))
    }
}

/// Columns that come straight from the validated form.
fn active_fields(valid: ValidTrip) -> trip::ActiveModel {
    trip::ActiveModel {
        title: Set(valid.title),
        price: Set(valid.price),
        start_date: Set(valid.start_date),
        end_date: Set(valid.end_date),
        description: Set(valid.description),
        available_slots: Set(valid.available_slots),
        itinerary: Set(valid.itinerary),
        inclusions: Set(valid.inclusions),
        exclusions: Set(valid.exclusions),
        requirements: Set(valid.requirements),
        meeting_point: Set(valid.meeting_point),
        guide_id: Set(valid.guide_id),
        hotel_id: Set(valid.hotel_id),
        ..Default::default()
    }
}

/// Remove an image stored for a submission that was not saved.
async fn discard_upload(image: Option<&UploadedImage>) {
    if let Some(image) = image {
        image.discard().await;
    }
}

async fn form_page(
    state: &AppState,
    title: String,
    action: String,
    submit_label: &'static str,
    form: TripForm,
    errors: Vec<String>,
    current_image: Option<String>,
) -> AppResult<TripFormPage> {
    let guides = guide::Entity::find()
        .order_by_asc(guide::Column::LastName)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|g| SelectOption::new(g.id, g.full_name(), &form.guide_id))
        .collect();
    let hotels = hotel::Entity::find()
        .order_by_asc(hotel::Column::Name)
        .all(&state.db)
        .await?
        .into_iter()
        .map(|h| {
            let label = format!("{} ({})", h.name, h.city);
            SelectOption::new(h.id, label, &form.hotel_id)
        })
        .collect();

    Ok(TripFormPage {
        layout: Layout::new(title),
        action,
        submit_label,
        form,
        errors,
        guides,
        hotels,
        current_image,
    })
}
