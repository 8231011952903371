//! askama page models. Handlers build these and hand them to [`render`].

use askama::Template;
use axum::response::Html;
use chrono::{Datelike, Utc};

use crate::error::AppResult;
use crate::handlers::trip_form::TripForm;

pub const SITE_NAME: &str = "Agencia de Viajes";

/// Values every page shares through `base.html`.
pub struct Layout {
    pub page: String,
    pub site_name: &'static str,
    pub year: i32,
}

impl Layout {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            site_name: SITE_NAME,
            year: Utc::now().year(),
        }
    }
}

pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: i32, label: String, current: &str) -> Self {
        let value = value.to_string();
        let selected = value == current.trim();
        Self {
            value,
            label,
            selected,
        }
    }
}

pub struct TripRow {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub price: String,
    pub start_date: String,
    pub end_date: String,
    pub available_slots: i32,
    pub guide_name: String,
    pub hotel_name: String,
    pub image_src: String,
    pub stops: usize,
    pub route_km: String,
}

#[derive(Template)]
#[template(path = "admin/trips.html")]
pub struct TripListPage {
    pub layout: Layout,
    pub trips: Vec<TripRow>,
}

#[derive(Template)]
#[template(path = "admin/trip_form.html")]
pub struct TripFormPage {
    pub layout: Layout,
    pub action: String,
    pub submit_label: &'static str,
    pub form: TripForm,
    pub errors: Vec<String>,
    pub guides: Vec<SelectOption>,
    pub hotels: Vec<SelectOption>,
    pub current_image: Option<String>,
}

impl TripFormPage {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn image_preview(&self) -> &str {
        self.current_image.as_deref().unwrap_or("")
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorPage {
    pub layout: Layout,
    pub message: String,
}

pub fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    Ok(Html(template.render()?))
}
