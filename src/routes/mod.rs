use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use tower_http::services::ServeDir;

use crate::handlers::trips;
use crate::middleware::upload::{UploadCategory, MAX_FORM_BYTES};
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    // Trip administration; uploads from these forms go to uploads/viajes
    let admin_routes = Router::new()
        .route("/viajes", get(trips::list_trips))
        .route(
            "/viajes/crear",
            get(trips::new_trip_form).post(trips::create_trip),
        )
        .route(
            "/viajes/editar/{id}",
            get(trips::edit_trip_form).post(trips::update_trip),
        )
        .route("/viajes/eliminar/{id}", post(trips::delete_trip))
        .layer(Extension(UploadCategory::Trips))
        .layer(DefaultBodyLimit::max(MAX_FORM_BYTES));

    // Static assets and uploaded images
    let public = ServeDir::new(&state.config.public_dir);

    Router::new()
        .nest("/admin", admin_routes)
        .fallback_service(public)
        .with_state(state)
}
