//! Shared setup for the admin integration tests: a real router over a SQLite
//! database and a public directory, both inside a temporary directory.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use image::{DynamicImage, ImageFormat, RgbImage};
use sea_orm::{Database, DatabaseConnection, EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use tempfile::TempDir;
use tower::ServiceExt;

use travel_agency_admin::{
    config::Config,
    db::seed::seed_sample_data,
    entities::{guide, hotel, trip},
    middleware::upload::{ensure_upload_dirs, UploadCategory},
    routes, AppState,
};

pub const BASE_URL: &str = "http://localhost:4000";
const BOUNDARY: &str = "----travel-admin-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub config: Config,
    pub guide_id: i32,
    pub hotel_id: i32,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let database_url = format!("sqlite://{}?mode=rwc", dir.path().join("admin.db").display());

        let db = Database::connect(&database_url)
            .await
            .expect("connect to sqlite");
        migration::Migrator::up(&db, None)
            .await
            .expect("run migrations");
        seed_sample_data(&db).await.expect("seed sample data");

        let config = Config {
            database_url,
            server_host: "127.0.0.1".to_string(),
            server_port: 4000,
            base_url: BASE_URL.to_string(),
            public_dir: dir.path().join("public"),
        };
        ensure_upload_dirs(&config)
            .await
            .expect("create upload dirs");

        let guide_id = guide::Entity::find()
            .one(&db)
            .await
            .unwrap()
            .expect("seeded guide")
            .id;
        let hotel_id = hotel::Entity::find()
            .one(&db)
            .await
            .unwrap()
            .expect("seeded hotel")
            .id;

        let router = routes::create_router(AppState {
            db: db.clone(),
            config: config.clone(),
        });

        Self {
            router,
            db,
            config,
            guide_id,
            hotel_id,
            _dir: dir,
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.request(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, String)]) -> Response {
        let body = serde_urlencoded::to_string(fields).unwrap();

        self.request(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn post_multipart(
        &self,
        uri: &str,
        fields: &[(&str, String)],
        file: Option<(&str, &str, Vec<u8>)>,
    ) -> Response {
        let files: Vec<_> = file.into_iter().collect();
        self.post_multipart_files(uri, fields, &files).await
    }

    /// Multipart submission with any number of `imagen` file parts, sent
    /// after the text fields in the given order.
    pub async fn post_multipart_files(
        &self,
        uri: &str,
        fields: &[(&str, String)],
        files: &[(&str, &str, Vec<u8>)],
    ) -> Response {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (file_name, content_type, data) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"imagen\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        self.request(
            Request::post(uri)
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }

    pub async fn trip_count(&self) -> u64 {
        trip::Entity::find().count(&self.db).await.unwrap()
    }

    pub fn trip_uploads_dir(&self) -> PathBuf {
        self.config.upload_dir(UploadCategory::Trips)
    }

    pub fn stored_uploads(&self) -> Vec<PathBuf> {
        std::fs::read_dir(self.trip_uploads_dir())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect()
    }

    /// A complete, valid trip form for the seeded guide and hotel.
    pub fn trip_fields(&self, title: &str) -> Vec<(&'static str, String)> {
        vec![
            ("titulo", title.to_string()),
            ("precio", "1800".to_string()),
            ("fecha_ida", "2025-05-10".to_string()),
            ("fecha_vuelta", "2025-05-17".to_string()),
            ("descripcion", "Recorrido por la ciudad imperial".to_string()),
            ("disponibles", "12".to_string()),
            ("itinerario", "Día 1: Llegada".to_string()),
            (
                "puntos_itinerario",
                r#"[{"lat": 34.0331, "lng": -5.0003, "descripcion": "Aeropuerto de Fez"}, {"lat": 34.0617, "lng": -4.9731, "descripcion": "Medina"}]"#
                    .to_string(),
            ),
            ("incluye", "Hotel, Desayuno".to_string()),
            ("no_incluye", "Propinas".to_string()),
            ("requisitos", "Pasaporte".to_string()),
            ("punto_encuentro", "Aeropuerto de Fez".to_string()),
            ("guia_id", self.guide_id.to_string()),
            ("hotel_id", self.hotel_id.to_string()),
        ]
    }
}

pub fn without(fields: Vec<(&'static str, String)>, name: &str) -> Vec<(&'static str, String)> {
    fields.into_iter().filter(|(k, _)| *k != name).collect()
}

pub fn with(
    fields: Vec<(&'static str, String)>,
    name: &'static str,
    value: &str,
) -> Vec<(&'static str, String)> {
    let mut fields = without(fields, name);
    fields.push((name, value.to_string()));
    fields
}

pub async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn assert_redirects_to_list(response: &Response) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(header::LOCATION).unwrap(),
        "/admin/viajes"
    );
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::new(width, height));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}
