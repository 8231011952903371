//! Upload step for the admin forms.
//!
//! [`UploadForm`] is an extractor that consumes the request body before the
//! handler runs: text fields are collected as-is, while the `imagen` file part
//! is validated, resized and written below `<public>/uploads/<category>/`.
//! A rejected file fails the request without ever reaching the handler.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Component, Path, PathBuf};

use axum::{
    extract::{
        multipart::{Field, MultipartError},
        FromRequest, Multipart, Request,
    },
    http::{header, StatusCode, Uri},
    Form,
};
use chrono::Utc;
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::AppState;

/// Multipart field that carries the image.
pub const IMAGE_FIELD: &str = "imagen";

/// Largest accepted image file, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5_000_000;

/// Body limit for the form routes: the image plus room for the text fields.
pub const MAX_FORM_BYTES: usize = MAX_IMAGE_BYTES + 1024 * 1024;

pub const MAX_WIDTH: u32 = 1200;
pub const MAX_HEIGHT: u32 = 800;

const ALLOWED_TYPES: [&str; 4] = ["jpeg", "jpg", "png", "webp"];

/// Subdirectory of `uploads/` an image is written to. Routes choose it by
/// inserting the value as a request extension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UploadCategory {
    #[default]
    Trips,
    Guides,
    Hotels,
}

impl UploadCategory {
    pub const ALL: [UploadCategory; 3] = [
        UploadCategory::Trips,
        UploadCategory::Guides,
        UploadCategory::Hotels,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            UploadCategory::Trips => "viajes",
            UploadCategory::Guides => "guias",
            UploadCategory::Hotels => "hoteles",
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Solo se permiten imágenes (jpeg, jpg, png, webp)")]
    UnsupportedType,

    #[error("La imagen supera el tamaño máximo de {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Solo se permite una imagen por formulario")]
    TooManyFiles,

    #[error("No se pudo leer el formulario: {0}")]
    Multipart(#[from] MultipartError),

    #[error("El archivo no es una imagen válida")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Failed to store image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::UnsupportedType | UploadError::TooManyFiles | UploadError::Decode(_) => {
                StatusCode::BAD_REQUEST
            }
            UploadError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            UploadError::Multipart(e) => e.status(),
            UploadError::Encode(_) | UploadError::Io(_) | UploadError::Worker(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// An image written by the upload step.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    /// Absolute URL: configured base URL plus `relative_path`.
    pub url: String,
    /// `/uploads/<category>/<file>`
    pub relative_path: String,
    /// Location of the written file.
    pub path: PathBuf,
}

impl UploadedImage {
    /// Remove the written file, for a submission that ends up not being saved.
    pub async fn discard(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => tracing::info!(path = %self.path.display(), "Discarded upload"),
            Err(e) => tracing::warn!(path = %self.path.display(), "Upload not discarded: {}", e),
        }
    }
}

/// Text fields of a submitted form plus the image the upload step stored, if
/// any.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub image: Option<UploadedImage>,
}

impl UploadForm {
    /// Deserialize the text fields into a typed form. Every value is a string.
    pub fn parse_fields<T: DeserializeOwned>(&self) -> AppResult<T> {
        let map: serde_json::Map<String, serde_json::Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();

        serde_json::from_value(serde_json::Value::Object(map))
            .map_err(|e| AppError::BadRequest(format!("Formulario no válido: {}", e)))
    }
}

impl FromRequest<AppState> for UploadForm {
    type Rejection = AppError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let category = req
            .extensions()
            .get::<UploadCategory>()
            .copied()
            .unwrap_or_default();

        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::Rejected {
                    status: e.status(),
                    message: e.body_text(),
                })?;
            return Ok(Self {
                fields,
                image: None,
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::Rejected {
                status: e.status(),
                message: e.body_text(),
            })?;

        let mut form = UploadForm::default();
        if let Err(e) = read_parts(&mut multipart, category, &state.config, &mut form).await {
            // A rejected request keeps no file.
            if let Some(image) = form.image.take() {
                image.discard().await;
            }
            return Err(e.into());
        }

        Ok(form)
    }
}

/// Read every part into `form`. At most one image is accepted.
async fn read_parts(
    multipart: &mut Multipart,
    category: UploadCategory,
    config: &Config,
    form: &mut UploadForm,
) -> Result<(), UploadError> {
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == IMAGE_FIELD && field.file_name().is_some() {
            let has_file = field.file_name().is_some_and(|f| !f.is_empty());
            if has_file && form.image.is_some() {
                return Err(UploadError::TooManyFiles);
            }
            if let Some(image) = store_image(field, category, config).await? {
                form.image = Some(image);
            }
            continue;
        }

        let value = field.text().await?;
        form.fields.insert(name, value);
    }
    Ok(())
}

/// Validate, resize and persist one file part. `Ok(None)` means the browser
/// sent the field without choosing a file.
async fn store_image(
    mut field: Field<'_>,
    category: UploadCategory,
    config: &Config,
) -> Result<Option<UploadedImage>, UploadError> {
    let file_name = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().unwrap_or_default().to_string();

    if file_name.is_empty() {
        // Drain the empty part so the next field can be read.
        while field.chunk().await?.is_some() {}
        return Ok(None);
    }

    let extension = accepted_extension(&content_type, &file_name)?;

    let mut data = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if data.len() + chunk.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge {
                limit: MAX_IMAGE_BYTES,
            });
        }
        data.extend_from_slice(&chunk);
    }

    if data.is_empty() {
        return Ok(None);
    }

    let image = save_image(data, &extension, category, config).await?;
    tracing::info!(
        original = %file_name,
        stored = %image.relative_path,
        "Image uploaded"
    );
    Ok(Some(image))
}

/// Check the declared MIME type and the file extension against the accepted
/// image types. Returns the lowercased extension.
pub fn accepted_extension(content_type: &str, file_name: &str) -> Result<String, UploadError> {
    let mime = content_type.to_ascii_lowercase();
    let mime_ok = ALLOWED_TYPES.iter().any(|t| mime.contains(t));

    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let extension_ok = ALLOWED_TYPES.contains(&extension.as_str());

    if mime_ok && extension_ok {
        Ok(extension)
    } else {
        Err(UploadError::UnsupportedType)
    }
}

/// Resize and write `data` under the category directory with a fresh name.
pub async fn save_image(
    data: Vec<u8>,
    extension: &str,
    category: UploadCategory,
    config: &Config,
) -> Result<UploadedImage, UploadError> {
    let format = ImageFormat::from_extension(extension).ok_or(UploadError::UnsupportedType)?;

    let dir = config.upload_dir(category);
    tokio::fs::create_dir_all(&dir).await?;

    let file_name = format!(
        "{}-{}.{}",
        Uuid::new_v4(),
        Utc::now().timestamp_millis(),
        extension
    );
    let path = dir.join(&file_name);

    let encoded = tokio::task::spawn_blocking(move || resize_image(&data, format)).await??;
    tokio::fs::write(&path, encoded).await?;

    let relative_path = format!("/uploads/{}/{}", category.dir_name(), file_name);
    Ok(UploadedImage {
        url: format!("{}{}", config.base_url, relative_path),
        relative_path,
        path,
    })
}

/// Fit the image inside `MAX_WIDTH` x `MAX_HEIGHT` keeping its aspect ratio.
/// Smaller images keep their size.
pub fn resize_image(data: &[u8], format: ImageFormat) -> Result<Vec<u8>, UploadError> {
    let img = image::load_from_memory(data).map_err(UploadError::Decode)?;

    let img = if img.width() > MAX_WIDTH || img.height() > MAX_HEIGHT {
        img.resize(MAX_WIDTH, MAX_HEIGHT, FilterType::Lanczos3)
    } else {
        img
    };

    // JPEG has no alpha channel.
    let img = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        _ => img,
    };

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format).map_err(UploadError::Encode)?;
    Ok(out.into_inner())
}

/// Map an uploaded image URL back to its file below `public_dir`.
///
/// Only paths inside `uploads/` made of plain components are accepted.
pub fn resolve_local_path(public_dir: &Path, image_url: &str) -> Option<PathBuf> {
    let uri: Uri = image_url.parse().ok()?;
    let relative = Path::new(uri.path().trim_start_matches('/'));

    let plain = relative
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !plain || !relative.starts_with("uploads") {
        return None;
    }

    Some(public_dir.join(relative))
}

/// Best-effort removal of an uploaded image. A missing file is not an error.
pub async fn remove_uploaded_image(public_dir: &Path, image_url: &str) {
    let Some(path) = resolve_local_path(public_dir, image_url) else {
        tracing::warn!(url = %image_url, "Refusing to delete image outside uploads");
        return;
    };

    match tokio::fs::remove_file(&path).await {
        Ok(()) => tracing::info!(path = %path.display(), "Image removed"),
        Err(e) => tracing::debug!(path = %path.display(), "Image not removed: {}", e),
    }
}

/// Create every category directory. Safe to call repeatedly.
pub async fn ensure_upload_dirs(config: &Config) -> std::io::Result<()> {
    for category in UploadCategory::ALL {
        tokio::fs::create_dir_all(config.upload_dir(category)).await?;
    }
    Ok(())
}
