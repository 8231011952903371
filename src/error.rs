use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use askama::Template;
use sea_orm::DbErr;
use thiserror::Error;

use crate::middleware::upload::UploadError;
use crate::views::{ErrorPage, Layout};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A body axum's own extractors refused, with the status they chose.
    #[error("Rejected ({status}): {message}")]
    Rejected { status: StatusCode, message: String },

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Rejected { status, .. } => *status,
            AppError::Upload(e) => e.status(),
            AppError::Database(_) | AppError::Template(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Page title and the message shown to the user.
    fn page_text(&self) -> (&'static str, String) {
        match self {
            AppError::BadRequest(msg) => ("Solicitud no válida", msg.clone()),
            AppError::NotFound(msg) => ("No encontrado", msg.clone()),
            AppError::Rejected { status, message } if status.is_client_error() => {
                ("Solicitud no válida", message.clone())
            }
            AppError::Upload(e) if e.status().is_client_error() => {
                ("Imagen no válida", e.to_string())
            }
            _ => ("Error", "Ocurrió un error inesperado".to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::warn!(status = %status, error = %self, "Request rejected");
        }

        let (page, message) = self.page_text();
        let body = ErrorPage {
            layout: Layout::new(page),
            message: message.clone(),
        };

        match body.render() {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                tracing::error!("Failed to render error page: {}", e);
                (status, message).into_response()
            }
        }
    }
}
