use std::env;
use std::path::PathBuf;

use crate::middleware::upload::UploadCategory;

/// Process-wide settings, read once at startup and shared through `AppState`.
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    /// Prefix for absolute image URLs, without a trailing slash.
    pub base_url: String,
    /// Directory served as static files; uploads land in `<public_dir>/uploads`.
    pub public_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| "4000".to_string())
            .parse()
            .expect("PORT must be a number");

        let base_url = env::var("BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", server_port));

        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port,
            base_url: base_url.trim_end_matches('/').to_string(),
            public_dir: env::var("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("public")),
        }
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.public_dir.join("uploads")
    }

    pub fn upload_dir(&self, category: UploadCategory) -> PathBuf {
        self.uploads_dir().join(category.dir_name())
    }
}
