//! Configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use wx_sdk::types::User;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port (default: 3000).
    pub port: u16,

    /// Directory holding one JSON file per store namespace (default: ./data).
    pub data_dir: PathBuf,

    /// Path to uploads directory (default: ./uploads).
    pub uploads_dir: PathBuf,

    /// Base URL for serving uploaded files (default: /files).
    pub files_url: String,

    /// Directory with the Tera templates (default: the kernel's own).
    pub templates_dir: PathBuf,

    /// Public site URL that page URLs are built on.
    pub site_url: String,

    /// Show the inline block editor on post pages (default: off).
    pub editor_enabled: bool,

    /// Email of the signed-in user. Empty means nobody is signed in.
    pub user_email: Option<String>,

    pub user_first_name: Option<String>,

    pub user_last_name: Option<String>,

    /// CORS allowed origins (comma-separated, default: "*").
    pub cors_allowed_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .context("PORT must be a valid u16")?;

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data"));

        let uploads_dir = env::var("UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./uploads"));

        let files_url = env::var("FILES_URL").unwrap_or_else(|_| "/files".to_string());

        let templates_dir = env::var("TEMPLATES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_templates_dir());

        let site_url = env::var("SITE_URL").unwrap_or_else(|_| format!("http://localhost:{port}"));

        let editor_enabled = env::var("WX_EDITOR")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        let user_email = non_empty(
            env::var("WX_USER_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string()),
        );
        let user_first_name = env::var("WX_USER_FIRST_NAME").ok().and_then(non_empty);
        let user_last_name = env::var("WX_USER_LAST_NAME").ok().and_then(non_empty);

        let cors_allowed_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_else(|_| vec!["*".to_string()]);

        Ok(Self {
            port,
            data_dir,
            uploads_dir,
            files_url,
            templates_dir,
            site_url,
            editor_enabled,
            user_email,
            user_first_name,
            user_last_name,
            cors_allowed_origins,
        })
    }

    /// Templates shipped with the kernel crate.
    pub fn default_templates_dir() -> PathBuf {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/templates"))
    }

    /// The signed-in user, if an email is configured.
    pub fn user(&self) -> Option<User> {
        let email = self.user_email.clone()?;
        Some(User {
            first_name: self.user_first_name.clone(),
            last_name: self.user_last_name.clone(),
            email,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
