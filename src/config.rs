use std::{env, fmt, time::Duration};

use crate::error::{Result, TripError};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";
pub const DEFAULT_CLOUDINARY_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
pub const DEFAULT_IMAGE_FOLDER: &str = "trip_planner_images";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Credentials and model choices for the Gemini API.
#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub image_model: String,
    /// Per-request timeout; `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: None,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("image_model", &self.image_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Cloudinary account used to host generated place images.
#[derive(Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub base_url: String,
    pub folder: String,
}

impl fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("folder", &self.folder)
            .finish()
    }
}

/// Service configuration.
///
/// Built once at startup and passed down explicitly; nothing reads the
/// environment after [`AppConfig::from_env`] returns.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini: GeminiConfig,
    pub cloudinary: Option<CloudinaryConfig>,
    /// Generate and host an image for every activity after planning.
    pub place_images: bool,
    /// SQLite URL; `None` keeps trips in memory.
    pub database_url: Option<String>,
    pub bind: String,
}

impl AppConfig {
    /// Build a config from the process environment (after loading `.env`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = get("GEMINI_API_KEY").ok_or_else(|| {
            TripError::Config("GEMINI_API_KEY must be set before starting the planner".to_string())
        })?;

        let timeout = match get("GEMINI_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(raw.parse::<u64>().map_err(|_| {
                TripError::Config(format!(
                    "GEMINI_TIMEOUT_SECS must be a whole number, got `{raw}`"
                ))
            })?)),
            None => None,
        };

        let gemini = GeminiConfig {
            api_key,
            base_url: get("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            model: get("TRIP_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: get("TRIP_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            timeout,
        };

        let cloudinary = match (
            get("CLOUDINARY_CLOUD_NAME"),
            get("CLOUDINARY_API_KEY"),
            get("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                base_url: get("CLOUDINARY_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_CLOUDINARY_BASE_URL.to_string()),
                folder: get("CLOUDINARY_FOLDER")
                    .unwrap_or_else(|| DEFAULT_IMAGE_FOLDER.to_string()),
            }),
            (None, None, None) => None,
            _ => {
                return Err(TripError::Config(
                    "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set together"
                        .to_string(),
                ))
            }
        };

        let place_images = match get("TRIP_PLACE_IMAGES")
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            None => false,
            Some("1") | Some("true") | Some("yes") | Some("on") => true,
            Some("0") | Some("false") | Some("no") | Some("off") => false,
            Some(other) => {
                return Err(TripError::Config(format!(
                    "TRIP_PLACE_IMAGES must be true or false, got `{other}`"
                )))
            }
        };

        Ok(Self {
            gemini,
            cloudinary,
            place_images,
            database_url: get("DATABASE_URL"),
            bind: get("TRIP_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
        })
    }

    /// Place images need both the flag and an image host.
    pub fn place_images_enabled(&self) -> bool {
        self.place_images && self.cloudinary.is_some()
    }
}
