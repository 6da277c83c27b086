//! Data models and configuration
//!
//! Defines the persisted frame record, the validated inputs that create it,
//! and the environment-driven service configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A stored camera frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    pub frame_id: i64,
    /// Storage key of the re-encoded frame image.
    pub frame_url: String,
    pub camera_width: u32,
    pub camera_height: u32,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a [`FrameRecord`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewFrame {
    pub frame_url: String,
    pub camera_size: CameraSize,
}

/// Camera dimensions, both strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraSize {
    width: u32,
    height: u32,
}

impl CameraSize {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { width, height })
    }

    /// Parse form values such as `"1080"`; surrounding whitespace is ignored.
    pub fn parse(width: &str, height: &str) -> Option<Self> {
        let width = width.trim().parse().ok()?;
        let height = height.trim().parse().ok()?;
        Self::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// A validated `POST /frames` upload.
#[derive(Debug, Clone)]
pub struct FrameUpload {
    pub image: Vec<u8>,
    pub camera_size: CameraSize,
}

/// Result of a successful frame creation.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedFrame {
    pub frame_id: i64,
    pub frame_img_url: String,
}

// Configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint: String,
    pub region: String,
    pub bucket: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub storage: StorageConfig,
    pub openai_api_key: String,
    pub image_model: String,
    pub translate_api_key: String,
    pub translate_source_lang: String,
    pub translate_target_lang: String,
    pub download_timeout: Duration,
    pub max_upload_bytes: usize,
    pub expose_error_details: bool,
    pub not_found_as_404: bool,
    pub dry_run: bool,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let dry_run = env_flag("DRY_RUN")?;

        Ok(Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 8000)?,
            database_path: env_or("DATABASE_PATH", "inframe.sqlite3"),
            storage: StorageConfig {
                access_key_id: env_required("STORAGE_ACCESS_KEY_ID", dry_run)?,
                secret_access_key: env_required("STORAGE_SECRET_ACCESS_KEY", dry_run)?,
                endpoint: env_or("STORAGE_ENDPOINT", "https://s3.ap-northeast-2.amazonaws.com"),
                region: env_or("STORAGE_REGION", "ap-northeast-2"),
                bucket: env_or("STORAGE_BUCKET", "inframe"),
                base_url: env_or(
                    "STORAGE_BASE_URL",
                    "https://inframe.s3.ap-northeast-2.amazonaws.com",
                ),
            },
            openai_api_key: env_required("OPENAI_API_KEY", dry_run)?,
            image_model: env_or("IMAGE_MODEL", "dall-e-3"),
            translate_api_key: env_required("TRANSLATE_API_KEY", dry_run)?,
            translate_source_lang: env_or("TRANSLATE_SOURCE_LANG", "ko"),
            translate_target_lang: env_or("TRANSLATE_TARGET_LANG", "en"),
            download_timeout: Duration::from_secs(env_parse("DOWNLOAD_TIMEOUT_SECS", 60)?),
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
            expose_error_details: env_flag("EXPOSE_ERROR_DETAILS")?,
            not_found_as_404: env_flag("FRAME_NOT_FOUND_AS_404")?,
            dry_run,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Required outside dry-run mode; dry runs fall back to an empty value.
fn env_required(key: &str, dry_run: bool) -> crate::Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ if dry_run => Ok(String::new()),
        _ => Err(crate::Error::Config(format!("{} not set", key))),
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> crate::Result<T> {
    match std::env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| crate::Error::Config(format!("{} has invalid value '{}'", key, value))),
        Err(_) => Ok(default),
    }
}

fn env_flag(key: &str) -> crate::Result<bool> {
    match std::env::var(key) {
        Ok(value) => parse_flag(&value)
            .ok_or_else(|| crate::Error::Config(format!("{} must be true or false", key))),
        Err(_) => Ok(false),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_size_rejects_zero() {
        assert!(CameraSize::new(0, 100).is_none());
        assert!(CameraSize::new(100, 0).is_none());
        assert!(CameraSize::new(1, 1).is_some());
    }

    #[test]
    fn test_camera_size_parse() {
        let size = CameraSize::parse(" 1080 ", "1920").unwrap();
        assert_eq!(size.width(), 1080);
        assert_eq!(size.height(), 1920);

        assert!(CameraSize::parse("-5", "100").is_none());
        assert!(CameraSize::parse("12.5", "100").is_none());
        assert!(CameraSize::parse("wide", "100").is_none());
        assert!(CameraSize::parse("", "100").is_none());
    }

    #[test]
    fn test_frame_record_serialization() {
        let record = FrameRecord {
            frame_id: 7,
            frame_url: "frame_1.jpg".to_string(),
            camera_width: 640,
            camera_height: 480,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"frameId\":7"));
        assert!(json.contains("\"frameUrl\":\"frame_1.jpg\""));
        assert!(json.contains("\"cameraWidth\":640"));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
