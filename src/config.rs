use std::{path::PathBuf, str::FromStr};

use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

use crate::models::propertymodel::CatalogVariant;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub run_migrations: bool,
    pub jwt_secret: String,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub log_level: LevelFilter,
    // Media
    pub media_dir: PathBuf,
    pub media_base_url: String,
    pub image_max_dimension: u32,
    pub image_jpeg_quality: u8,
    pub image_max_bytes: usize,
    pub max_upload_bytes: usize,
    // Catalog
    pub catalog_ttl_secs: u64,
    pub catalog_variant: CatalogVariant,
}

impl Config {
    pub fn init() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let media_base_url = lookup("MEDIA_BASE_URL")
            .unwrap_or_else(|| "/media".to_string())
            .trim_end_matches('/')
            .to_string();

        let image_jpeg_quality: u8 = parse_or(&lookup, "IMAGE_JPEG_QUALITY", 75)?;
        if !(1..=100).contains(&image_jpeg_quality) {
            return Err(ConfigError::Invalid {
                key: "IMAGE_JPEG_QUALITY",
                value: image_jpeg_quality.to_string(),
            });
        }

        Ok(Config {
            database_url,
            database_max_connections: parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", 10)?,
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
            jwt_secret,
            port: parse_or(&lookup, "PORT", 8000)?,
            allowed_origins,
            log_level: parse_or(&lookup, "LOG_LEVEL", LevelFilter::DEBUG)?,
            media_dir: lookup("MEDIA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./media")),
            media_base_url,
            image_max_dimension: parse_or(&lookup, "IMAGE_MAX_DIMENSION", 600)?,
            image_jpeg_quality,
            image_max_bytes: parse_or(&lookup, "IMAGE_MAX_BYTES", 900_000)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 50 * 1024 * 1024)?,
            catalog_ttl_secs: parse_or(&lookup, "CATALOG_TTL_SECS", 30)?,
            catalog_variant: parse_or(&lookup, "CATALOG_VARIANT", CatalogVariant::Residential)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(default),
    }
}
