use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageOutputFormat};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::Config;

#[derive(Error, Debug, PartialEq)]
pub enum ImageError {
    #[error("Image must be a data URL or an http(s) link")]
    InvalidReference,

    #[error("Image data is not valid base64: {0}")]
    InvalidEncoding(String),

    #[error("Unsupported or corrupt image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Image is {size} bytes after compression, the limit is {max} bytes")]
    ImageTooLarge { size: usize, max: usize },
}

/// What an image field on a form turned out to hold.
#[derive(Debug, PartialEq)]
pub enum ImageSource {
    /// Already hosted somewhere; stored as given.
    Remote(String),
    /// Raw bytes decoded from a data URL.
    Inline(Vec<u8>),
}

impl ImageSource {
    pub fn parse(reference: &str) -> Result<ImageSource, ImageError> {
        let reference = reference.trim();

        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Ok(ImageSource::Remote(reference.to_string()));
        }

        let payload = reference
            .strip_prefix("data:image/")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(_, payload)| payload)
            .ok_or(ImageError::InvalidReference)?;

        general_purpose::STANDARD
            .decode(payload)
            .map(ImageSource::Inline)
            .map_err(|e| ImageError::InvalidEncoding(e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct ProcessedImage {
    /// Hex SHA-256 of `bytes`.
    pub content_id: String,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct ImagePipeline {
    pub max_dimension: u32,
    pub jpeg_quality: u8,
    pub max_bytes: usize,
}

impl ImagePipeline {
    pub fn new(max_dimension: u32, jpeg_quality: u8, max_bytes: usize) -> Self {
        ImagePipeline {
            max_dimension,
            jpeg_quality,
            max_bytes,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        ImagePipeline::new(
            config.image_max_dimension,
            config.image_jpeg_quality,
            config.image_max_bytes,
        )
    }

    /// Decode, downscale and re-encode as JPEG. CPU bound; call it from
    /// `spawn_blocking` in async code.
    pub fn process(&self, raw: &[u8]) -> Result<ProcessedImage, ImageError> {
        let decoded = image::load_from_memory(raw).map_err(|e| ImageError::Decode(e.to_string()))?;

        let (width, height) = decoded.dimensions();
        let (target_width, target_height) = target_dimensions(width, height, self.max_dimension);

        let resized = if (target_width, target_height) == (width, height) {
            decoded
        } else {
            decoded.resize_exact(target_width, target_height, FilterType::Triangle)
        };

        // JPEG has no alpha channel
        let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());

        let mut bytes = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Jpeg(self.jpeg_quality))
            .map_err(|e| ImageError::Encode(e.to_string()))?;

        if bytes.len() > self.max_bytes {
            return Err(ImageError::ImageTooLarge {
                size: bytes.len(),
                max: self.max_bytes,
            });
        }

        Ok(ProcessedImage {
            content_id: content_id(&bytes),
            bytes,
            width: target_width,
            height: target_height,
        })
    }
}

/// Scales so the longer side is at most `max_dimension`, never upscaling.
/// Each side is rounded and kept at least one pixel.
pub fn target_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest == 0 || longest <= max_dimension {
        return (width.max(1), height.max(1));
    }

    let scale = max_dimension as f64 / longest as f64;
    let scaled = |side: u32| ((side as f64 * scale).round() as u32).max(1);

    (scaled(width), scaled(height))
}

pub fn content_id(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
