use std::sync::Arc;

use crate::service::{
    blob_store::BlobStore,
    error::ServiceError,
    image_pipeline::{ImagePipeline, ImageSource},
};

/// Turns submitted image references into stored URLs.
#[derive(Clone)]
pub struct MediaService {
    pipeline: ImagePipeline,
    store: Arc<dyn BlobStore>,
}

impl std::fmt::Debug for MediaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaService")
            .field("pipeline", &self.pipeline)
            .field("store", &"dyn BlobStore")
            .finish()
    }
}

impl MediaService {
    pub fn new(pipeline: ImagePipeline, store: Arc<dyn BlobStore>) -> Self {
        MediaService { pipeline, store }
    }

    pub async fn resolve(&self, reference: &str) -> Result<String, ServiceError> {
        let raw = match ImageSource::parse(reference)? {
            ImageSource::Remote(url) => return Ok(url),
            ImageSource::Inline(raw) => raw,
        };

        let pipeline = self.pipeline;
        let processed = tokio::task::spawn_blocking(move || pipeline.process(&raw))
            .await
            .map_err(|e| ServiceError::Other(format!("Image task failed: {}", e)))??;

        tracing::debug!(
            "Processed image {} ({}x{}, {} bytes)",
            processed.content_id,
            processed.width,
            processed.height,
            processed.bytes.len()
        );

        Ok(self.store.put(&processed.content_id, &processed.bytes).await?)
    }

    /// Resolves every reference, keeping their order.
    pub async fn resolve_all(&self, references: &[String]) -> Result<Vec<String>, ServiceError> {
        let mut urls = Vec::with_capacity(references.len());
        for reference in references {
            urls.push(self.resolve(reference).await?);
        }
        Ok(urls)
    }
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, sync::Mutex};

    use async_trait::async_trait;
    use base64::{engine::general_purpose, Engine as _};
    use image::{DynamicImage, ImageBuffer, ImageOutputFormat, Rgb};

    use super::*;
    use crate::service::{blob_store::BlobError, image_pipeline::ImageError};

    #[derive(Default)]
    struct MemoryStore {
        puts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BlobStore for MemoryStore {
        async fn put(&self, content_id: &str, _bytes: &[u8]) -> Result<String, BlobError> {
            self.puts.lock().unwrap().push(content_id.to_string());
            Ok(format!("/media/{}.jpg", content_id))
        }
    }

    fn inline_png(width: u32, height: u32) -> String {
        let buffer = ImageBuffer::from_pixel(width, height, Rgb([200u8, 120, 40]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(buffer)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", general_purpose::STANDARD.encode(bytes))
    }

    #[tokio::test]
    async fn mixed_references_resolve_in_order() {
        let store = Arc::new(MemoryStore::default());
        let media = MediaService::new(ImagePipeline::new(600, 75, 900_000), store.clone());

        let urls = media
            .resolve_all(&["https://cdn.example/cover.jpg".to_string(), inline_png(800, 400)])
            .await
            .unwrap();

        assert_eq!(urls[0], "https://cdn.example/cover.jpg");
        assert!(urls[1].starts_with("/media/") && urls[1].ends_with(".jpg"));
        assert_eq!(store.puts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn oversized_images_never_reach_the_store() {
        let store = Arc::new(MemoryStore::default());
        let media = MediaService::new(ImagePipeline::new(600, 75, 10), store.clone());

        let err = media.resolve(&inline_png(50, 50)).await.unwrap_err();

        assert!(matches!(err, ServiceError::Image(ImageError::ImageTooLarge { .. })));
        assert!(store.puts.lock().unwrap().is_empty());
    }
}
