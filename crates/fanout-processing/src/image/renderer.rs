//! Variant renderer
//!
//! Decodes a source image once and derives the four tiers from it. Each tier is encoded
//! independently in the source format: a tier that fails to encode is absent, the others
//! are unaffected. A source that does not decode yields an empty set.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use fanout_core::constants::DEFAULT_JPEG_QUALITY;
use fanout_core::{VariantSet, VariantTier};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};

use super::resize::ImageResize;

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode {tier} variant: {message}")]
    Encode { tier: VariantTier, message: String },

    #[error("Render task failed: {0}")]
    Task(String),
}

/// Turns one source buffer into its variant set.
///
/// A tier that fails is `None`; a set without its original is abandoned by the caller.
#[async_trait]
pub trait RenderVariants: Send + Sync {
    async fn render_variants(&self, data: Bytes) -> VariantSet;
}

/// Decoded source plus the format its variants are written in
struct DecodedSource {
    image: DynamicImage,
    format: ImageFormat,
}

#[derive(Debug, Clone, Copy)]
pub struct VariantRenderer {
    jpeg_quality: u8,
}

impl Default for VariantRenderer {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

impl VariantRenderer {
    pub fn with_jpeg_quality(quality: u8) -> Self {
        Self {
            jpeg_quality: quality.clamp(1, 100),
        }
    }

    fn decode(data: &[u8]) -> Result<DecodedSource, RenderError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| RenderError::Decode(e.to_string()))?;
        let format = reader
            .format()
            .ok_or_else(|| RenderError::Decode("unrecognized image format".to_string()))?;
        let image = reader
            .decode()
            .map_err(|e| RenderError::Decode(e.to_string()))?;
        Ok(DecodedSource { image, format })
    }

    fn encode(
        &self,
        tier: VariantTier,
        image: &DynamicImage,
        format: ImageFormat,
    ) -> Result<Bytes, RenderError> {
        let encode_err = |e: image::ImageError| RenderError::Encode {
            tier,
            message: e.to_string(),
        };
        let mut buf = Vec::new();

        match format {
            ImageFormat::Jpeg => {
                // JPEG has no alpha channel
                let rgb = DynamicImage::ImageRgb8(image.to_rgb8());
                let encoder = JpegEncoder::new_with_quality(&mut buf, self.jpeg_quality);
                rgb.write_with_encoder(encoder).map_err(encode_err)?;
            }
            ImageFormat::WebP => {
                let rgba = DynamicImage::ImageRgba8(image.to_rgba8());
                rgba.write_to(&mut Cursor::new(&mut buf), ImageFormat::WebP)
                    .map_err(encode_err)?;
            }
            other => {
                image
                    .write_to(&mut Cursor::new(&mut buf), other)
                    .map_err(encode_err)?;
            }
        }

        Ok(Bytes::from(buf))
    }

    fn render_tier(
        &self,
        tier: VariantTier,
        source: &DecodedSource,
    ) -> Result<Bytes, RenderError> {
        let resized = tier
            .max_dimension()
            .and_then(|max| ImageResize::resize_to_fit(&source.image, max));
        let image = resized.as_ref().unwrap_or(&source.image);
        self.encode(tier, image, source.format)
    }

    /// Decode once on the blocking pool, then encode the four tiers concurrently.
    pub async fn render(&self, data: Bytes) -> VariantSet {
        let size = data.len();
        let decoded = tokio::task::spawn_blocking(move || Self::decode(&data))
            .await
            .map_err(|e| RenderError::Task(e.to_string()))
            .and_then(|result| result);

        let source = match decoded {
            Ok(source) => Arc::new(source),
            Err(e) => {
                tracing::warn!(error = %e, size_bytes = size, "Source is not a decodable image");
                return VariantSet::default();
            }
        };

        let renders = VariantTier::ALL.map(|tier| {
            let renderer = *self;
            let source = Arc::clone(&source);
            async move {
                let result = tokio::task::spawn_blocking(move || renderer.render_tier(tier, &source))
                    .await
                    .map_err(|e| RenderError::Task(e.to_string()))
                    .and_then(|result| result);
                (tier, result)
            }
        });

        let mut set = VariantSet::default();
        for (tier, result) in futures::future::join_all(renders).await {
            set.set(tier, self.log_failure(tier, result));
        }
        set
    }

    fn log_failure(&self, tier: VariantTier, result: Result<Bytes, RenderError>) -> Option<Bytes> {
        match result {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                tracing::warn!(tier = %tier, error = %e, "Variant render failed");
                None
            }
        }
    }
}

#[async_trait]
impl RenderVariants for VariantRenderer {
    async fn render_variants(&self, data: Bytes) -> VariantSet {
        self.render(data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::encoded_image;
    use image::GenericImageView;

    fn dimensions(data: &Bytes) -> (u32, u32) {
        image::load_from_memory(data).unwrap().dimensions()
    }

    #[tokio::test]
    async fn test_valid_image_renders_all_tiers() {
        let source = encoded_image(1200, 800, ImageFormat::Png);
        let set = VariantRenderer::default().render(source).await;

        assert_eq!(set.present().count(), 4);
        assert_eq!(dimensions(set.original.as_ref().unwrap()), (1200, 800));
        assert_eq!(dimensions(set.large.as_ref().unwrap()), (1000, 667));
        assert_eq!(dimensions(set.medium.as_ref().unwrap()), (500, 333));
        assert_eq!(dimensions(set.small.as_ref().unwrap()), (200, 133));
    }

    #[tokio::test]
    async fn test_small_source_is_not_upscaled() {
        let source = encoded_image(150, 90, ImageFormat::Jpeg);
        let set = VariantRenderer::default().render(source).await;

        for (tier, data) in set.present() {
            assert_eq!(dimensions(data), (150, 90), "{} was resized", tier);
        }
    }

    #[tokio::test]
    async fn test_output_keeps_source_format() {
        let source = encoded_image(300, 300, ImageFormat::Jpeg);
        let set = VariantRenderer::default().render(source).await;

        let small = set.small.unwrap();
        assert_eq!(image::guess_format(&small).unwrap(), ImageFormat::Jpeg);
        assert_eq!(dimensions(&small), (200, 200));
    }

    #[tokio::test]
    async fn test_webp_source() {
        let source = encoded_image(640, 320, ImageFormat::WebP);
        let set = VariantRenderer::default().render(source).await;
        assert!(set.is_usable());
        assert_eq!(
            image::guess_format(set.medium.as_ref().unwrap()).unwrap(),
            ImageFormat::WebP
        );
    }

    #[tokio::test]
    async fn test_undecodable_source_has_no_original() {
        let set = VariantRenderer::default()
            .render(Bytes::from_static(b"definitely not an image"))
            .await;
        assert!(!set.is_usable());
        assert_eq!(set.present().count(), 0);
    }

    #[tokio::test]
    async fn test_truncated_png_is_rejected() {
        let source = encoded_image(64, 64, ImageFormat::Png);
        let truncated = source.slice(..source.len() / 2);
        let set = VariantRenderer::default().render(truncated).await;
        assert!(set.original.is_none());
    }

    #[tokio::test]
    async fn test_jpeg_quality_controls_encoded_size() {
        let data = encoded_image(640, 480, ImageFormat::Jpeg);
        let low = VariantRenderer::with_jpeg_quality(10).render(data.clone()).await;
        let high = VariantRenderer::with_jpeg_quality(95).render(data).await;
        assert!(low.original.unwrap().len() < high.original.unwrap().len());
    }
}
