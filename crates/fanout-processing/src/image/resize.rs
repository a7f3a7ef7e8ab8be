use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};

/// Image resize operations
pub struct ImageResize;

impl ImageResize {
    /// Fit `(width, height)` inside a `max x max` box, preserving aspect ratio.
    ///
    /// Images already inside the box keep their size; variants never upscale.
    pub fn fit_within(width: u32, height: u32, max: u32) -> (u32, u32) {
        let largest = width.max(height);
        if largest <= max || largest == 0 {
            return (width, height);
        }

        let scale = max as f64 / largest as f64;
        let w = ((width as f64 * scale).round() as u32).clamp(1, max);
        let h = ((height as f64 * scale).round() as u32).clamp(1, max);
        (w, h)
    }

    /// Select appropriate filter type based on resize ratio
    pub fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> FilterType {
        let width_ratio = orig_width as f32 / new_width.max(1) as f32;
        let height_ratio = orig_height as f32 / new_height.max(1) as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            FilterType::Triangle
        } else if max_ratio > 1.5 {
            FilterType::CatmullRom
        } else {
            FilterType::Lanczos3
        }
    }

    /// Resize so the largest dimension is at most `max`. Returns `None` when the image
    /// already fits and can be encoded as is.
    pub fn resize_to_fit(img: &DynamicImage, max: u32) -> Option<DynamicImage> {
        let (orig_width, orig_height) = img.dimensions();
        let (width, height) = Self::fit_within(orig_width, orig_height, max);
        if (width, height) == (orig_width, orig_height) {
            return None;
        }

        let filter = Self::select_filter(orig_width, orig_height, width, height);
        Some(img.resize_exact(width, height, filter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_landscape() {
        assert_eq!(ImageResize::fit_within(2000, 1000, 1000), (1000, 500));
        assert_eq!(ImageResize::fit_within(1200, 800, 200), (200, 133));
    }

    #[test]
    fn test_fit_portrait() {
        assert_eq!(ImageResize::fit_within(800, 1200, 500), (333, 500));
    }

    #[test]
    fn test_never_upscales() {
        assert_eq!(ImageResize::fit_within(150, 100, 1000), (150, 100));
        assert_eq!(ImageResize::fit_within(500, 500, 500), (500, 500));
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        assert_eq!(ImageResize::fit_within(10_000, 1, 200), (200, 1));
    }

    #[test]
    fn test_select_filter() {
        assert_eq!(ImageResize::select_filter(1000, 1000, 200, 200), FilterType::Triangle);
        assert_eq!(ImageResize::select_filter(1000, 1000, 600, 600), FilterType::CatmullRom);
        assert_eq!(ImageResize::select_filter(1000, 1000, 900, 900), FilterType::Lanczos3);
    }

    #[test]
    fn test_resize_to_fit() {
        let img = DynamicImage::new_rgb8(400, 200);
        assert!(ImageResize::resize_to_fit(&img, 500).is_none());
        let resized = ImageResize::resize_to_fit(&img, 200).unwrap();
        assert_eq!(resized.dimensions(), (200, 100));
    }
}
