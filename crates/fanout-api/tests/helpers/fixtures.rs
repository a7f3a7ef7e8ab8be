use std::io::Cursor;

use axum_test::multipart::{MultipartForm, Part};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Encode a gradient test image
pub fn create_test_image(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), format)
        .expect("Failed to encode test image");
    buf
}

pub fn jpeg_part(name: &str) -> Part {
    Part::bytes(create_test_image(320, 240, ImageFormat::Jpeg))
        .file_name(name)
        .mime_type("image/jpeg")
}

pub fn text_part(name: &str) -> Part {
    Part::bytes(b"just some notes".to_vec())
        .file_name(name)
        .mime_type("text/plain")
}

/// Form with `count` JPEG parts in the `files` field
pub fn jpeg_form(count: usize) -> MultipartForm {
    (0..count).fold(MultipartForm::new(), |form, i| {
        form.add_part("files", jpeg_part(&format!("photo-{}.jpg", i)))
    })
}
