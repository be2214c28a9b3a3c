// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of floor plan images into grayscale rasters

use crate::error::{Error, Result};
use image::{GrayImage, ImageReader, Luma};
use std::io::Cursor;
use std::path::Path;

/// Decode an encoded image (PNG, JPEG) held in memory
///
/// Color images are reduced to 8-bit luma.
pub fn decode_image(bytes: &[u8]) -> Result<GrayImage> {
    let decoded = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .decode()?;
    let grayscale = decoded.to_luma8();
    ensure_non_empty(&grayscale)?;
    Ok(grayscale)
}

/// Read and decode an image file
pub fn load_image(path: impl AsRef<Path>) -> Result<GrayImage> {
    let bytes = std::fs::read(path.as_ref())?;
    decode_image(&bytes)
}

/// Convert RGBA bytes to a grayscale image
pub fn rgba_to_grayscale(rgba: &[u8], width: u32, height: u32) -> Result<GrayImage> {
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(Error::InvalidImage(format!(
            "RGBA buffer holds {} bytes, {}x{} needs {}",
            rgba.len(),
            width,
            height,
            expected
        )));
    }

    let mut gray = GrayImage::new(width, height);
    for (pixel, rgba) in gray.pixels_mut().zip(rgba.chunks_exact(4)) {
        let r = rgba[0] as f32;
        let g = rgba[1] as f32;
        let b = rgba[2] as f32;
        // Standard luminance formula (ITU-R BT.601)
        let luma = (0.299 * r + 0.587 * g + 0.114 * b).round().min(255.0) as u8;
        *pixel = Luma([luma]);
    }

    ensure_non_empty(&gray)?;
    Ok(gray)
}

/// Zero-area rasters cannot enter the pipeline
pub fn ensure_non_empty(image: &GrayImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::InvalidImage(format!(
            "image has zero area ({}x{})",
            image.width(),
            image.height()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};

    #[test]
    fn test_rgba_to_grayscale() {
        let rgba = vec![
            255, 255, 255, 255, // White
            0, 0, 0, 255,       // Black
            255, 0, 0, 255,     // Red
            0, 255, 0, 255,     // Green
        ];

        let gray = rgba_to_grayscale(&rgba, 2, 2).unwrap();

        assert_eq!(gray.width(), 2);
        assert_eq!(gray.height(), 2);
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 0);
        assert_eq!(gray.get_pixel(0, 1).0[0], 76);
        assert_eq!(gray.get_pixel(1, 1).0[0], 150);
    }

    #[test]
    fn test_rgba_length_mismatch() {
        let result = rgba_to_grayscale(&[0, 0, 0], 1, 1);
        assert!(matches!(result, Err(Error::InvalidImage(_))));
    }

    #[test]
    fn test_zero_area_rejected() {
        let result = rgba_to_grayscale(&[], 0, 10);
        assert!(matches!(result, Err(Error::InvalidImage(_))));
    }

    #[test]
    fn test_decode_png() {
        let mut rgb = RgbImage::new(4, 3);
        rgb.put_pixel(1, 1, Rgb([255, 255, 255]));
        let mut bytes = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let gray = decode_image(&bytes).unwrap();

        assert_eq!(gray.dimensions(), (4, 3));
        assert_eq!(gray.get_pixel(1, 1).0[0], 255);
        assert_eq!(gray.get_pixel(0, 0).0[0], 0);
    }

    #[test]
    fn test_decode_garbage() {
        let err = decode_image(b"definitely not an image").unwrap_err();
        assert!(err.is_client_error());
    }
}
