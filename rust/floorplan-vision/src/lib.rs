// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall and room extraction from raster floor plans
//!
//! This crate turns a scanned or rendered floor plan into a compact
//! geometric description:
//! 1. Preprocessing: Gaussian smoothing and local mean thresholding
//! 2. Walls: Canny edges and the probabilistic Hough transform
//! 3. Rooms: outer contours, area filtering and polygon simplification
//!
//! Wall and room extraction only read the shared binary raster and run
//! side by side when [`DetectionConfig::parallel`] is set.
//!
//! # Usage
//!
//! ```rust,ignore
//! use floorplan_vision::{extract_features, load_image, DetectionConfig, FeatureResponse};
//!
//! let grayscale = load_image("plan.png")?;
//! let result = extract_features(&grayscale, &DetectionConfig::default())?;
//! println!("{}", FeatureResponse::from(&result).to_json()?);
//! ```

pub mod error;
pub mod image_ops;
pub mod line_ops;
pub mod loader;
pub mod polygon;
pub mod response;
pub mod room_detector;
pub mod types;
pub mod wall_detector;

// Re-export commonly used types and functions
pub use error::{Error, Result};
pub use image_ops::{preprocess, BinaryImage};
pub use loader::{decode_image, load_image, rgba_to_grayscale};
pub use response::{ErrorResponse, FeatureResponse};
pub use room_detector::detect_rooms;
pub use types::{DetectionConfig, ExtractionResult, Point, RoomPolygon, WallSegment};
pub use wall_detector::detect_walls;

use image::GrayImage;
use std::time::Instant;

/// Run the full extraction pipeline on a grayscale floor plan
///
/// Fails only for a zero-area raster or an invalid configuration. An image
/// without detectable structure yields an empty but successful result.
///
/// # Arguments
///
/// * `grayscale` - Grayscale image of the floor plan
/// * `config` - Detection configuration parameters
pub fn extract_features(grayscale: &GrayImage, config: &DetectionConfig) -> Result<ExtractionResult> {
    config.validate()?;
    loader::ensure_non_empty(grayscale)?;

    let (width, height) = grayscale.dimensions();
    let span = tracing::info_span!("extract_features", width, height);
    let _guard = span.enter();

    let started = Instant::now();
    let binary = preprocess(grayscale, config);
    tracing::debug!(
        foreground = binary.foreground_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "preprocessing finished"
    );

    let started = Instant::now();
    let (walls, rooms) = if config.parallel {
        rayon::join(
            || detect_walls(&binary, config),
            || detect_rooms(&binary, config),
        )
    } else {
        (detect_walls(&binary, config), detect_rooms(&binary, config))
    };
    tracing::debug!(
        walls = walls.len(),
        rooms = rooms.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "feature extraction finished"
    );

    Ok(assemble(width, height, walls, rooms))
}

/// Process RGBA image data and extract features
///
/// # Arguments
///
/// * `rgba_data` - RGBA pixel data (4 bytes per pixel)
/// * `width` - Image width
/// * `height` - Image height
/// * `config` - Detection configuration
pub fn extract_features_from_rgba(
    rgba_data: &[u8],
    width: u32,
    height: u32,
    config: &DetectionConfig,
) -> Result<ExtractionResult> {
    let grayscale = rgba_to_grayscale(rgba_data, width, height)?;
    extract_features(&grayscale, config)
}

/// Decode an encoded image (PNG, JPEG) and extract features
pub fn extract_features_from_bytes(bytes: &[u8], config: &DetectionConfig) -> Result<ExtractionResult> {
    let grayscale = decode_image(bytes)?;
    extract_features(&grayscale, config)
}

/// Package the stage outputs into one result
pub fn assemble(
    image_width: u32,
    image_height: u32,
    walls: Vec<WallSegment>,
    rooms: Vec<RoomPolygon>,
) -> ExtractionResult {
    ExtractionResult {
        image_width,
        image_height,
        walls,
        rooms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn create_simple_floor_plan_image() -> GrayImage {
        let mut img = GrayImage::from_pixel(200, 200, Luma([255]));

        // Outer walls
        for x in 20..180 {
            for y in (20..25).chain(175..180) {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        for y in 20..180 {
            for x in (20..25).chain(175..180) {
                img.put_pixel(x, y, Luma([0]));
            }
        }
        // Interior wall
        for x in 100..105 {
            for y in 20..180 {
                img.put_pixel(x, y, Luma([0]));
            }
        }

        img
    }

    #[test]
    fn test_full_pipeline() {
        let img = create_simple_floor_plan_image();

        let result = extract_features(&img, &DetectionConfig::default()).unwrap();

        assert_eq!(result.image_width, 200);
        assert_eq!(result.image_height, 200);
        assert!(!result.walls.is_empty(), "Should detect walls");
        // The whole stroke network is one outer contour
        assert_eq!(result.rooms.len(), 1);
    }

    #[test]
    fn test_zero_area_image() {
        let img = GrayImage::new(0, 0);
        let err = extract_features(&img, &DetectionConfig::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidImage(_)));
    }

    #[test]
    fn test_invalid_config() {
        let img = create_simple_floor_plan_image();
        let config = DetectionConfig {
            threshold_block_size: 0,
            ..Default::default()
        };

        let err = extract_features(&img, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn test_rgba_entry_point() {
        let gray = create_simple_floor_plan_image();
        let rgba: Vec<u8> = gray
            .pixels()
            .flat_map(|p| [p.0[0], p.0[0], p.0[0], 255])
            .collect();

        let from_rgba =
            extract_features_from_rgba(&rgba, 200, 200, &DetectionConfig::default()).unwrap();
        let from_gray = extract_features(&gray, &DetectionConfig::default()).unwrap();

        assert_eq!(from_rgba, from_gray);
    }

    #[test]
    fn test_assemble() {
        let result = assemble(8, 6, Vec::new(), Vec::new());
        assert_eq!((result.image_width, result.image_height), (8, 6));
        assert!(result.is_empty());
    }
}
