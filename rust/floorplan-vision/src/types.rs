// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for floor plan feature extraction

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// An integer pixel coordinate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = (other.x - self.x) as f64;
        let dy = (other.y - self.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// True when the point lies inside a `width` x `height` raster
    pub fn within(&self, width: u32, height: u32) -> bool {
        self.x >= 0 && self.y >= 0 && (self.x as u32) < width && (self.y as u32) < height
    }
}

/// Straight line feature reported by the Hough transform
///
/// Endpoints carry no ordering; duplicate or overlapping segments for the
/// same physical wall are kept as detected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallSegment {
    pub start: Point,
    pub end: Point,
}

impl WallSegment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    pub fn x1(&self) -> i32 {
        self.start.x
    }

    pub fn y1(&self) -> i32 {
        self.start.y
    }

    pub fn x2(&self) -> i32 {
        self.end.x
    }

    pub fn y2(&self) -> i32 {
        self.end.y
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }
}

/// Simplified room boundary
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoomPolygon {
    /// Simplified boundary, traced in order; the last point closes back to
    /// the first
    pub points: Vec<Point>,
    /// Area enclosed by the raw contour, in square pixels
    pub area: f64,
    /// Length of the raw contour, in pixels
    pub perimeter: f64,
}

/// Everything extracted from one floor plan image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExtractionResult {
    pub image_width: u32,
    pub image_height: u32,
    pub walls: Vec<WallSegment>,
    pub rooms: Vec<RoomPolygon>,
}

impl ExtractionResult {
    /// A decodable image with nothing above the detection thresholds.
    /// Still a successful result.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.rooms.is_empty()
    }
}

/// Parameters for every stage of the extraction pipeline
///
/// Nothing is taken from library defaults: two runs with equal configs on
/// equal rasters produce equal results.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DetectionConfig {
    /// Gaussian blur kernel size (odd)
    pub blur_kernel_size: u32,
    /// Gaussian sigma; values <= 0 derive it from the kernel size
    pub blur_sigma: f32,
    /// Adaptive threshold neighborhood size (odd, >= 3)
    pub threshold_block_size: u32,
    /// Offset below the local mean a pixel must reach to be foreground
    pub threshold_c: f64,
    /// Canny hysteresis low threshold
    pub canny_low: f32,
    /// Canny hysteresis high threshold
    pub canny_high: f32,
    /// Hough distance resolution in pixels
    pub rho_resolution: f64,
    /// Hough angular resolution in radians
    pub theta_resolution: f64,
    /// Minimum accumulator votes for a line
    pub hough_threshold: u32,
    /// Minimum accepted segment extent in pixels
    pub min_line_length: f64,
    /// Largest run of missing edge pixels bridged inside one segment
    pub max_line_gap: f64,
    /// Upper bound on emitted segments; 0 means unbounded
    pub max_lines: usize,
    /// Seed for the Hough point visiting order
    pub hough_seed: u64,
    /// Contours enclosing this many square pixels or fewer are noise
    pub min_room_area: f64,
    /// Polygon tolerance as a fraction of the contour perimeter
    pub polygon_epsilon_ratio: f64,
    /// Run wall and room extraction on separate threads
    pub parallel: bool,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            blur_kernel_size: 5,
            blur_sigma: 0.0,
            threshold_block_size: 11,
            threshold_c: 2.0,
            canny_low: 50.0,
            canny_high: 150.0,
            rho_resolution: 1.0,
            theta_resolution: std::f64::consts::PI / 180.0,
            hough_threshold: 80,
            min_line_length: 50.0,
            max_line_gap: 10.0,
            max_lines: 0,
            hough_seed: 0x5EED_F100_4D1A,
            min_room_area: 500.0,
            polygon_epsilon_ratio: 0.02,
            parallel: true,
        }
    }
}

impl DetectionConfig {
    /// Reject parameter combinations no stage can run with
    pub fn validate(&self) -> Result<()> {
        if self.blur_kernel_size == 0 || self.blur_kernel_size % 2 == 0 {
            return Err(Error::InvalidConfig(format!(
                "blur kernel size must be odd and positive, got {}",
                self.blur_kernel_size
            )));
        }
        if !self.blur_sigma.is_finite() {
            return Err(Error::InvalidConfig("blur sigma must be finite".into()));
        }
        if self.threshold_block_size < 3 || self.threshold_block_size % 2 == 0 {
            return Err(Error::InvalidConfig(format!(
                "threshold block size must be odd and at least 3, got {}",
                self.threshold_block_size
            )));
        }
        if !self.threshold_c.is_finite() {
            return Err(Error::InvalidConfig("threshold C must be finite".into()));
        }
        if !(self.canny_low >= 0.0 && self.canny_low <= self.canny_high) {
            return Err(Error::InvalidConfig(format!(
                "canny thresholds must satisfy 0 <= low <= high, got {} / {}",
                self.canny_low, self.canny_high
            )));
        }
        if !(self.rho_resolution > 0.0 && self.rho_resolution.is_finite()) {
            return Err(Error::InvalidConfig("rho resolution must be positive".into()));
        }
        if !(self.theta_resolution > 0.0 && self.theta_resolution < std::f64::consts::PI) {
            return Err(Error::InvalidConfig(
                "theta resolution must be in (0, PI)".into(),
            ));
        }
        if self.hough_threshold == 0 {
            return Err(Error::InvalidConfig("hough threshold must be at least 1".into()));
        }
        for (name, value) in [
            ("min line length", self.min_line_length),
            ("max line gap", self.max_line_gap),
            ("min room area", self.min_room_area),
            ("polygon epsilon ratio", self.polygon_epsilon_ratio),
        ] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}
