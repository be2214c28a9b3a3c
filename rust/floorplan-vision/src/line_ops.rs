// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Line segment detection with the progressive probabilistic Hough transform
//!
//! Edge pixels are visited in a shuffled (but seeded) order. Each visited
//! pixel votes for every angle; as soon as one accumulator bin reaches the
//! threshold, the corresponding line is walked through the remaining edge
//! pixels in both directions. Pixels consumed by a walk are removed from
//! the edge mask, and when the walk yields an accepted segment their votes
//! are withdrawn again so one stroke does not keep producing peaks.

use crate::types::{DetectionConfig, Point, WallSegment};
use image::GrayImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::f64::consts::PI;

/// Fixed-point precision used while walking along a line
const WALK_SHIFT: u32 = 16;

/// Parameters of the probabilistic Hough transform
#[derive(Debug, Clone, PartialEq)]
pub struct HoughParams {
    /// Distance resolution in pixels
    pub rho_resolution: f64,
    /// Angular resolution in radians
    pub theta_resolution: f64,
    /// Minimum votes for a line
    pub threshold: u32,
    /// Minimum segment extent along x or y
    pub min_line_length: f64,
    /// Largest tolerated run of missing pixels
    pub max_line_gap: f64,
    /// 0 = unbounded
    pub max_lines: usize,
    pub seed: u64,
}

impl HoughParams {
    pub fn from_config(config: &DetectionConfig) -> Self {
        Self {
            rho_resolution: config.rho_resolution,
            theta_resolution: config.theta_resolution,
            threshold: config.hough_threshold,
            min_line_length: config.min_line_length,
            max_line_gap: config.max_line_gap,
            max_lines: config.max_lines,
            seed: config.hough_seed,
        }
    }
}

/// Precomputed Hough parameter space
struct Accumulator {
    cos_table: Vec<f64>,
    sin_table: Vec<f64>,
    num_rho: usize,
    rho_offset: i64,
    votes: Vec<i32>,
}

impl Accumulator {
    fn new(width: u32, height: u32, rho_resolution: f64, theta_resolution: f64) -> Self {
        let inv_rho = 1.0 / rho_resolution;
        let num_angles = ((PI / theta_resolution).round() as usize).max(1);

        let mut cos_table = Vec::with_capacity(num_angles);
        let mut sin_table = Vec::with_capacity(num_angles);
        for n in 0..num_angles {
            let theta = n as f64 * theta_resolution;
            cos_table.push(theta.cos() * inv_rho);
            sin_table.push(theta.sin() * inv_rho);
        }

        let num_rho =
            ((((width as f64 + height as f64) * 2.0 + 1.0) / rho_resolution).round() as usize).max(1);

        Self {
            cos_table,
            sin_table,
            num_rho,
            rho_offset: ((num_rho - 1) / 2) as i64,
            votes: vec![0; num_angles * num_rho],
        }
    }

    fn num_angles(&self) -> usize {
        self.cos_table.len()
    }

    fn bin(&self, angle_idx: usize, x: i64, y: i64) -> Option<usize> {
        let rho = (x as f64 * self.cos_table[angle_idx] + y as f64 * self.sin_table[angle_idx])
            .round() as i64
            + self.rho_offset;
        if rho < 0 || rho as usize >= self.num_rho {
            return None;
        }
        Some(angle_idx * self.num_rho + rho as usize)
    }

    /// Add one point's votes, returning the strongest bin it touched
    fn vote(&mut self, x: i64, y: i64) -> (usize, i32) {
        let mut best_angle = 0;
        let mut best_votes = 0;
        for n in 0..self.num_angles() {
            if let Some(bin) = self.bin(n, x, y) {
                self.votes[bin] += 1;
                if self.votes[bin] > best_votes {
                    best_votes = self.votes[bin];
                    best_angle = n;
                }
            }
        }
        (best_angle, best_votes)
    }

    fn unvote(&mut self, x: i64, y: i64) {
        for n in 0..self.num_angles() {
            if let Some(bin) = self.bin(n, x, y) {
                self.votes[bin] -= 1;
            }
        }
    }
}

/// Fixed-point walk along a line direction, one pixel per step on the
/// dominant axis
#[derive(Clone, Copy)]
struct LineWalk {
    x: i64,
    y: i64,
    dx: i64,
    dy: i64,
    x_major: bool,
}

impl LineWalk {
    fn new(px: i64, py: i64, dir_x: f64, dir_y: f64) -> Self {
        let one = (1i64 << WALK_SHIFT) as f64;
        let half = 1i64 << (WALK_SHIFT - 1);
        if dir_x.abs() > dir_y.abs() {
            Self {
                x: px,
                y: (py << WALK_SHIFT) + half,
                dx: if dir_x > 0.0 { 1 } else { -1 },
                dy: (dir_y * one / dir_x.abs()).round() as i64,
                x_major: true,
            }
        } else {
            Self {
                x: (px << WALK_SHIFT) + half,
                y: py,
                dx: (dir_x * one / dir_y.abs()).round() as i64,
                dy: if dir_y > 0.0 { 1 } else { -1 },
                x_major: false,
            }
        }
    }

    fn reversed(self) -> Self {
        Self {
            dx: -self.dx,
            dy: -self.dy,
            ..self
        }
    }

    fn pixel(&self) -> (i64, i64) {
        if self.x_major {
            (self.x, self.y >> WALK_SHIFT)
        } else {
            (self.x >> WALK_SHIFT, self.y)
        }
    }

    fn step(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
    }
}

/// Detect line segments in an edge image
///
/// Any non-zero pixel of `edges` is an edge. Returned endpoints are edge
/// pixels, so they always lie inside the image.
pub fn detect_segments(edges: &GrayImage, params: &HoughParams) -> Vec<WallSegment> {
    let (width, height) = edges.dimensions();
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let w = width as i64;
    let h = height as i64;

    let mut mask = vec![false; width as usize * height as usize];
    let mut points: Vec<(i64, i64)> = Vec::new();
    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel.0[0] > 0 {
            mask[(y * width + x) as usize] = true;
            points.push((x as i64, y as i64));
        }
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    points.shuffle(&mut rng);

    let mut accumulator =
        Accumulator::new(width, height, params.rho_resolution, params.theta_resolution);
    let threshold = params.threshold.min(i32::MAX as u32) as i32;
    let index = |x: i64, y: i64| (y * w + x) as usize;

    let mut segments = Vec::new();

    for &(x, y) in &points {
        // Consumed by an earlier walk
        if !mask[index(x, y)] {
            continue;
        }

        let (angle_idx, votes) = accumulator.vote(x, y);
        if votes < threshold {
            continue;
        }

        // Direction along the line, perpendicular to its normal
        let dir_x = -accumulator.sin_table[angle_idx];
        let dir_y = accumulator.cos_table[angle_idx];
        let origin = LineWalk::new(x, y, dir_x, dir_y);

        let mut line_end = [(x, y); 2];
        for (k, end) in line_end.iter_mut().enumerate() {
            let mut walk = if k == 0 { origin } else { origin.reversed() };
            let mut gap = 0usize;
            loop {
                let (px, py) = walk.pixel();
                if px < 0 || px >= w || py < 0 || py >= h {
                    break;
                }
                if mask[index(px, py)] {
                    gap = 0;
                    *end = (px, py);
                } else {
                    gap += 1;
                    if gap as f64 > params.max_line_gap {
                        break;
                    }
                }
                walk.step();
            }
        }

        let extent_x = (line_end[1].0 - line_end[0].0).abs() as f64;
        let extent_y = (line_end[1].1 - line_end[0].1).abs() as f64;
        let good_line = extent_x >= params.min_line_length || extent_y >= params.min_line_length;

        // Consume the walked pixels; withdraw their votes only for kept lines
        for (k, end) in line_end.iter().enumerate() {
            let mut walk = if k == 0 { origin } else { origin.reversed() };
            loop {
                let (px, py) = walk.pixel();
                if px < 0 || px >= w || py < 0 || py >= h {
                    break;
                }
                let idx = index(px, py);
                if mask[idx] {
                    if good_line {
                        accumulator.unvote(px, py);
                    }
                    mask[idx] = false;
                }
                if (px, py) == *end {
                    break;
                }
                walk.step();
            }
        }

        if good_line {
            segments.push(WallSegment::new(
                Point::new(line_end[0].0 as i32, line_end[0].1 as i32),
                Point::new(line_end[1].0 as i32, line_end[1].1 as i32),
            ));
            if params.max_lines > 0 && segments.len() >= params.max_lines {
                break;
            }
        }
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn params() -> HoughParams {
        HoughParams {
            rho_resolution: 1.0,
            theta_resolution: PI / 180.0,
            threshold: 30,
            min_line_length: 50.0,
            max_line_gap: 10.0,
            max_lines: 0,
            seed: 7,
        }
    }

    fn horizontal_edges(width: u32, height: u32, y: u32, xs: impl Iterator<Item = u32>) -> GrayImage {
        let mut img = GrayImage::new(width, height);
        for x in xs {
            img.put_pixel(x, y, Luma([255]));
        }
        img
    }

    fn x_range(segment: &WallSegment) -> (i32, i32) {
        (
            segment.x1().min(segment.x2()),
            segment.x1().max(segment.x2()),
        )
    }

    #[test]
    fn test_no_edges_no_segments() {
        let edges = GrayImage::new(64, 64);
        assert!(detect_segments(&edges, &params()).is_empty());
    }

    #[test]
    fn test_single_horizontal_line() {
        let edges = horizontal_edges(150, 50, 20, 10..110);

        let segments = detect_segments(&edges, &params());

        assert_eq!(segments.len(), 1);
        let segment = segments[0];
        assert_eq!(segment.y1(), 20);
        assert_eq!(segment.y2(), 20);
        assert_eq!(x_range(&segment), (10, 109));
    }

    #[test]
    fn test_vertical_line() {
        let mut edges = GrayImage::new(60, 160);
        for y in 20..140 {
            edges.put_pixel(33, y, Luma([255]));
        }

        let segments = detect_segments(&edges, &params());

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].x1(), 33);
        assert_eq!(segments[0].x2(), 33);
    }

    #[test]
    fn test_short_line_rejected() {
        let edges = horizontal_edges(150, 50, 20, 10..45);
        assert!(detect_segments(&edges, &params()).is_empty());
    }

    #[test]
    fn test_small_gap_bridged() {
        let edges = horizontal_edges(150, 50, 20, (10..60).chain(66..120));

        let segments = detect_segments(&edges, &params());

        assert_eq!(segments.len(), 1);
        assert_eq!(x_range(&segments[0]), (10, 119));
    }

    #[test]
    fn test_large_gap_splits() {
        let edges = horizontal_edges(260, 50, 20, (10..90).chain(140..220));

        let mut segments = detect_segments(&edges, &params());
        segments.sort_by_key(|s| x_range(s).0);

        assert_eq!(segments.len(), 2);
        assert_eq!(x_range(&segments[0]), (10, 89));
        assert_eq!(x_range(&segments[1]), (140, 219));
    }

    #[test]
    fn test_seeded_order_is_deterministic() {
        let mut edges = horizontal_edges(200, 200, 50, 20..180);
        for y in 20..180 {
            edges.put_pixel(120, y, Luma([255]));
        }

        let first = detect_segments(&edges, &params());
        let second = detect_segments(&edges, &params());

        assert_eq!(first, second);
    }

    #[test]
    fn test_max_lines_caps_output() {
        let mut edges = horizontal_edges(200, 200, 50, 20..180);
        for x in 20..180 {
            edges.put_pixel(x, 150, Luma([255]));
        }
        let capped = HoughParams {
            max_lines: 1,
            ..params()
        };

        assert_eq!(detect_segments(&edges, &capped).len(), 1);
    }
}
