// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall detection pipeline for floor plan recognition

use crate::image_ops::{canny_edges, BinaryImage};
use crate::line_ops::{detect_segments, HoughParams};
use crate::types::{DetectionConfig, WallSegment};

/// Extract wall candidate segments from the binary floor plan
///
/// Stroke boundaries are isolated with Canny, then straight runs are
/// collected with the probabilistic Hough transform. Segments are reported
/// as detected: a thick stroke usually yields one segment per side, and
/// nearly collinear duplicates are not merged.
pub fn detect_walls(binary: &BinaryImage, config: &DetectionConfig) -> Vec<WallSegment> {
    let edges = canny_edges(binary.as_gray(), config.canny_low, config.canny_high);
    let edge_pixels = edges.pixels().filter(|p| p.0[0] > 0).count();

    let walls = detect_segments(&edges, &HoughParams::from_config(config));

    tracing::debug!(
        edge_pixels,
        walls = walls.len(),
        threshold = config.hough_threshold,
        "wall extraction finished"
    );

    walls
}
