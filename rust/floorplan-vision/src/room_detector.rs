// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Room detection via contour finding

use crate::image_ops::BinaryImage;
use crate::polygon::{approx_polygon, arc_length, compress_chain, contour_area};
use crate::types::{DetectionConfig, Point, RoomPolygon};
use imageproc::contours::{find_contours, BorderType};

/// Detect rooms as outer foreground contours of the binary floor plan
///
/// Contours whose area does not exceed `config.min_room_area` are treated
/// as noise. Area and perimeter are measured on the traced contour before
/// simplification.
pub fn detect_rooms(binary: &BinaryImage, config: &DetectionConfig) -> Vec<RoomPolygon> {
    let contours = trace_outer_contours(binary);
    let traced = contours.len();

    let rooms: Vec<RoomPolygon> = contours
        .into_iter()
        .filter_map(|contour| {
            let area = contour_area(&contour);
            if area <= config.min_room_area {
                return None;
            }

            let perimeter = arc_length(&contour, true);
            let epsilon = config.polygon_epsilon_ratio * perimeter;
            let points = approx_polygon(&compress_chain(&contour), epsilon, true);
            if points.len() < 3 {
                return None;
            }

            Some(RoomPolygon {
                points,
                area,
                perimeter,
            })
        })
        .collect();

    tracing::debug!(
        contours = traced,
        rooms = rooms.len(),
        min_area = config.min_room_area,
        "room extraction finished"
    );

    rooms
}

/// Trace the outermost borders of foreground regions
///
/// Hole borders and anything nested inside a hole are skipped.
pub fn trace_outer_contours(binary: &BinaryImage) -> Vec<Vec<Point>> {
    find_contours::<i32>(binary.as_gray())
        .into_iter()
        .filter(|c| c.border_type == BorderType::Outer && c.parent.is_none())
        .map(|c| c.points.into_iter().map(|p| Point::new(p.x, p.y)).collect())
        .collect()
}
