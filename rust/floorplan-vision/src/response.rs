// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON response shapes handed to transports.

use crate::error::Error;
use crate::types::{ExtractionResult, RoomPolygon, WallSegment};
use serde::{Deserialize, Serialize};

/// Successful feature detection response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeatureResponse {
    pub success: bool,
    pub image_width: u32,
    pub image_height: u32,
    pub walls: Vec<WallJson>,
    pub rooms: Vec<RoomJson>,
}

/// Wall segment endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct WallJson {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

/// Polygon vertex.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PointJson {
    pub x: i32,
    pub y: i32,
}

/// Room polygon with integer metrics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomJson {
    pub area: i64,
    pub perimeter: i64,
    pub points: Vec<PointJson>,
}

impl From<&WallSegment> for WallJson {
    fn from(wall: &WallSegment) -> Self {
        Self {
            x1: wall.x1(),
            y1: wall.y1(),
            x2: wall.x2(),
            y2: wall.y2(),
        }
    }
}

impl From<&RoomPolygon> for RoomJson {
    fn from(room: &RoomPolygon) -> Self {
        Self {
            // Truncated, matching the integer metrics existing clients expect
            area: room.area as i64,
            perimeter: room.perimeter as i64,
            points: room
                .points
                .iter()
                .map(|p| PointJson { x: p.x, y: p.y })
                .collect(),
        }
    }
}

impl From<&ExtractionResult> for FeatureResponse {
    fn from(result: &ExtractionResult) -> Self {
        Self {
            success: true,
            image_width: result.image_width,
            image_height: result.image_height,
            walls: result.walls.iter().map(WallJson::from).collect(),
            rooms: result.rooms.iter().map(RoomJson::from).collect(),
        }
    }
}

impl FeatureResponse {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// Error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub code: String,
}

impl From<&Error> for ErrorResponse {
    fn from(err: &Error) -> Self {
        Self {
            success: false,
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}
