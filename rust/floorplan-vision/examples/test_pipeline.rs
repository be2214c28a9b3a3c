// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runs the extraction pipeline on a synthetic two-room floor plan
//!
//! Run with: cargo run -p floorplan-vision --example test_pipeline

use floorplan_vision::{extract_features, DetectionConfig, FeatureResponse};
use image::{GrayImage, Luma};

fn main() {
    println!("=== Floor Plan Feature Extraction Test ===\n");

    let image = create_synthetic_floor_plan();
    let config = DetectionConfig::default();

    let result = match extract_features(&image, &config) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Extraction failed: {}", e);
            std::process::exit(1);
        }
    };

    println!("Image size: {}x{}", result.image_width, result.image_height);
    println!("Walls detected: {}", result.walls.len());
    for (i, wall) in result.walls.iter().enumerate() {
        println!(
            "  Wall {:2}: ({:4},{:4}) -> ({:4},{:4})  length={:.1}px",
            i,
            wall.x1(),
            wall.y1(),
            wall.x2(),
            wall.y2(),
            wall.length()
        );
    }

    println!("Rooms detected: {}", result.rooms.len());
    for (i, room) in result.rooms.iter().enumerate() {
        println!(
            "  Room {:2}: {} vertices, area={:.0}px², perimeter={:.0}px",
            i,
            room.points.len(),
            room.area,
            room.perimeter
        );
    }

    match FeatureResponse::from(&result).to_json_pretty() {
        Ok(json) => println!("\n{}", json),
        Err(e) => eprintln!("Serialization failed: {}", e),
    }
}

/// Create a synthetic floor plan: outer walls, one partition with a door gap
fn create_synthetic_floor_plan() -> GrayImage {
    let mut img = GrayImage::from_pixel(400, 300, Luma([255]));

    let mut wall = |x0: u32, y0: u32, x1: u32, y1: u32| {
        for y in y0..y1 {
            for x in x0..x1 {
                img.put_pixel(x, y, Luma([0]));
            }
        }
    };

    // Outer walls (6px thick)
    wall(40, 40, 360, 46);
    wall(40, 254, 360, 260);
    wall(40, 40, 46, 260);
    wall(354, 40, 360, 260);

    // Partition with a door opening
    wall(200, 40, 204, 150);
    wall(200, 190, 204, 260);

    img
}
