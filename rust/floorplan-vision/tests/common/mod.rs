// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synthetic floor plan drawings shared by the integration tests.

#![allow(dead_code)]

use image::{GrayImage, Luma};

pub const INK: u8 = 0;
pub const PAPER: u8 = 255;

pub fn blank(width: u32, height: u32) -> GrayImage {
    GrayImage::from_pixel(width, height, Luma([PAPER]))
}

/// Fill the half-open box [x0, x1) x [y0, y1) with ink
pub fn fill(img: &mut GrayImage, x0: u32, y0: u32, x1: u32, y1: u32) {
    for y in y0..y1.min(img.height()) {
        for x in x0..x1.min(img.width()) {
            img.put_pixel(x, y, Luma([INK]));
        }
    }
}

/// Unfilled rectangle whose outer edge spans [x0, x0 + width) x [y0, y0 + height)
pub fn outline(img: &mut GrayImage, x0: u32, y0: u32, width: u32, height: u32, stroke: u32) {
    let x1 = x0 + width;
    let y1 = y0 + height;
    fill(img, x0, y0, x1, y0 + stroke);
    fill(img, x0, y1 - stroke, x1, y1);
    fill(img, x0, y0, x0 + stroke, y1);
    fill(img, x1 - stroke, y0, x1, y1);
}

/// 200x150 rectangle drawn with a 3px stroke on a 300x250 sheet
pub fn single_rectangle() -> GrayImage {
    let mut img = blank(300, 250);
    outline(&mut img, 50, 50, 200, 150, 3);
    img
}

/// Two rooms side by side, a partition with a door gap, and one diagonal wall
pub fn two_room_plan() -> GrayImage {
    let mut img = blank(420, 320);
    outline(&mut img, 30, 30, 360, 260, 6);
    fill(&mut img, 210, 30, 215, 150);
    fill(&mut img, 210, 200, 215, 290);

    // Diagonal stroke, 4px thick
    for t in 0..120u32 {
        for w in 0..4u32 {
            img.put_pixel(60 + t, 160 + t / 2 + w, Luma([INK]));
        }
    }
    img
}
