// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Image processing operations for floor plan recognition
//!
//! The preprocessing chain is: fixed-size Gaussian smoothing, then local
//! mean thresholding with inverted polarity so that dark strokes become
//! foreground.

use crate::types::DetectionConfig;
use image::{GrayImage, Luma};

/// Two-valued raster: strokes are [`BinaryImage::FOREGROUND`], everything
/// else is [`BinaryImage::BACKGROUND`]
///
/// Produced once by [`preprocess`] and only read afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryImage(GrayImage);

impl BinaryImage {
    pub const FOREGROUND: u8 = 255;
    pub const BACKGROUND: u8 = 0;

    /// Build from an arbitrary mask; any non-zero sample is foreground
    pub fn from_mask(mask: &GrayImage) -> Self {
        let mut binary = GrayImage::new(mask.width(), mask.height());
        for (out, pixel) in binary.pixels_mut().zip(mask.pixels()) {
            *out = Luma([if pixel.0[0] > 0 {
                Self::FOREGROUND
            } else {
                Self::BACKGROUND
            }]);
        }
        Self(binary)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y).0[0] == Self::FOREGROUND
    }

    pub fn foreground_count(&self) -> usize {
        self.0
            .pixels()
            .filter(|p| p.0[0] == Self::FOREGROUND)
            .count()
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.0
    }
}

/// Normalized 1-D Gaussian kernel of `size` taps
///
/// A non-positive sigma is derived from the size the way common vision
/// libraries do: `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
pub fn gaussian_kernel(size: u32, sigma: f32) -> Vec<f32> {
    let size = size.max(1);
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
    };

    let radius = (size / 2) as i32;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / denom).exp())
        .collect();

    let sum: f32 = kernel.iter().sum();
    for weight in &mut kernel {
        *weight /= sum;
    }
    kernel
}

/// Gaussian blur with a fixed kernel size
///
/// Border pixels are replicated.
pub fn gaussian_blur(image: &GrayImage, kernel_size: u32, sigma: f32) -> GrayImage {
    let kernel = gaussian_kernel(kernel_size, sigma);
    imageproc::filter::separable_filter_equal(image, &kernel)
}

/// Local mean thresholding with inverted output
///
/// A pixel becomes foreground when it is more than `c` below the mean of
/// its `block_size` x `block_size` neighborhood. Uniform regions are
/// therefore always background.
pub fn adaptive_threshold(image: &GrayImage, block_size: u32, c: f64) -> BinaryImage {
    let radius = block_size / 2;
    let local_mean = imageproc::filter::box_filter(image, radius, radius);

    let mut binary = GrayImage::new(image.width(), image.height());
    for ((out, pixel), mean) in binary
        .pixels_mut()
        .zip(image.pixels())
        .zip(local_mean.pixels())
    {
        let foreground = (pixel.0[0] as f64) < mean.0[0] as f64 - c;
        *out = Luma([if foreground {
            BinaryImage::FOREGROUND
        } else {
            BinaryImage::BACKGROUND
        }]);
    }

    BinaryImage(binary)
}

/// Apply Canny edge detection
///
/// `imageproc` smooths with a Gaussian (sigma 1.4) before taking 3x3 Sobel
/// gradients, uses the L2 gradient magnitude, then applies hysteresis.
pub fn canny_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    imageproc::edges::canny(image, low_threshold, high_threshold)
}

/// Smooth and binarize a grayscale floor plan
///
/// The result is shared read-only by wall and room extraction.
pub fn preprocess(grayscale: &GrayImage, config: &DetectionConfig) -> BinaryImage {
    let blurred = gaussian_blur(grayscale, config.blur_kernel_size, config.blur_sigma);
    adaptive_threshold(
        &blurred,
        config.threshold_block_size,
        config.threshold_c,
    )
}
