// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for floor plan extraction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting floor plan features
///
/// Once a non-empty raster and a valid configuration are in hand, no stage
/// of the pipeline can fail. Every variant therefore originates either at
/// the loading boundary or in the configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True when the caller supplied unusable input, as opposed to a
    /// misconfigured pipeline.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::InvalidImage(_) | Error::Decode(_))
    }

    /// Stable machine-readable code for the error response body
    pub fn code(&self) -> &'static str {
        match self {
            Error::InvalidImage(_) => "INVALID_IMAGE",
            Error::Decode(_) => "DECODE_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
        }
    }
}
