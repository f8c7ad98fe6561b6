// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Error types for editing operations.

use crate::util::geometry::PixelRect;
use image::error::{ImageError, LimitErrorKind};

/// Errors raised while decoding, cropping or encoding frames.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("GIF codec error: {0}")]
    Codec(String),

    #[error("Not enough memory to process the image")]
    OutOfMemory,

    #[error("Crop rectangle {rect:?} does not fit a {width}x{height} frame")]
    Geometry {
        rect: PixelRect,
        width: u32,
        height: u32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ImageError> for EditorError {
    fn from(e: ImageError) -> Self {
        match e {
            ImageError::Limits(ref limit)
                if matches!(limit.kind(), LimitErrorKind::InsufficientMemory) =>
            {
                EditorError::OutOfMemory
            }
            ImageError::IoError(io) => EditorError::Io(io),
            other => EditorError::Codec(other.to_string()),
        }
    }
}

impl EditorError {
    /// Whether the error should be shown as a critical failure rather than
    /// a dismissible warning.
    pub fn is_critical(&self) -> bool {
        matches!(self, EditorError::OutOfMemory)
    }
}
