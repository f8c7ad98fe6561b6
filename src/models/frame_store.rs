// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Decoded animation frames.
//!
//! The store is the single owner of every frame's pixel data. Everything
//! else (tape slots, the preview, textures) refers to frames by their
//! 0-based index, which is always contiguous.

use crate::error::EditorError;
use crate::util::geometry::PixelRect;
use image::RgbaImage;
use std::collections::BTreeSet;

/// One decoded animation frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Full-canvas RGBA pixels.
    pub image: RgbaImage,
    /// Time to show this frame before the next one, in milliseconds.
    pub delay_ms: u32,
}

impl Frame {
    pub fn new(image: RgbaImage, delay_ms: u32) -> Self {
        Self { image, delay_ms }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Ordered collection of frames.
#[derive(Debug, Default)]
pub struct FrameStore {
    frames: Vec<Frame>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all frames.
    pub fn load(&mut self, frames: Vec<Frame>) {
        self.frames = frames;
        log::info!("Frame store loaded with {} frames", self.frames.len());
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Dimensions of the first frame (all frames share them).
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.frames.first().map(|f| (f.width(), f.height()))
    }

    /// Full image rectangle in pixels.
    pub fn bounds(&self) -> PixelRect {
        self.dimensions()
            .map(|(w, h)| PixelRect::new(0, 0, w, h))
            .unwrap_or_default()
    }

    /// Crop every frame to `rect`.
    ///
    /// The rectangle is validated against every frame before anything is
    /// modified, so on error the store is unchanged.
    pub fn crop_all(&mut self, rect: PixelRect) -> Result<(), EditorError> {
        if rect.is_empty() {
            let (width, height) = self.dimensions().unwrap_or((0, 0));
            return Err(EditorError::Geometry {
                rect,
                width,
                height,
            });
        }

        for frame in &self.frames {
            if !rect.fits_within(frame.width(), frame.height()) {
                return Err(EditorError::Geometry {
                    rect,
                    width: frame.width(),
                    height: frame.height(),
                });
            }
        }

        for frame in &mut self.frames {
            // crop_imm yields a fresh buffer whose origin is (0, 0).
            frame.image =
                image::imageops::crop_imm(&frame.image, rect.x, rect.y, rect.width, rect.height)
                    .to_image();
        }

        log::info!(
            "Cropped {} frames to {}x{} at ({}, {})",
            self.frames.len(),
            rect.width,
            rect.height,
            rect.x,
            rect.y
        );

        Ok(())
    }

    /// Keep only the frames at the given indices, compacting the rest.
    pub fn retain(&mut self, indices: &BTreeSet<usize>) {
        let len = self.frames.len();
        if let Some(&bad) = indices.iter().find(|&&i| i >= len) {
            debug_assert!(bad < len, "frame index {} out of range 0..{}", bad, len);
            log::warn!("Ignoring out of range frame index {} (count {})", bad, len);
        }

        let mut index = 0;
        self.frames.retain(|_| {
            let keep = indices.contains(&index);
            index += 1;
            keep
        });

        log::info!("Retained {} of {} frames", self.frames.len(), len);
    }
}
