// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Preview and filmstrip coordination.
//!
//! [`View`] owns the [`Tape`], remembers which frame the large preview
//! shows and where the preview image sits on screen, and holds the
//! [`RegionSelector`] while crop mode is active.

use crate::models::frame_store::FrameStore;
use crate::models::selection::RegionSelector;
use crate::models::tape::{Tape, TapeEvent, TAPE_SPACING};
use crate::util::geometry::{to_pixel_rect, PixelRect, Rect};

/// Check-state change forwarded to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckChange {
    pub counter: usize,
    pub checked: bool,
}

#[derive(Debug, Default)]
pub struct View {
    tape: Tape,
    /// Frame index shown in the preview.
    preview_frame: Option<usize>,
    /// Where the preview image is drawn, in screen coordinates.
    preview_rect: Rect,
    crop: Option<RegionSelector>,
    tape_height: f32,
    tape_height_locked: bool,
}

impl View {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn tape_mut(&mut self) -> &mut Tape {
        &mut self.tape
    }

    pub fn preview_frame(&self) -> Option<usize> {
        self.preview_frame
    }

    pub fn preview_rect(&self) -> Rect {
        self.preview_rect
    }

    /// Fix the filmstrip height. Only the first call has an effect.
    pub fn lock_tape_height(&mut self, height: f32) {
        if !self.tape_height_locked {
            self.tape_height = height;
            self.tape_height_locked = true;
            log::debug!("Tape height locked at {}", height);
        }
    }

    pub fn tape_height(&self) -> f32 {
        self.tape_height
    }

    /// Fill the tape from a freshly loaded store and show the first frame.
    pub fn show_store(&mut self, store: &FrameStore) {
        self.stop_crop();
        self.tape.initialize(store);
        self.tape.set_current(1);
        self.process_events();
    }

    /// Record where the preview image is drawn. A change is forwarded to
    /// the crop selector so the selection follows the image.
    pub fn set_preview_rect(&mut self, rect: Rect) {
        if rect == self.preview_rect {
            return;
        }
        self.preview_rect = rect;
        if let Some(selector) = self.crop.as_mut() {
            selector.set_available_rect(rect);
        }
    }

    pub fn is_cropping(&self) -> bool {
        self.crop.is_some()
    }

    /// Enter crop mode over the preview image. Returns whether crop mode is
    /// active afterwards.
    pub fn start_crop(&mut self) -> bool {
        if self.crop.is_none() && !self.preview_rect.is_empty() {
            self.crop = Some(RegionSelector::new(self.preview_rect));
            log::info!("Crop mode started");
        }
        self.crop.is_some()
    }

    pub fn stop_crop(&mut self) {
        if let Some(mut selector) = self.crop.take() {
            selector.stop();
            log::info!("Crop mode stopped");
        }
    }

    pub fn crop_selector_mut(&mut self) -> Option<&mut RegionSelector> {
        self.crop.as_mut()
    }

    /// Current selection in screen coordinates, empty outside crop mode.
    pub fn crop_rect(&self) -> Rect {
        self.crop
            .as_ref()
            .map(RegionSelector::selected_rect)
            .unwrap_or(Rect::EMPTY)
    }

    /// The selection mapped to image pixels, if committing it would change
    /// the frames. A selection covering the whole image is not a change.
    pub fn pending_crop(&self, store: &FrameStore) -> Option<PixelRect> {
        let (width, height) = store.dimensions()?;
        let selection = self.crop_rect();
        if selection.is_empty() {
            return None;
        }

        let rect = to_pixel_rect(&selection, &self.preview_rect, width, height);
        if rect.is_empty() || rect == store.bounds() {
            return None;
        }
        Some(rect)
    }

    /// Point the preview at the frame of slot `counter`, or at nothing.
    pub fn on_tape_selection_changed(&mut self, counter: usize) {
        self.preview_frame = self
            .tape
            .slot(counter)
            .map(|_| counter - 1);
    }

    /// Apply pending tape notifications to the preview and return the
    /// check-state changes the host cares about.
    pub fn process_events(&mut self) -> Vec<CheckChange> {
        let mut changes = Vec::new();
        for event in self.tape.take_events() {
            match event {
                TapeEvent::CurrentChanged(counter) => self.on_tape_selection_changed(counter),
                TapeEvent::CheckStateChanged { counter, checked } => {
                    changes.push(CheckChange { counter, checked })
                }
            }
        }
        changes
    }

    /// Horizontal scroll offset that brings slot `counter` fully into view,
    /// given the current offset and the viewport width. Returns the current
    /// offset when the slot is already visible.
    pub fn scroll_to_visible(
        &self,
        counter: usize,
        slot_width: f32,
        viewport_width: f32,
        current_offset: f32,
    ) -> f32 {
        let Some(x) = self.tape.x_of_slot(counter, slot_width) else {
            return current_offset;
        };

        let slot_end = x + slot_width + TAPE_SPACING;
        if x < current_offset {
            (x - TAPE_SPACING).max(0.0)
        } else if slot_end > current_offset + viewport_width {
            (slot_end - viewport_width).max(0.0)
        } else {
            current_offset
        }
    }
}
