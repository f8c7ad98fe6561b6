// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Large preview of the current frame.
//!
//! The frame is fitted into the available space, keeping its aspect ratio.
//! In crop mode the crop overlay is drawn on top and receives the pointer.

use crate::models::frame_store::FrameStore;
use crate::ui::{crop_overlay, textures::FrameTextures};
use crate::util::geometry::{fit_rect, Rect};
use crate::view::View;

/// Display the preview area.
pub fn show(ui: &mut egui::Ui, view: &mut View, store: &FrameStore, textures: &FrameTextures) {
    // Set background color
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);

    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let Some((width, height)) = store.dimensions() else {
            view.set_preview_rect(Rect::EMPTY);
            show_welcome(ui);
            return;
        };

        let area = ui.max_rect();
        let image_rect = fit_rect(width, height, &Rect::from(area));
        view.set_preview_rect(image_rect);

        if let Some(texture) = view.preview_frame().and_then(|i| textures.get(i)) {
            ui.painter().image(
                texture.id(),
                image_rect.into(),
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }

        if let Some(selector) = view.crop_selector_mut() {
            crop_overlay::show(ui, area, selector);
        }
    });
}

/// Welcome message shown when no file is loaded.
fn show_welcome(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("GIF Editor")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.add_space(20.0);
            ui.label(
                egui::RichText::new("Open a GIF to crop it or drop frames")
                    .color(egui::Color32::from_gray(180)),
            );
            ui.add_space(10.0);
            ui.label(
                egui::RichText::new("File → Open... (Ctrl+O)")
                    .weak()
                    .color(egui::Color32::from_gray(130)),
            );
        });
    });
}
