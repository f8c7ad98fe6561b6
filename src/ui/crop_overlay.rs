// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Crop overlay drawn over the preview image.
//!
//! Translates egui pointer input into [`RegionSelector`] calls and paints
//! the translucent mask, the selection outline and the corner handles.

use crate::models::selection::{CursorHint, Handle, RegionSelector};
use crate::util::geometry::Point;

/// Mask color over the area outside the selection.
const MASK: egui::Color32 = egui::Color32::from_rgba_premultiplied(0, 0, 0, 100);

/// Handle interaction and paint the overlay inside `area`.
pub fn show(ui: &mut egui::Ui, area: egui::Rect, selector: &mut RegionSelector) {
    let response = ui.interact(area, ui.id().with("crop_overlay"), egui::Sense::click_and_drag());

    let (pointer, pressed, released) = ui.ctx().input(|i| {
        (
            i.pointer.hover_pos(),
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
        )
    });

    if let Some(pos) = pointer {
        let p = Point::from(pos);
        if pressed && response.hovered() {
            selector.pointer_pressed(p);
        }
        selector.pointer_moved(p);
    }
    if released {
        selector.pointer_released();
    }

    if response.hovered() || selector.is_dragging() {
        let icon = match selector.cursor() {
            CursorHint::Default => egui::CursorIcon::Default,
            CursorHint::Crosshair => egui::CursorIcon::Crosshair,
            CursorHint::ResizeNwSe => egui::CursorIcon::ResizeNwSe,
            CursorHint::ResizeNeSw => egui::CursorIcon::ResizeNeSw,
            CursorHint::Move => egui::CursorIcon::Move,
        };
        ui.ctx().set_cursor_icon(icon);
    }

    paint(&ui.painter_at(area), selector);
}

fn paint(painter: &egui::Painter, selector: &RegionSelector) {
    if !selector.is_started() || !selector.has_selection() {
        return;
    }

    let available: egui::Rect = selector.available_rect().into();
    let selected: egui::Rect = selector.selected_rect().into();

    let mask = [
        egui::Rect::from_min_max(available.min, egui::pos2(available.max.x, selected.min.y)),
        egui::Rect::from_min_max(egui::pos2(available.min.x, selected.max.y), available.max),
        egui::Rect::from_min_max(
            egui::pos2(available.min.x, selected.min.y),
            egui::pos2(selected.min.x, selected.max.y),
        ),
        egui::Rect::from_min_max(
            egui::pos2(selected.max.x, selected.min.y),
            egui::pos2(available.max.x, selected.max.y),
        ),
    ];
    for rect in mask {
        if rect.is_positive() {
            painter.rect_filled(rect, 0.0, MASK);
        }
    }

    painter.rect_stroke(selected, 0.0, egui::Stroke::new(1.0, egui::Color32::WHITE));

    let handles: Vec<Handle> = match selector.active_handle() {
        Some(handle) => vec![handle],
        None if selector.is_dragging() => Vec::new(),
        None => Handle::ALL.to_vec(),
    };

    for handle in handles {
        let rect: egui::Rect = selector.handle_rect(handle).into();
        let fill = if selector.hovered_handle() == Some(handle) {
            egui::Color32::from_white_alpha(160)
        } else {
            egui::Color32::from_white_alpha(90)
        };
        painter.rect_filled(rect, 0.0, fill);
        painter.rect_stroke(rect, 0.0, egui::Stroke::new(1.0, egui::Color32::BLACK));
    }
}
