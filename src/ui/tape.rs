// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Filmstrip of frame thumbnails.
//!
//! Every slot shows its frame scaled to the strip height, a checkbox that
//! decides whether the frame is kept on save, and its "#N" counter.
//! Clicking a thumbnail makes the slot current; the context menu checks or
//! unchecks everything from that slot to the end.

use crate::models::tape::TAPE_SPACING;
use crate::ui::textures::FrameTextures;
use crate::view::View;

/// Inner margin of a slot frame.
pub const SLOT_MARGIN: f32 = 2.0;

/// Height reserved under a thumbnail for the checkbox row.
pub const CONTROLS_HEIGHT: f32 = 28.0;

/// Scroll state of the strip after it was drawn.
#[derive(Debug, Clone, Copy, Default)]
pub struct TapeViewport {
    pub offset: f32,
    pub width: f32,
}

/// Interaction with a single slot.
enum SlotAction {
    None,
    Select(usize),
    SetChecked(usize, bool),
    CheckTillEnd(usize, bool),
}

/// Total width of a slot showing a thumbnail of `thumb_width`.
pub fn slot_width(thumb_width: f32) -> f32 {
    thumb_width + 2.0 * SLOT_MARGIN
}

/// Thumbnail height for a strip of the given height.
pub fn thumb_height(tape_height: f32) -> f32 {
    (tape_height - CONTROLS_HEIGHT - 2.0 * (SLOT_MARGIN + TAPE_SPACING)).max(16.0)
}

/// Display the filmstrip. `scroll_to` forces the horizontal offset.
pub fn show(
    ui: &mut egui::Ui,
    view: &mut View,
    textures: &FrameTextures,
    thumb_size: egui::Vec2,
    scroll_to: Option<f32>,
) -> TapeViewport {
    let slots: Vec<(usize, String, bool, bool, usize)> = view
        .tape()
        .slots()
        .iter()
        .enumerate()
        .map(|(i, s)| (i + 1, s.label(), s.is_checked(), s.is_current(), s.frame_index()))
        .collect();

    let mut action = SlotAction::None;

    let mut area = egui::ScrollArea::horizontal()
        .id_source("tape")
        .auto_shrink([false, false]);
    if let Some(offset) = scroll_to {
        area = area.horizontal_scroll_offset(offset);
    }

    let output = area.show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = TAPE_SPACING;
            ui.add_space(TAPE_SPACING);

            for (position, label, checked, current, frame_index) in slots {
                let stroke = if current {
                    egui::Stroke::new(2.0, ui.visuals().selection.stroke.color)
                } else {
                    egui::Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
                };

                egui::Frame::none()
                    .stroke(stroke)
                    .inner_margin(SLOT_MARGIN)
                    .show(ui, |ui| {
                        ui.vertical(|ui| {
                            let response = match textures.get(frame_index) {
                                Some(texture) => ui.add(
                                    egui::Image::new((texture.id(), thumb_size))
                                        .sense(egui::Sense::click()),
                                ),
                                None => ui.allocate_response(thumb_size, egui::Sense::click()),
                            };

                            if response.clicked() {
                                action = SlotAction::Select(position);
                            }

                            response.context_menu(|ui| {
                                if ui.button("Check till end").clicked() {
                                    action = SlotAction::CheckTillEnd(position, true);
                                    ui.close_menu();
                                }
                                if ui.button("Uncheck till end").clicked() {
                                    action = SlotAction::CheckTillEnd(position, false);
                                    ui.close_menu();
                                }
                            });

                            ui.horizontal(|ui| {
                                let mut on = checked;
                                if ui.checkbox(&mut on, "").changed() {
                                    action = SlotAction::SetChecked(position, on);
                                }
                                ui.label(label);
                            });
                        });
                    });
            }

            ui.add_space(TAPE_SPACING);
        });
    });

    let tape = view.tape_mut();
    match action {
        SlotAction::Select(position) => tape.set_current(position),
        SlotAction::SetChecked(position, on) => tape.set_checked(position, on),
        SlotAction::CheckTillEnd(position, on) => tape.check_till_end(position, on),
        SlotAction::None => {}
    }

    TapeViewport {
        offset: output.state.offset.x,
        width: output.inner_rect.width(),
    }
}
