// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with file, crop and playback actions.

/// What the toolbar needs to know to enable its buttons.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarState {
    pub has_frames: bool,
    pub cropping: bool,
    pub can_apply_crop: bool,
    pub playing: bool,
}

/// Button pressed on the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    Open,
    Save,
    StartCrop,
    ApplyCrop,
    CancelCrop,
    PlayStop,
}

/// Display the toolbar.
pub fn show(ui: &mut egui::Ui, state: ToolbarState) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("📂 Open").clicked() {
            action = ToolbarAction::Open;
        }
        if ui
            .add_enabled(state.has_frames, egui::Button::new("💾 Save"))
            .clicked()
        {
            action = ToolbarAction::Save;
        }

        ui.separator();

        if state.cropping {
            if ui
                .add_enabled(state.can_apply_crop, egui::Button::new("✔ Apply crop"))
                .clicked()
            {
                action = ToolbarAction::ApplyCrop;
            }
            if ui.button("✖ Cancel").clicked() {
                action = ToolbarAction::CancelCrop;
            }
        } else if ui
            .add_enabled(state.has_frames && !state.playing, egui::Button::new("⛶ Crop"))
            .clicked()
        {
            action = ToolbarAction::StartCrop;
        }

        ui.separator();

        let play_label = if state.playing { "⏹ Stop" } else { "▶ Play" };
        if ui
            .add_enabled(state.has_frames && !state.cropping, egui::Button::new(play_label))
            .clicked()
        {
            action = ToolbarAction::PlayStop;
        }

        ui.separator();

        let hint = if state.cropping {
            "Drag to select, drag corners to resize, Enter to apply, Escape to cancel"
        } else if state.has_frames {
            "Click a frame to show it, uncheck frames to drop them on save"
        } else {
            "Open a GIF to begin"
        };
        ui.label(egui::RichText::new(hint).italics().weak());
    });

    action
}
