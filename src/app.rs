// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module contains the main application structure that implements
//! the egui::App trait. It owns the frame store, the view (preview, tape
//! and crop selector) and the background worker, and runs the structural
//! operations: open, crop commit and save.

use crate::config::Settings;
use crate::error::EditorError;
use crate::io::gif::{self, EncodeOptions};
use crate::models::frame_store::{Frame, FrameStore};
use crate::models::playback::{effective_delay, next_counter, Playback};
use crate::ui::tape::{slot_width, thumb_height, TapeViewport};
use crate::ui::{preview, tape, textures::FrameTextures, toolbar};
use crate::util::geometry::{width_for_height, PixelRect};
use crate::view::View;
use crate::worker::{TaskStatus, Worker};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;

/// Result of a background task.
enum TaskResult {
    Opened {
        path: PathBuf,
        result: Result<Vec<Frame>, EditorError>,
    },
    Cropped {
        store: FrameStore,
        result: Result<(), EditorError>,
    },
    Saved {
        store: FrameStore,
        kept: BTreeSet<usize>,
        path: PathBuf,
        result: Result<(), EditorError>,
    },
}

/// A failed operation to report to the user.
type Failure = (&'static str, EditorError);

/// What to do once a save started from a prompt succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AfterSave {
    Nothing,
    Open,
    Close,
}

/// The open file and whether it has unsaved edits.
#[derive(Debug, Default)]
struct Document {
    path: Option<PathBuf>,
    modified: bool,
}

impl Document {
    fn title(&self) -> String {
        let name = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string());
        match (name, self.modified) {
            (Some(name), true) => format!("GIF Editor - {}*", name),
            (Some(name), false) => format!("GIF Editor - {}", name),
            (None, _) => "GIF Editor".to_string(),
        }
    }
}

/// Main application state.
pub struct GifEditorApp {
    settings: Settings,

    /// Decoded frames. Moved into the worker while a crop or save runs.
    store: FrameStore,

    /// Preview, tape and crop selector
    view: View,

    /// Textures shared by the preview and the tape
    textures: FrameTextures,

    document: Document,

    playback: Playback,

    /// Background decode/crop/encode
    worker: Worker<TaskResult>,

    after_save: AfterSave,

    /// Forced tape scroll offset for the next frame
    tape_scroll: Option<f32>,

    /// Tape scroll state from the last frame
    tape_viewport: TapeViewport,

    /// Last title sent to the window
    title: String,
}

impl Default for GifEditorApp {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl GifEditorApp {
    /// Create a new editor instance.
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            store: FrameStore::new(),
            view: View::new(),
            textures: FrameTextures::new(),
            document: Document::default(),
            playback: Playback::new(),
            worker: Worker::new(),
            after_save: AfterSave::Nothing,
            tape_scroll: None,
            tape_viewport: TapeViewport::default(),
            title: String::new(),
        }
    }

    fn is_busy(&self) -> bool {
        self.worker.is_busy()
    }

    fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            speed: self.settings.encoder_speed,
            loop_forever: self.settings.loop_forever,
        }
    }

    /// Thumbnail size on the tape for the current frames.
    fn thumb_size(&self) -> egui::Vec2 {
        let height = thumb_height(self.view.tape_height());
        let width = self
            .store
            .dimensions()
            .map(|(w, h)| width_for_height(w, h, height))
            .unwrap_or(height);
        egui::vec2(width, height)
    }

    /// Show an error to the user.
    fn report_error(&self, action: &str, error: &EditorError) {
        log::error!("{} failed: {}", action, error);

        let level = if error.is_critical() {
            rfd::MessageLevel::Error
        } else {
            rfd::MessageLevel::Warning
        };
        rfd::MessageDialog::new()
            .set_level(level)
            .set_title(format!("{} failed", action))
            .set_description(error.to_string())
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }

    /// Ask whether to save unsaved changes. Returns `false` if the pending
    /// action should not continue now.
    fn confirm_discard(&mut self, after: AfterSave) -> bool {
        if !self.document.modified {
            return true;
        }

        let answer = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("GIF was changed...")
            .set_description("GIF was changed. Do you want to save changes?")
            .set_buttons(rfd::MessageButtons::YesNoCancel)
            .show();

        match answer {
            rfd::MessageDialogResult::Yes => {
                self.after_save = after;
                self.save();
                false
            }
            rfd::MessageDialogResult::No => true,
            _ => false,
        }
    }

    /// Ask for a GIF and start decoding it.
    fn open(&mut self) {
        if self.is_busy() || !self.confirm_discard(AfterSave::Open) {
            return;
        }

        if let Some(path) = rfd::FileDialog::new()
            .add_filter("GIF images", &["gif"])
            .pick_file()
        {
            self.start_open(path);
        }
    }

    fn start_open(&mut self, path: PathBuf) -> bool {
        let message = format!("Opening {}...", path.display());
        self.worker.spawn(message, move || {
            let result = gif::decode(&path);
            TaskResult::Opened { path, result }
        })
    }

    /// Replace the document with freshly decoded frames.
    fn finish_open(
        &mut self,
        ctx: &egui::Context,
        path: PathBuf,
        result: Result<Vec<Frame>, EditorError>,
    ) -> Result<(), EditorError> {
        let frames = result?;
        if frames.is_empty() {
            return Err(EditorError::Codec(format!(
                "{} contains no frames",
                path.display()
            )));
        }

        self.playback.stop();
        self.store.load(frames);
        self.textures.rebuild(ctx, &self.store);
        self.view.show_store(&self.store);
        self.tape_scroll = Some(0.0);
        self.document = Document {
            path: Some(path),
            modified: false,
        };

        log::info!("Opened GIF with {} frames", self.store.len());
        Ok(())
    }

    fn save(&mut self) {
        match self.document.path.clone() {
            Some(path) => {
                self.start_save(path);
            }
            None => self.save_as(),
        }
    }

    fn save_as(&mut self) {
        if self.is_busy() || self.store.is_empty() {
            return;
        }

        let file_name = self
            .document
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "animation.gif".to_string());

        match rfd::FileDialog::new()
            .add_filter("GIF images", &["gif"])
            .set_file_name(file_name)
            .save_file()
        {
            Some(path) => {
                self.start_save(with_gif_extension(path));
            }
            None => self.after_save = AfterSave::Nothing,
        }
    }

    /// Start encoding the checked frames to `path`. Unchecked frames are
    /// dropped from the document only once the file is written.
    fn start_save(&mut self, path: PathBuf) -> bool {
        if self.is_busy() || self.store.is_empty() {
            return false;
        }

        let kept = self.view.tape().checked_indices();
        if kept.is_empty() {
            self.after_save = AfterSave::Nothing;
            rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_title("Nothing to save")
                .set_description("All frames are unchecked. Check at least one frame to save.")
                .set_buttons(rfd::MessageButtons::Ok)
                .show();
            return false;
        }

        self.playback.stop();
        self.view.stop_crop();

        let store = std::mem::take(&mut self.store);
        let options = self.encode_options();
        let message = format!("Saving {}...", path.display());

        self.worker.spawn(message, move || {
            let frames = store
                .iter()
                .enumerate()
                .filter(|(index, _)| kept.contains(index))
                .map(|(_, frame)| frame);
            let result = gif::encode(frames, &path, options);
            TaskResult::Saved {
                store,
                kept,
                path,
                result,
            }
        })
    }

    fn finish_save(
        &mut self,
        ctx: &egui::Context,
        store: FrameStore,
        kept: BTreeSet<usize>,
        path: PathBuf,
        result: Result<(), EditorError>,
    ) -> Result<(), EditorError> {
        self.store = store;
        let after = std::mem::replace(&mut self.after_save, AfterSave::Nothing);

        // On failure the store, tape and textures are left as they were.
        result?;

        if kept.len() < self.store.len() {
            self.store.retain(&kept);
            self.view.tape_mut().remove_unchecked();
            self.textures.retain(&kept);
            self.view.process_events();
        }
        debug_assert_eq!(self.textures.len(), self.store.len());

        log::info!("Saved {} frames to {}", self.store.len(), path.display());
        self.document = Document {
            path: Some(path),
            modified: false,
        };

        match after {
            AfterSave::Open => self.open(),
            AfterSave::Close => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            AfterSave::Nothing => {}
        }
        Ok(())
    }

    fn start_crop(&mut self) {
        if self.is_busy() || self.store.is_empty() {
            return;
        }
        self.playback.stop();
        self.view.start_crop();
    }

    /// Apply the pending selection to every frame.
    fn apply_crop(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }

        let Some(rect) = self.view.pending_crop(&self.store) else {
            log::info!("Selection does not change the frames, leaving crop mode");
            self.view.stop_crop();
            return false;
        };

        self.start_crop_task(rect)
    }

    fn start_crop_task(&mut self, rect: PixelRect) -> bool {
        self.view.stop_crop();
        self.playback.stop();

        let mut store = std::mem::take(&mut self.store);
        self.worker.spawn("Cropping frames...", move || {
            let result = store.crop_all(rect);
            TaskResult::Cropped { store, result }
        })
    }

    fn finish_crop(&mut self, ctx: &egui::Context, store: FrameStore, result: Result<(), EditorError>) {
        self.store = store;

        match result {
            Ok(()) => {
                self.textures.rebuild(ctx, &self.store);
                debug_assert_eq!(self.textures.len(), self.store.len());
                self.view.tape_mut().rebuild(&self.store);
                self.view.process_events();
                self.document.modified = true;
            }
            Err(e) => {
                // The overlay clamps the selection, so this is a logic error.
                debug_assert!(false, "crop rejected: {}", e);
                log::error!("Crop failed: {}", e);
            }
        }
    }

    /// Report the outcome of a finished background task.
    fn poll_worker(&mut self, ctx: &egui::Context) {
        if let Err((action, error)) = self.apply_task(ctx) {
            self.report_error(action, &error);
        }
    }

    /// Apply a finished background task to the document.
    fn apply_task(&mut self, ctx: &egui::Context) -> Result<(), Failure> {
        match self.worker.poll() {
            TaskStatus::Done(TaskResult::Opened { path, result }) => {
                self.finish_open(ctx, path, result).map_err(|e| ("Open", e))
            }
            TaskStatus::Done(TaskResult::Cropped { store, result }) => {
                self.finish_crop(ctx, store, result);
                Ok(())
            }
            TaskStatus::Done(TaskResult::Saved {
                store,
                kept,
                path,
                result,
            }) => self
                .finish_save(ctx, store, kept, path, result)
                .map_err(|e| ("Save", e)),
            TaskStatus::Lost => {
                // The store went down with the task thread.
                self.store.clear();
                self.textures.clear();
                self.view = View::new();
                self.document = Document::default();
                Err((
                    "Background task",
                    EditorError::Codec("the operation stopped unexpectedly".to_string()),
                ))
            }
            TaskStatus::Running | TaskStatus::Idle => Ok(()),
        }
    }

    fn toggle_playback(&mut self) {
        if self.playback.is_playing() {
            self.playback.stop();
        } else if !self.store.is_empty() && !self.view.is_cropping() {
            if self.view.tape().current().is_none() {
                self.view.tape_mut().set_current(1);
                self.view.process_events();
            }
            self.playback.start(Instant::now());
        }
    }

    /// Advance playback when the shown frame's delay has elapsed.
    fn tick_playback(&mut self, ctx: &egui::Context) {
        if !self.playback.is_playing() {
            return;
        }

        let Some(current) = self.view.tape().current() else {
            self.playback.stop();
            return;
        };

        let delay_ms = self.store.get(current - 1).map(|f| f.delay_ms).unwrap_or(0);
        let delay = effective_delay(delay_ms, self.settings.fallback_delay_ms);
        let now = Instant::now();

        if self.playback.advance(now, delay) {
            let next = next_counter(current, self.view.tape().count());
            self.view.tape_mut().set_current(next);
            self.view.process_events();

            let slot = slot_width(self.thumb_size().x);
            self.tape_scroll = Some(self.view.scroll_to_visible(
                next,
                slot,
                self.tape_viewport.width,
                self.tape_viewport.offset,
            ));
        }

        if let Some(remaining) = self.playback.remaining(now, delay) {
            ctx.request_repaint_after(remaining);
        }
    }

    /// Handle a window close request, prompting about unsaved changes or a
    /// running task.
    fn handle_close_request(&mut self, ctx: &egui::Context) {
        if !ctx.input(|i| i.viewport().close_requested()) {
            return;
        }

        if self.is_busy() {
            let answer = rfd::MessageDialog::new()
                .set_level(rfd::MessageLevel::Warning)
                .set_title("GIF Editor is busy")
                .set_description(
                    "An operation is still running and cannot be cancelled. Terminate the application?",
                )
                .set_buttons(rfd::MessageButtons::YesNo)
                .show();

            if answer == rfd::MessageDialogResult::Yes {
                log::warn!("Terminating while a background task is running");
                std::process::exit(1);
            }
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
            return;
        }

        if !self.confirm_discard(AfterSave::Close) {
            ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose);
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if self.is_busy() || ctx.wants_keyboard_input() {
            return;
        }

        let (open, save, quit, enter, escape, space) = ctx.input(|i| {
            (
                i.modifiers.command && i.key_pressed(egui::Key::O),
                i.modifiers.command && i.key_pressed(egui::Key::S),
                i.modifiers.command && i.key_pressed(egui::Key::Q),
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::Escape),
                i.key_pressed(egui::Key::Space),
            )
        });

        if open {
            self.open();
        } else if save {
            self.save();
        } else if quit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        } else if enter && self.view.is_cropping() {
            self.apply_crop();
        } else if escape && self.view.is_cropping() {
            self.view.stop_crop();
        } else if space {
            self.toggle_playback();
        }
    }

    fn update_title(&mut self, ctx: &egui::Context) {
        let title = self.document.title();
        if title != self.title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.title = title;
        }
    }

    fn show_menu(&mut self, ctx: &egui::Context) {
        let busy = self.is_busy();
        let has_frames = !self.store.is_empty();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.add_enabled(!busy, egui::Button::new("Open... (Ctrl+O)")).clicked() {
                        ui.close_menu();
                        self.open();
                    }
                    ui.separator();
                    if ui
                        .add_enabled(!busy && has_frames, egui::Button::new("Save (Ctrl+S)"))
                        .clicked()
                    {
                        ui.close_menu();
                        self.save();
                    }
                    if ui
                        .add_enabled(!busy && has_frames, egui::Button::new("Save As..."))
                        .clicked()
                    {
                        ui.close_menu();
                        self.save_as();
                    }
                    ui.separator();
                    if ui.add_enabled(!busy, egui::Button::new("Quit (Ctrl+Q)")).clicked() {
                        ui.close_menu();
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("Edit", |ui| {
                    let cropping = self.view.is_cropping();
                    if ui
                        .add_enabled(!busy && has_frames && !cropping, egui::Button::new("Crop"))
                        .clicked()
                    {
                        ui.close_menu();
                        self.start_crop();
                    }
                    let can_apply = self.view.pending_crop(&self.store).is_some();
                    if ui
                        .add_enabled(!busy && can_apply, egui::Button::new("Apply crop (Enter)"))
                        .clicked()
                    {
                        ui.close_menu();
                        self.apply_crop();
                    }
                    if ui
                        .add_enabled(cropping, egui::Button::new("Cancel crop (Esc)"))
                        .clicked()
                    {
                        ui.close_menu();
                        self.view.stop_crop();
                    }
                });

                ui.menu_button("View", |ui| {
                    let label = if self.playback.is_playing() {
                        "Stop (Space)"
                    } else {
                        "Play (Space)"
                    };
                    if ui
                        .add_enabled(!busy && has_frames, egui::Button::new(label))
                        .clicked()
                    {
                        ui.close_menu();
                        self.toggle_playback();
                    }
                });
            });
        });
    }
}

/// Append `.gif` unless the path already ends with it.
fn with_gif_extension(path: PathBuf) -> PathBuf {
    let has_gif = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("gif"))
        .unwrap_or(false);
    if has_gif {
        path
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".gif");
        PathBuf::from(name)
    }
}

impl eframe::App for GifEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_worker(ctx);
        self.view.lock_tape_height(self.settings.tape_height);

        // Request repaint while busy (to update spinner)
        if self.is_busy() {
            ctx.request_repaint();
        }

        self.handle_close_request(ctx);
        self.handle_shortcuts(ctx);
        self.tick_playback(ctx);
        self.update_title(ctx);

        self.show_menu(ctx);

        if let Some(message) = self.worker.message().map(str::to_string) {
            // Only the busy indicator is shown while a task runs.
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(20.0);
                        ui.spinner();
                        ui.add_space(10.0);
                        ui.label(
                            egui::RichText::new(message)
                                .size(16.0)
                                .color(egui::Color32::from_gray(200)),
                        );
                    });
                });
            });
            return;
        }

        // Toolbar
        let toolbar_state = toolbar::ToolbarState {
            has_frames: !self.store.is_empty(),
            cropping: self.view.is_cropping(),
            can_apply_crop: self.view.pending_crop(&self.store).is_some(),
            playing: self.playback.is_playing(),
        };
        let toolbar_action = egui::TopBottomPanel::top("toolbar")
            .show(ctx, |ui| toolbar::show(ui, toolbar_state))
            .inner;

        match toolbar_action {
            toolbar::ToolbarAction::Open => self.open(),
            toolbar::ToolbarAction::Save => self.save(),
            toolbar::ToolbarAction::StartCrop => self.start_crop(),
            toolbar::ToolbarAction::ApplyCrop => {
                self.apply_crop();
            }
            toolbar::ToolbarAction::CancelCrop => self.view.stop_crop(),
            toolbar::ToolbarAction::PlayStop => self.toggle_playback(),
            toolbar::ToolbarAction::None => {}
        }
        if self.is_busy() {
            return;
        }

        // Tape (bottom)
        if !self.store.is_empty() {
            let thumb_size = self.thumb_size();
            let scroll_to = self.tape_scroll.take();
            self.tape_viewport = egui::TopBottomPanel::bottom("tape")
                .exact_height(self.view.tape_height())
                .resizable(false)
                .show(ctx, |ui| {
                    tape::show(ui, &mut self.view, &self.textures, thumb_size, scroll_to)
                })
                .inner;

            for change in self.view.process_events() {
                log::debug!("Frame #{} checked: {}", change.counter, change.checked);
                self.document.modified = true;
            }
        }

        // Preview (center)
        egui::CentralPanel::default().show(ctx, |ui| {
            preview::show(ui, &mut self.view, &self.store, &self.textures);
        });
    }
}
