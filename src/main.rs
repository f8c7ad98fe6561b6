// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! GIF Editor
//!
//! A desktop application for viewing animated GIFs, cropping every frame
//! to a rectangular region and dropping unwanted frames before saving.

mod app;
mod config;
mod error;
mod io;
mod models;
mod ui;
mod util;
mod view;
mod worker;

use anyhow::Result;
use app::GifEditorApp;
use config::Settings;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let settings = Settings::load();
    log::debug!("Using settings: {:?}", settings);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([400.0, 300.0])
            .with_title("GIF Editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "GIF Editor",
        options,
        Box::new(|_cc| Ok(Box::new(GifEditorApp::new(settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
