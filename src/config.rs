// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application settings.
//!
//! Settings are read once at startup from the file named by the
//! `GIF_EDITOR_CONFIG` environment variable, or from `gif-editor.yaml` in the
//! working directory. Every field is optional in the file.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the settings file.
pub const CONFIG_ENV: &str = "GIF_EDITOR_CONFIG";

/// Settings file looked up when `GIF_EDITOR_CONFIG` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "gif-editor.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial window size in logical points.
    pub window_width: f32,
    pub window_height: f32,
    /// Height of the filmstrip.
    pub tape_height: f32,
    /// GIF encoder speed, 1 (best quality) to 30 (fastest).
    pub encoder_speed: i32,
    /// Write an infinite loop extension when saving.
    pub loop_forever: bool,
    /// Playback delay for frames stored with a zero delay.
    pub fallback_delay_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_width: 800.0,
            window_height: 600.0,
            tape_height: 150.0,
            encoder_speed: 10,
            loop_forever: true,
            fallback_delay_ms: 100,
        }
    }
}

impl Settings {
    /// Clamp out-of-range values into something usable.
    pub fn sanitized(mut self) -> Self {
        let defaults = Settings::default();
        if !(1..=30).contains(&self.encoder_speed) {
            log::warn!(
                "encoder_speed {} out of range 1..=30, using {}",
                self.encoder_speed,
                defaults.encoder_speed
            );
            self.encoder_speed = defaults.encoder_speed;
        }
        if self.tape_height < 60.0 {
            self.tape_height = defaults.tape_height;
        }
        if self.window_width < 320.0 || self.window_height < 240.0 {
            self.window_width = defaults.window_width;
            self.window_height = defaults.window_height;
        }
        self
    }

    /// Settings file location, if one should be read.
    pub fn path() -> Option<PathBuf> {
        match std::env::var_os(CONFIG_ENV) {
            Some(p) => Some(PathBuf::from(p)),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.exists().then_some(default)
            }
        }
    }

    /// Load settings, falling back to defaults when missing or malformed.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::debug!("No settings file, using defaults");
            return Settings::default();
        };

        // A named but missing file gets a template with the defaults.
        if !path.exists() {
            let defaults = Settings::default();
            match crate::io::settings::export(&defaults, &path) {
                Ok(()) => log::info!("Wrote default settings to {}", path.display()),
                Err(e) => log::warn!("Failed to write settings to {}: {}", path.display(), e),
            }
            return defaults;
        }

        match crate::io::settings::import(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings.sanitized()
            }
            Err(e) => {
                log::warn!("Failed to load settings from {}: {}", path.display(), e);
                Settings::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let settings: Settings = serde_yaml::from_str("tape_height: 200\n").unwrap();
        assert_eq!(settings.tape_height, 200.0);
        assert_eq!(settings.encoder_speed, Settings::default().encoder_speed);
    }

    #[test]
    fn test_sanitized_fixes_bad_values() {
        let settings = Settings {
            encoder_speed: 99,
            tape_height: 10.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings, Settings::default());
    }
}
