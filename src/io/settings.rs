// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Settings file serialization and deserialization.
//!
//! Settings are stored as YAML or JSON, chosen by file extension.

use crate::config::Settings;
use anyhow::{bail, Result};
use std::path::Path;

/// Settings file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|s| s.to_str());
        match extension {
            Some("yaml") | Some("yml") => Ok(Format::Yaml),
            Some("json") => Ok(Format::Json),
            _ => bail!("Unsupported settings file extension: {:?}", extension),
        }
    }
}

/// Write settings to `path`.
pub fn export(settings: &Settings, path: &Path) -> Result<()> {
    let text = match Format::from_path(path)? {
        Format::Yaml => serde_yaml::to_string(settings)?,
        Format::Json => serde_json::to_string_pretty(settings)?,
    };
    std::fs::write(path, text)?;
    Ok(())
}

/// Read settings from `path`.
pub fn import(path: &Path) -> Result<Settings> {
    let format = Format::from_path(path)?;
    let text = std::fs::read_to_string(path)?;
    let settings = match format {
        Format::Yaml => serde_yaml::from_str(&text)?,
        Format::Json => serde_json::from_str(&text)?,
    };
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            encoder_speed: 3,
            loop_forever: false,
            ..Settings::default()
        };

        export(&settings, &path).unwrap();
        let loaded = import(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_yaml_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yaml");
        std::fs::write(&path, "fallback_delay_ms: 50\nloop_forever: false\n").unwrap();
        let loaded = import(&path).unwrap();

        assert_eq!(loaded.fallback_delay_ms, 50);
        assert!(!loaded.loop_forever);
        assert_eq!(loaded.tape_height, Settings::default().tape_height);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        assert!(Format::from_path(Path::new("settings.toml")).is_err());
    }
}
