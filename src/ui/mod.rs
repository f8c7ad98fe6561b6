// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the GIF editor.

pub mod crop_overlay;
pub mod preview;
pub mod tape;
pub mod textures;
pub mod toolbar;
