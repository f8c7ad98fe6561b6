// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for GIF and settings files.

pub mod gif;
pub mod settings;
