// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor data model: frames, the filmstrip, crop selection and playback.

pub mod frame_store;
pub mod playback;
pub mod selection;
pub mod tape;
