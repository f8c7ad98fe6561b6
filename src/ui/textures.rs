// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! GPU textures for stored frames.
//!
//! One texture per frame index, shared by the filmstrip thumbnails and the
//! large preview.

use crate::models::frame_store::FrameStore;
use std::collections::BTreeSet;

#[derive(Default)]
pub struct FrameTextures {
    handles: Vec<egui::TextureHandle>,
}

impl FrameTextures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload every frame of `store`, replacing the previous textures.
    pub fn rebuild(&mut self, ctx: &egui::Context, store: &FrameStore) {
        self.handles = store
            .iter()
            .enumerate()
            .map(|(index, frame)| {
                let size = [frame.width() as usize, frame.height() as usize];
                let color_image =
                    egui::ColorImage::from_rgba_unmultiplied(size, frame.image.as_raw());
                ctx.load_texture(
                    format!("frame_{}", index),
                    color_image,
                    egui::TextureOptions::LINEAR,
                )
            })
            .collect();

        log::debug!("Uploaded {} frame textures", self.handles.len());
    }

    /// Keep the textures at `indices`, mirroring [`FrameStore::retain`].
    pub fn retain(&mut self, indices: &BTreeSet<usize>) {
        let mut index = 0;
        self.handles.retain(|_| {
            let keep = indices.contains(&index);
            index += 1;
            keep
        });
    }

    pub fn get(&self, index: usize) -> Option<&egui::TextureHandle> {
        self.handles.get(index)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::frame_store::Frame;
    use image::RgbaImage;

    #[test]
    fn test_rebuild_and_retain_follow_store() {
        let ctx = egui::Context::default();
        let mut store = FrameStore::new();
        store.load(
            (0..4)
                .map(|n| Frame::new(RgbaImage::new(2 + n, 3), 100))
                .collect(),
        );

        let mut textures = FrameTextures::new();
        textures.rebuild(&ctx, &store);
        assert_eq!(textures.len(), 4);

        let keep: BTreeSet<usize> = [1, 3].into_iter().collect();
        textures.retain(&keep);
        assert_eq!(textures.len(), 2);
        assert_eq!(textures.get(0).map(|t| t.size()), Some([3, 3]));
        assert_eq!(textures.get(1).map(|t| t.size()), Some([5, 3]));

        textures.clear();
        assert!(textures.get(0).is_none());
    }
}
