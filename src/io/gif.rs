// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! GIF decoding and encoding.
//!
//! The bitstream work is done by the `image` crate; this module converts
//! between its animation frames and [`Frame`].

use crate::error::EditorError;
use crate::models::frame_store::Frame;
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Delay};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Encoder options.
#[derive(Debug, Clone, Copy)]
pub struct EncodeOptions {
    /// 1 (best quality) to 30 (fastest).
    pub speed: i32,
    pub loop_forever: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            speed: 10,
            loop_forever: true,
        }
    }
}

/// Decode every frame of the GIF at `path`.
///
/// Frames come back composited onto the full canvas, so they all share the
/// canvas size and have their origin at (0, 0).
pub fn decode(path: &Path) -> Result<Vec<Frame>, EditorError> {
    let file = File::open(path)?;
    let decoder = GifDecoder::new(BufReader::new(file))?;

    let mut frames = Vec::new();
    for frame in decoder.into_frames() {
        let frame = frame?;
        let (numer, denom) = frame.delay().numer_denom_ms();
        let delay_ms = if denom > 0 { numer / denom } else { 0 };
        frames.push(Frame::new(frame.into_buffer(), delay_ms));
    }

    log::info!("Decoded {} frames from {}", frames.len(), path.display());
    Ok(frames)
}

/// Encode `frames` into a GIF at `path`.
///
/// The file is written next to the target and renamed over it, so the
/// target is either fully replaced or left untouched.
pub fn encode<'a, I>(frames: I, path: &Path, options: EncodeOptions) -> Result<(), EditorError>
where
    I: IntoIterator<Item = &'a Frame>,
{
    let mut bytes = Vec::new();
    let mut count = 0usize;
    {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, options.speed.clamp(1, 30));
        if options.loop_forever {
            encoder.set_repeat(Repeat::Infinite)?;
        }

        for frame in frames {
            let delay =
                Delay::from_saturating_duration(Duration::from_millis(u64::from(frame.delay_ms)));
            // Only one frame buffer is copied at a time; it is dropped once encoded.
            encoder.encode_frame(image::Frame::from_parts(frame.image.clone(), 0, 0, delay))?;
            count += 1;
        }
    }

    if count == 0 {
        return Err(EditorError::Codec("Cannot write a GIF with no frames".to_string()));
    }

    let temp = temp_path_for(path);
    std::fs::write(&temp, &bytes)?;
    if let Err(e) = std::fs::rename(&temp, path) {
        std::fs::remove_file(&temp).ok();
        return Err(e.into());
    }

    log::info!("Encoded {} frames to {}", count, path.display());
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(width: u32, height: u32, color: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(width, height, Rgba(color))
    }

    #[test]
    fn test_encode_then_decode_keeps_frames_and_delays() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.gif");
        let frames = vec![
            Frame::new(solid(8, 6, [255, 0, 0, 255]), 100),
            Frame::new(solid(8, 6, [0, 0, 255, 255]), 250),
        ];

        encode(&frames, &path, EncodeOptions::default()).unwrap();
        let decoded = decode(&path).unwrap();

        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].delay_ms, 100);
        assert_eq!(decoded[1].delay_ms, 250);
        assert!(decoded.iter().all(|f| f.width() == 8 && f.height() == 6));
        // Palette quantization may shift colors slightly.
        let first = decoded[0].image.get_pixel(3, 3);
        let second = decoded[1].image.get_pixel(3, 3);
        assert!(first[0] > 200 && first[2] < 50);
        assert!(second[2] > 200 && second[0] < 50);
        assert!(!temp_path_for(&path).exists());
    }

    #[test]
    fn test_encode_subset_of_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subset.gif");
        let frames: Vec<Frame> = [10, 20, 30]
            .iter()
            .map(|&delay| Frame::new(solid(4, 4, [0, 255, 0, 255]), delay))
            .collect();

        encode(
            frames.iter().enumerate().filter(|(i, _)| *i != 1).map(|(_, f)| f),
            &path,
            EncodeOptions::default(),
        )
        .unwrap();

        let delays: Vec<u32> = decode(&path).unwrap().iter().map(|f| f.delay_ms).collect();
        assert_eq!(delays, vec![10, 30]);
    }

    #[test]
    fn test_encode_without_frames_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.gif");
        let err = encode(&Vec::<Frame>::new(), &path, EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, EditorError::Codec(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_encode_into_missing_directory_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.gif");
        let frames = vec![Frame::new(solid(4, 4, [0, 0, 0, 255]), 100)];

        let err = encode(&frames, &path, EncodeOptions::default()).unwrap_err();
        assert!(matches!(err, EditorError::Io(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_decode_garbage_is_codec_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.gif");
        std::fs::write(&path, b"definitely not a gif").unwrap();
        let err = decode(&path).unwrap_err();
        assert!(matches!(err, EditorError::Codec(_)));
    }

    #[test]
    fn test_decode_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode(&dir.path().join("missing.gif")).unwrap_err();
        assert!(matches!(err, EditorError::Io(_)));
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let p = temp_path_for(Path::new("/tmp/out.gif"));
        assert_eq!(p, PathBuf::from("/tmp/out.gif.part"));
    }
}
