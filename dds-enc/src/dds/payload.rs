//! Per-format tile payload construction.
//!
//! | Format     | Bytes | Layout                                          |
//! |------------|-------|-------------------------------------------------|
//! | DXT1       | 8     | color block                                     |
//! | DXT2, DXT3 | 16    | explicit 4-bit alpha, then color block          |
//! | DXT4, DXT5 | 16    | interpolated alpha block, then color block      |
//!
//! Premultiplied and straight variants are built identically; whether the
//! color was premultiplied is a property of the source pixels.

use crate::dds::compressor::{BlockCompressor, CompressionQuality};
use crate::dds::tile::{AlphaPlane, Tile};
use crate::dds::types::DxtFormat;

/// Color compression always runs with this quality.
const COLOR_QUALITY: CompressionQuality = CompressionQuality::MAXIMUM;

/// Compressed bytes for one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payload {
    bytes: [u8; 16],
    len: usize,
}

impl Payload {
    fn color_only(color: [u8; 8]) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&color);
        Self { bytes, len: 8 }
    }

    fn alpha_and_color(alpha: [u8; 8], color: [u8; 8]) -> Self {
        let mut bytes = [0u8; 16];
        bytes[0..8].copy_from_slice(&alpha);
        bytes[8..16].copy_from_slice(&color);
        Self { bytes, len: 16 }
    }

    /// The payload bytes, exactly `format.payload_size()` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Build the payload of `tile` for `format`.
///
/// The color block is always compressed without alpha blending and at
/// maximum quality.
pub fn build_payload(format: DxtFormat, tile: &Tile, compressor: &dyn BlockCompressor) -> Payload {
    let color = compressor.compress_color_block(&tile.color_block, false, COLOR_QUALITY);

    match format {
        DxtFormat::Dxt1 => Payload::color_only(color),
        DxtFormat::Dxt2 | DxtFormat::Dxt3 => {
            Payload::alpha_and_color(explicit_alpha_block(&tile.alpha_plane), color)
        }
        DxtFormat::Dxt4 | DxtFormat::Dxt5 => {
            Payload::alpha_and_color(compressor.compress_alpha_block(&tile.alpha_plane), color)
        }
    }
}

/// Explicit 4-bit alpha block used by DXT2/DXT3.
///
/// Each sample is truncated to 4 bits as `a / 17`. Byte `i` holds samples
/// `2i` (low nibble) and `2i + 1` (high nibble).
pub fn explicit_alpha_block(alpha: &AlphaPlane) -> [u8; 8] {
    let mut out = [0u8; 8];
    for (byte, pair) in out.iter_mut().zip(alpha.chunks_exact(2)) {
        let a0 = pair[0] / 17;
        let a1 = pair[1] / 17;
        *byte = (a1 << 4) | a0;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dds::tile::ColorBlock;
    use std::sync::Mutex;

    /// Returns fixed marker bytes and records every call.
    #[derive(Default)]
    struct RecordingCompressor {
        color_calls: Mutex<Vec<(ColorBlock, bool, CompressionQuality)>>,
        alpha_calls: Mutex<Vec<AlphaPlane>>,
    }

    impl BlockCompressor for RecordingCompressor {
        fn compress_color_block(
            &self,
            block: &ColorBlock,
            use_alpha_blend: bool,
            quality: CompressionQuality,
        ) -> [u8; 8] {
            self.color_calls
                .lock()
                .unwrap()
                .push((*block, use_alpha_blend, quality));
            [0xC0; 8]
        }

        fn compress_alpha_block(&self, alpha: &AlphaPlane) -> [u8; 8] {
            self.alpha_calls.lock().unwrap().push(*alpha);
            [0xA0; 8]
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn tile_with_alpha(alpha_plane: AlphaPlane) -> Tile {
        Tile {
            color_block: [[1, 2, 3, 0xFF]; 16],
            alpha_plane,
        }
    }

    #[test]
    fn test_explicit_alpha_extremes() {
        assert_eq!(explicit_alpha_block(&[0; 16]), [0x00; 8]);
        assert_eq!(explicit_alpha_block(&[255; 16]), [0xFF; 8]);
    }

    #[test]
    fn test_explicit_alpha_pairing_order() {
        let mut alpha = [0u8; 16];
        // Pair 0: even sample opaque, odd sample transparent
        alpha[0] = 255;
        alpha[1] = 0;
        // Pair 3: even sample transparent, odd sample opaque
        alpha[6] = 0;
        alpha[7] = 255;

        let block = explicit_alpha_block(&alpha);
        assert_eq!(block[0], 0x0F);
        assert_eq!(block[3], 0xF0);
    }

    #[test]
    fn test_explicit_alpha_truncates() {
        let mut alpha = [0u8; 16];
        alpha[0] = 16; // 16 / 17 = 0
        alpha[1] = 17; // 1
        alpha[2] = 33; // 1
        alpha[3] = 34; // 2
        alpha[4] = 254; // 14

        let block = explicit_alpha_block(&alpha);
        assert_eq!(block[0], 0x10);
        assert_eq!(block[1], 0x21);
        assert_eq!(block[2], 0x0E);
    }

    #[test]
    fn test_payload_sizes() {
        let compressor = RecordingCompressor::default();
        let tile = tile_with_alpha([128; 16]);

        for format in DxtFormat::ALL {
            let payload = build_payload(format, &tile, &compressor);
            assert_eq!(payload.len(), format.payload_size());
            assert_eq!(payload.as_bytes().len(), format.payload_size());
            assert!(!payload.is_empty());
        }
    }

    #[test]
    fn test_dxt1_layout() {
        let compressor = RecordingCompressor::default();
        let payload = build_payload(DxtFormat::Dxt1, &tile_with_alpha([0; 16]), &compressor);

        assert_eq!(payload.as_bytes(), &[0xC0; 8]);
        assert!(compressor.alpha_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dxt3_layout() {
        let compressor = RecordingCompressor::default();
        let payload = build_payload(DxtFormat::Dxt3, &tile_with_alpha([255; 16]), &compressor);

        assert_eq!(&payload.as_bytes()[0..8], &[0xFF; 8]);
        assert_eq!(&payload.as_bytes()[8..16], &[0xC0; 8]);
        assert!(compressor.alpha_calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dxt5_layout() {
        let compressor = RecordingCompressor::default();
        let alpha = [7u8; 16];
        let payload = build_payload(DxtFormat::Dxt5, &tile_with_alpha(alpha), &compressor);

        assert_eq!(&payload.as_bytes()[0..8], &[0xA0; 8]);
        assert_eq!(&payload.as_bytes()[8..16], &[0xC0; 8]);
        assert_eq!(*compressor.alpha_calls.lock().unwrap(), vec![alpha]);
    }

    #[test]
    fn test_premultiplied_variants_build_identically() {
        let compressor = RecordingCompressor::default();
        let mut alpha = [0u8; 16];
        for (i, value) in alpha.iter_mut().enumerate() {
            *value = (i * 16) as u8;
        }
        let tile = tile_with_alpha(alpha);

        assert_eq!(
            build_payload(DxtFormat::Dxt2, &tile, &compressor),
            build_payload(DxtFormat::Dxt3, &tile, &compressor)
        );
        assert_eq!(
            build_payload(DxtFormat::Dxt4, &tile, &compressor),
            build_payload(DxtFormat::Dxt5, &tile, &compressor)
        );
    }

    #[test]
    fn test_color_policy_is_fixed() {
        let compressor = RecordingCompressor::default();
        let tile = tile_with_alpha([0; 16]);

        for format in DxtFormat::ALL {
            build_payload(format, &tile, &compressor);
        }

        let calls = compressor.color_calls.lock().unwrap();
        assert_eq!(calls.len(), 5);
        for (block, use_alpha_blend, quality) in calls.iter() {
            assert_eq!(*block, tile.color_block);
            assert!(!use_alpha_blend);
            assert_eq!(*quality, CompressionQuality::MAXIMUM);
        }
    }
}
