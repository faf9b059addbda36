//! Interpolated alpha block compression (DXT4/DXT5).
//!
//! An alpha block compresses 16 alpha samples to 8 bytes:
//! - 1 byte: alpha0
//! - 1 byte: alpha1
//! - 6 bytes: 16 3-bit indices (one per sample, sample 0 in the low bits)

use crate::dds::tile::AlphaPlane;

/// Compress 16 alpha samples to 8 bytes.
///
/// Uses 8-alpha interpolation mode with the block maximum as alpha0 and the
/// minimum as alpha1.
pub fn compress_block(alpha: &AlphaPlane) -> [u8; 8] {
    let min_alpha = alpha.iter().copied().min().unwrap_or(0);
    let max_alpha = alpha.iter().copied().max().unwrap_or(0);

    let (alpha0, alpha1) = (max_alpha, min_alpha);
    let palette = build_palette(alpha0, alpha1);
    let indices = generate_indices(alpha, &palette);

    let mut output = [0u8; 8];
    output[0] = alpha0;
    output[1] = alpha1;
    output[2..8].copy_from_slice(&indices.to_le_bytes()[0..6]);
    output
}

/// Build 8-value alpha palette from two endpoints.
fn build_palette(alpha0: u8, alpha1: u8) -> [u8; 8] {
    let a0 = alpha0 as u16;
    let a1 = alpha1 as u16;

    [
        alpha0,
        alpha1,
        ((6 * a0 + a1) / 7) as u8,
        ((5 * a0 + 2 * a1) / 7) as u8,
        ((4 * a0 + 3 * a1) / 7) as u8,
        ((3 * a0 + 4 * a1) / 7) as u8,
        ((2 * a0 + 5 * a1) / 7) as u8,
        ((a0 + 6 * a1) / 7) as u8,
    ]
}

/// Pack the nearest palette index of each sample into 48 bits.
fn generate_indices(alpha: &AlphaPlane, palette: &[u8; 8]) -> u64 {
    let mut indices = 0u64;

    for (i, &value) in alpha.iter().enumerate() {
        let mut best_dist = u32::MAX;
        let mut best_index = 0u64;

        for (idx, &entry) in palette.iter().enumerate() {
            let dist = (value as i32 - entry as i32).unsigned_abs();
            if dist < best_dist {
                best_dist = dist;
                best_index = idx as u64;
            }
        }

        indices |= best_index << (i * 3);
    }

    indices
}
