//! DXT1 color block compression.
//!
//! A color block compresses 16 texels to 8 bytes:
//! - 2 bytes: color0 (RGB565)
//! - 2 bytes: color1 (RGB565)
//! - 4 bytes: 16 2-bit indices (one per texel, texel 0 in the low bits)
//!
//! When `color0 > color1` the indices select from a 4-color palette:
//! - 00: color0
//! - 01: color1
//! - 10: (2*color0 + color1) / 3
//! - 11: (color0 + 2*color1) / 3
//!
//! Otherwise the block is in 3-color mode: index 10 is the midpoint and
//! index 11 is transparent black.

use crate::dds::compressor::CompressionQuality;
use crate::dds::tile::ColorBlock;

/// Texels below this alpha become transparent in punch-through mode.
const ALPHA_THRESHOLD: u8 = 128;

/// Least-squares refinement passes in high-quality mode.
const REFINE_ITERATIONS: usize = 2;

/// Weight of color0 for each 4-color palette index.
const COLOR0_WEIGHTS: [f32; 4] = [1.0, 0.0, 2.0 / 3.0, 1.0 / 3.0];

/// Compress a 4×4 block to 8 bytes.
pub fn compress_block(
    block: &ColorBlock,
    use_alpha_blend: bool,
    quality: CompressionQuality,
) -> [u8; 8] {
    let pixels = if quality.dither {
        dither_block(block)
    } else {
        *block
    };

    // Which texels contribute color; the rest are punched through
    let mut opaque = [true; 16];
    if use_alpha_blend {
        for (flag, texel) in opaque.iter_mut().zip(block.iter()) {
            *flag = texel[3] >= ALPHA_THRESHOLD;
        }
    }

    if opaque.iter().all(|&o| !o) {
        return pack(0, 0, u32::MAX);
    }

    let (c0, c1) = find_endpoints(&pixels, &opaque);

    if opaque.iter().any(|&o| !o) {
        let (c0, c1) = if c0 <= c1 { (c0, c1) } else { (c1, c0) };
        let indices = three_color_indices(&pixels, &opaque, c0, c1);
        return pack(c0, c1, indices);
    }

    let (c0, c1) = if quality.high_quality {
        refine_endpoints(&pixels, c0, c1)
    } else {
        (c0, c1)
    };

    encode_four_color(&pixels, c0, c1)
}

/// Bounding-box endpoints over the contributing texels.
///
/// Returns (max_color, min_color) as RGB565 values.
fn find_endpoints(pixels: &ColorBlock, opaque: &[bool; 16]) -> (u16, u16) {
    let mut min = [255u8; 3];
    let mut max = [0u8; 3];

    for (pixel, _) in pixels.iter().zip(opaque).filter(|(_, &o)| o) {
        for ch in 0..3 {
            min[ch] = min[ch].min(pixel[ch]);
            max[ch] = max[ch].max(pixel[ch]);
        }
    }

    (
        rgb888_to_rgb565(max[0], max[1], max[2]),
        rgb888_to_rgb565(min[0], min[1], min[2]),
    )
}

/// Encode in 4-color mode, ordering endpoints so that `color0 > color1`.
fn encode_four_color(pixels: &ColorBlock, c0: u16, c1: u16) -> [u8; 8] {
    if c0 == c1 {
        // Every texel maps to color0; the mode bit is irrelevant
        return pack(c0, c1, 0);
    }

    let (c0, c1) = if c0 > c1 { (c0, c1) } else { (c1, c0) };
    let palette = four_color_palette(c0, c1);

    let mut indices = 0u32;
    for (i, pixel) in pixels.iter().enumerate() {
        let (index, _) = nearest(pixel, &palette);
        indices |= (index as u32) << (i * 2);
    }

    pack(c0, c1, indices)
}

/// Indices for 3-color mode. Transparent texels always get index 3.
fn three_color_indices(pixels: &ColorBlock, opaque: &[bool; 16], c0: u16, c1: u16) -> u32 {
    let rgb0 = rgb565_to_rgb888(c0);
    let rgb1 = rgb565_to_rgb888(c1);
    let palette = [
        rgb0,
        rgb1,
        [
            ((rgb0[0] as u16 + rgb1[0] as u16) / 2) as u8,
            ((rgb0[1] as u16 + rgb1[1] as u16) / 2) as u8,
            ((rgb0[2] as u16 + rgb1[2] as u16) / 2) as u8,
        ],
    ];

    let mut indices = 0u32;
    for (i, (pixel, &is_opaque)) in pixels.iter().zip(opaque).enumerate() {
        let index = if is_opaque {
            nearest(pixel, &palette).0 as u32
        } else {
            3
        };
        indices |= index << (i * 2);
    }
    indices
}

/// Least-squares endpoint refinement.
///
/// Each pass re-fits both endpoints to the current index assignment; a
/// candidate is only kept if it lowers the block error.
fn refine_endpoints(pixels: &ColorBlock, c0: u16, c1: u16) -> (u16, u16) {
    let mut best = (c0, c1);
    let mut best_error = block_error(pixels, c0, c1);

    for _ in 0..REFINE_ITERATIONS {
        if best.0 == best.1 {
            break;
        }

        let (hi, lo) = if best.0 > best.1 { best } else { (best.1, best.0) };
        let palette = four_color_palette(hi, lo);
        let mut assignment = [0usize; 16];
        for (slot, pixel) in assignment.iter_mut().zip(pixels.iter()) {
            *slot = nearest(pixel, &palette).0;
        }

        let Some(candidate) = least_squares_endpoints(pixels, &assignment) else {
            break;
        };

        let error = block_error(pixels, candidate.0, candidate.1);
        if error < best_error {
            best = candidate;
            best_error = error;
        } else {
            break;
        }
    }

    best
}

/// Solve for the endpoints minimizing squared error under `assignment`.
fn least_squares_endpoints(pixels: &ColorBlock, assignment: &[usize; 16]) -> Option<(u16, u16)> {
    let mut aa = 0.0f32;
    let mut bb = 0.0f32;
    let mut ab = 0.0f32;
    let mut ap = [0.0f32; 3];
    let mut bp = [0.0f32; 3];

    for (pixel, &index) in pixels.iter().zip(assignment) {
        let a = COLOR0_WEIGHTS[index];
        let b = 1.0 - a;
        aa += a * a;
        bb += b * b;
        ab += a * b;
        for ch in 0..3 {
            ap[ch] += a * pixel[ch] as f32;
            bp[ch] += b * pixel[ch] as f32;
        }
    }

    let det = aa * bb - ab * ab;
    if det.abs() < f32::EPSILON {
        return None;
    }

    let mut e0 = [0u8; 3];
    let mut e1 = [0u8; 3];
    for ch in 0..3 {
        e0[ch] = ((ap[ch] * bb - bp[ch] * ab) / det).round().clamp(0.0, 255.0) as u8;
        e1[ch] = ((bp[ch] * aa - ap[ch] * ab) / det).round().clamp(0.0, 255.0) as u8;
    }

    Some((
        rgb888_to_rgb565(e0[0], e0[1], e0[2]),
        rgb888_to_rgb565(e1[0], e1[1], e1[2]),
    ))
}

/// Total weighted error of encoding `pixels` with the given endpoints.
fn block_error(pixels: &ColorBlock, c0: u16, c1: u16) -> u64 {
    if c0 == c1 {
        let color = rgb565_to_rgb888(c0);
        return pixels
            .iter()
            .map(|p| color_distance_squared(p, &color) as u64)
            .sum();
    }

    let (hi, lo) = if c0 > c1 { (c0, c1) } else { (c1, c0) };
    let palette = four_color_palette(hi, lo);
    pixels.iter().map(|p| nearest(p, &palette).1 as u64).sum()
}

/// Floyd-Steinberg dithering toward the RGB565 grid, confined to the block.
fn dither_block(block: &ColorBlock) -> ColorBlock {
    let mut out = *block;

    for (ch, bits) in [(0usize, 5u32), (1, 6), (2, 5)] {
        // Accumulated error in sixteenths
        let mut error = [0i32; 16];

        for y in 0..4 {
            for x in 0..4 {
                let i = y * 4 + x;
                let value = (block[i][ch] as i32 + (error[i] + 8).div_euclid(16)).clamp(0, 255);
                let quantized = expand(quantize(value as u8, bits), bits) as i32;
                out[i][ch] = quantized as u8;

                let diff = value - quantized;
                if x < 3 {
                    error[i + 1] += diff * 7;
                }
                if y < 3 {
                    if x > 0 {
                        error[i + 3] += diff * 3;
                    }
                    error[i + 4] += diff * 5;
                    if x < 3 {
                        error[i + 5] += diff;
                    }
                }
            }
        }
    }

    out
}

fn four_color_palette(c0: u16, c1: u16) -> [[u8; 3]; 4] {
    let rgb0 = rgb565_to_rgb888(c0);
    let rgb1 = rgb565_to_rgb888(c1);
    let mix = |w0: u16, w1: u16| {
        [
            ((w0 * rgb0[0] as u16 + w1 * rgb1[0] as u16) / 3) as u8,
            ((w0 * rgb0[1] as u16 + w1 * rgb1[1] as u16) / 3) as u8,
            ((w0 * rgb0[2] as u16 + w1 * rgb1[2] as u16) / 3) as u8,
        ]
    };
    [rgb0, rgb1, mix(2, 1), mix(1, 2)]
}

/// Closest palette entry as (index, distance). Ties go to the lower index.
fn nearest(pixel: &[u8; 4], palette: &[[u8; 3]]) -> (usize, u32) {
    let mut best_index = 0;
    let mut best_dist = u32::MAX;
    for (idx, color) in palette.iter().enumerate() {
        let dist = color_distance_squared(pixel, color);
        if dist < best_dist {
            best_dist = dist;
            best_index = idx;
        }
    }
    (best_index, best_dist)
}

fn pack(c0: u16, c1: u16, indices: u32) -> [u8; 8] {
    let mut output = [0u8; 8];
    output[0..2].copy_from_slice(&c0.to_le_bytes());
    output[2..4].copy_from_slice(&c1.to_le_bytes());
    output[4..8].copy_from_slice(&indices.to_le_bytes());
    output
}

/// Round an 8-bit channel to `bits` bits.
fn quantize(value: u8, bits: u32) -> u16 {
    let max = (1u32 << bits) - 1;
    ((value as u32 * max + 127) / 255) as u16
}

/// Expand a `bits`-bit channel back to 8 bits by replicating high bits.
fn expand(value: u16, bits: u32) -> u8 {
    ((value << (8 - bits)) | (value >> (2 * bits - 8))) as u8
}

/// Convert RGB888 to packed RGB565 with rounding.
pub(crate) fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    (quantize(r, 5) << 11) | (quantize(g, 6) << 5) | quantize(b, 5)
}

/// Convert packed RGB565 to RGB888.
pub(crate) fn rgb565_to_rgb888(color: u16) -> [u8; 3] {
    [
        expand((color >> 11) & 0x1F, 5),
        expand((color >> 5) & 0x3F, 6),
        expand(color & 0x1F, 5),
    ]
}

/// Squared distance with perceptual weights R=3, G=6, B=1.
fn color_distance_squared(a: &[u8; 4], b: &[u8; 3]) -> u32 {
    let dr = (a[0] as i32 - b[0] as i32) * 3;
    let dg = (a[1] as i32 - b[1] as i32) * 6;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}
