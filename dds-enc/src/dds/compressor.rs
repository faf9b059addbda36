//! Block compressor abstraction.
//!
//! The tiling and container logic never touch bit-level block math directly;
//! they go through [`BlockCompressor`], so an alternative compressor (or a
//! test double) can be injected without modifying the encoder.
//!
//! ```text
//! ┌──────────────────┐
//! │    DdsEncoder    │
//! │                  │
//! │ Arc<dyn BlockCompressor>
//! └────────┬─────────┘
//!          │
//!          ▼
//! ┌──────────────────┐
//! │ BlockCompressor  │ (trait)
//! └────────┬─────────┘
//!          │
//!     ┌────┴─────┐
//!     ▼          ▼
//! ┌─────────┐ ┌──────────┐
//! │RangeFit │ │  Other   │
//! │         │ │ backends │
//! └─────────┘ └──────────┘
//! ```

use crate::dds::tile::{AlphaPlane, ColorBlock};
use crate::dds::{alpha, bc1};

/// Quality switches for color block compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressionQuality {
    /// Diffuse RGB565 quantization error across the block before fitting.
    pub dither: bool,
    /// Spend extra time refining endpoints.
    pub high_quality: bool,
}

impl CompressionQuality {
    /// Fastest settings.
    pub const FAST: CompressionQuality = CompressionQuality {
        dither: false,
        high_quality: false,
    };

    /// Dithering and high-quality search both enabled.
    pub const MAXIMUM: CompressionQuality = CompressionQuality {
        dither: true,
        high_quality: true,
    };
}

/// Compresses single 4×4 blocks.
///
/// Implementations must be deterministic: the same input always produces the
/// same bytes, regardless of which thread calls them.
pub trait BlockCompressor: Send + Sync {
    /// Compress 16 texels to an 8-byte DXT1 color block.
    ///
    /// With `use_alpha_blend` set, texels whose alpha is below 128 may be
    /// encoded as transparent (three-color mode).
    fn compress_color_block(
        &self,
        block: &ColorBlock,
        use_alpha_blend: bool,
        quality: CompressionQuality,
    ) -> [u8; 8];

    /// Compress 16 alpha samples to an 8-byte interpolated alpha block.
    fn compress_alpha_block(&self, alpha: &AlphaPlane) -> [u8; 8];

    /// Human-readable compressor name for logs.
    fn name(&self) -> &str;
}

/// Built-in bounding-box ("range fit") compressor.
#[derive(Debug, Clone, Copy, Default)]
pub struct RangeFitCompressor;

impl RangeFitCompressor {
    pub fn new() -> Self {
        Self
    }
}

impl BlockCompressor for RangeFitCompressor {
    fn compress_color_block(
        &self,
        block: &ColorBlock,
        use_alpha_blend: bool,
        quality: CompressionQuality,
    ) -> [u8; 8] {
        bc1::compress_block(block, use_alpha_blend, quality)
    }

    fn compress_alpha_block(&self, alpha: &AlphaPlane) -> [u8; 8] {
        alpha::compress_block(alpha)
    }

    fn name(&self) -> &str {
        "range-fit"
    }
}
