//! Source rasters for encoding.
//!
//! A [`Raster`] is a flat RGBA8 buffer, row-major, 4 bytes per texel. It is
//! immutable once built and is only ever read by the encoder.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use thiserror::Error;

/// Bytes per RGBA8 texel.
pub const BYTES_PER_TEXEL: usize = 4;

/// Errors that can occur while building or loading a raster.
#[derive(Debug, Error)]
pub enum RasterError {
    /// The source image could not be opened or decoded.
    #[error("Failed to load '{}': {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Width or height is zero.
    #[error("Invalid dimensions {width}×{height}: both must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Pixel buffer length does not match the dimensions.
    #[error("Pixel buffer is {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// An RGBA8 image held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Raster {
    /// Create a raster from raw RGBA8 bytes.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::InvalidDimensions`] if either dimension is zero
    /// and [`RasterError::BufferSize`] if `pixels.len() != width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidDimensions { width, height });
        }

        let expected = width as usize * height as usize * BYTES_PER_TEXEL;
        if pixels.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Create a raster from a decoded `image` buffer.
    pub fn from_image(image: RgbaImage) -> Result<Self, RasterError> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }

    /// Decode an image file of any format supported by the `image` crate.
    ///
    /// Non-RGBA sources are converted to RGBA8; missing alpha becomes opaque.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RasterError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| RasterError::Decode {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            width = image.width(),
            height = image.height(),
            color = ?image.color(),
            "Decoded source image"
        );

        Self::from_image(image.into_rgba8())
    }

    /// Width in texels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in texels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The raw RGBA8 buffer.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Read the texel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate lies outside the raster.
    pub fn texel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(
            x < self.width && y < self.height,
            "texel ({x}, {y}) outside {}×{} raster",
            self.width,
            self.height
        );
        let offset = (y as usize * self.width as usize + x as usize) * BYTES_PER_TEXEL;
        [
            self.pixels[offset],
            self.pixels[offset + 1],
            self.pixels[offset + 2],
            self.pixels[offset + 3],
        ]
    }
}
