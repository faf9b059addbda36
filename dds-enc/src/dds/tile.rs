//! 4×4 tile extraction with nearest-edge clamping.

use crate::raster::Raster;

/// Texels along one side of a tile.
pub const TILE_DIM: u32 = 4;

/// 16 RGBA texels in row-major order. Alpha is always 0xFF.
pub type ColorBlock = [[u8; 4]; 16];

/// 16 alpha samples in row-major order.
pub type AlphaPlane = [u8; 16];

/// One 4×4 unit of compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// RGB of each sample with the alpha byte forced opaque.
    pub color_block: ColorBlock,
    /// The original alpha of each sample.
    pub alpha_plane: AlphaPlane,
}

/// Tile layout of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    /// Tiles per row, `ceil(width / 4)`.
    pub tiles_wide: u32,
    /// Tile rows, `ceil(height / 4)`.
    pub tiles_high: u32,
}

impl TileGrid {
    /// Compute the grid covering a `width`×`height` raster.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            tiles_wide: width.div_ceil(TILE_DIM),
            tiles_high: height.div_ceil(TILE_DIM),
        }
    }

    /// Total number of tiles.
    pub fn count(&self) -> usize {
        self.tiles_wide as usize * self.tiles_high as usize
    }

    /// Tile coordinates in container order: `ty` outer, `tx` inner.
    pub fn coords(&self) -> impl Iterator<Item = (u32, u32)> {
        let tiles_wide = self.tiles_wide;
        (0..self.tiles_high).flat_map(move |ty| (0..tiles_wide).map(move |tx| (tx, ty)))
    }
}

/// Extract the tile at `(tile_x, tile_y)`.
///
/// Samples past the right or bottom edge are clamped to the nearest edge
/// texel, so an overhanging tile replicates its border instead of reading
/// outside the raster or padding with black.
pub fn extract_tile(raster: &Raster, tile_x: u32, tile_y: u32) -> Tile {
    let max_x = raster.width() - 1;
    let max_y = raster.height() - 1;

    let mut color_block = [[0u8; 4]; 16];
    let mut alpha_plane = [0u8; 16];

    for by in 0..TILE_DIM {
        for bx in 0..TILE_DIM {
            let x = (tile_x * TILE_DIM + bx).min(max_x);
            let y = (tile_y * TILE_DIM + by).min(max_y);
            let [r, g, b, a] = raster.texel(x, y);

            let index = (by * TILE_DIM + bx) as usize;
            color_block[index] = [r, g, b, 0xFF];
            alpha_plane[index] = a;
        }
    }

    Tile {
        color_block,
        alpha_plane,
    }
}
