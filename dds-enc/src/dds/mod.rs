//! DDS (DirectDraw Surface) texture encoding.
//!
//! This module encodes a [`Raster`](crate::Raster) into a single-surface DDS
//! container with DXT1-DXT5 block compression.
//!
//! # Format Details
//!
//! ## DXT1
//!
//! - Block size: 8 bytes per 4×4 texels
//! - Color: two RGB565 endpoints + 2-bit indices
//! - Alpha: none beyond what the color block itself encodes
//!
//! ## DXT2 / DXT3
//!
//! - Block size: 16 bytes per 4×4 texels
//! - Alpha: explicit 4 bits per texel (8 bytes), then a DXT1 color block
//!
//! ## DXT4 / DXT5
//!
//! - Block size: 16 bytes per 4×4 texels
//! - Alpha: two 8-bit endpoints + 3-bit indices (8 bytes), then a DXT1 color block
//!
//! DXT2 and DXT4 declare premultiplied color. The encoder does not premultiply;
//! callers asking for those variants must hand in premultiplied pixels.
//!
//! # Edge handling
//!
//! Tiles overhanging the right or bottom edge replicate the nearest edge texel
//! so no black fringe bleeds into the compressed endpoints.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::BufWriter;
//! use dds_enc::dds::{DdsEncoder, DxtFormat};
//! use dds_enc::Raster;
//!
//! let raster = Raster::open("input.png").unwrap();
//! let mut out = BufWriter::new(File::create("output.dds").unwrap());
//!
//! let summary = DdsEncoder::new(DxtFormat::Dxt5)
//!     .write_container(&mut out, &raster)
//!     .unwrap();
//! println!("{}", summary);
//! ```

mod alpha;
mod bc1;
mod compressor;
mod encoder;
mod header;
mod payload;
mod tile;
mod types;

// Public API
pub use compressor::{BlockCompressor, CompressionQuality, RangeFitCompressor};
pub use encoder::{DdsEncoder, EncodeSummary};
pub use header::DdsHeader;
pub use payload::{build_payload, explicit_alpha_block, Payload};
pub use tile::{extract_tile, AlphaPlane, ColorBlock, Tile, TileGrid};
pub use types::{DdsError, DxtFormat, HEADER_SIZE};
