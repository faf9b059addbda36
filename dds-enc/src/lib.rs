//! dds-enc - DXT-compressed DDS texture encoding
//!
//! This library turns an RGBA8 raster into a DirectDraw Surface container
//! carrying DXT1-DXT5 block payloads, ready to be uploaded to a GPU as-is.
//!
//! # Pipeline
//!
//! ```text
//! ┌────────┐   ┌────────────────┐   ┌──────────────────┐   ┌──────────────────┐
//! │ Raster │──►│ Tile extractor │──►│ Payload policy + │──►│ Container writer │
//! │ (RGBA8)│   │ (4×4, clamped) │   │ BlockCompressor  │   │ (header + tiles) │
//! └────────┘   └────────────────┘   └──────────────────┘   └──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use dds_enc::dds::{DdsEncoder, DxtFormat};
//! use dds_enc::Raster;
//!
//! let raster = Raster::new(4, 4, [255, 0, 0, 255].repeat(16)).unwrap();
//! let encoder = DdsEncoder::new(DxtFormat::Dxt1);
//!
//! let dds = encoder.encode(&raster).unwrap();
//! assert_eq!(dds.len(), 128 + 8);
//! assert_eq!(&dds[84..88], b"DXT1");
//! ```

pub mod dds;
pub mod logging;
pub mod raster;

pub use raster::{Raster, RasterError};
