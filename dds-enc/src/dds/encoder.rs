//! DDS encoder - main API for encoding rasters to DDS containers.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use rayon::prelude::*;

use crate::dds::compressor::{BlockCompressor, RangeFitCompressor};
use crate::dds::header::DdsHeader;
use crate::dds::payload::{build_payload, Payload};
use crate::dds::tile::{extract_tile, TileGrid};
use crate::dds::types::{DdsError, DxtFormat, HEADER_SIZE};
use crate::raster::Raster;

/// Result of a completed encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Raster width in texels.
    pub width: u32,
    /// Raster height in texels.
    pub height: u32,
    /// Format written to the header.
    pub format: DxtFormat,
    /// Number of tile payloads written.
    pub tiles: usize,
    /// Total container size, header included.
    pub bytes_written: usize,
}

impl fmt::Display for EncodeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encoded {}×{} {}: {} tiles, {} bytes",
            self.width, self.height, self.format, self.tiles, self.bytes_written
        )
    }
}

/// DDS encoder configuration.
///
/// # Example
///
/// ```
/// use dds_enc::dds::{DdsEncoder, DxtFormat};
///
/// let encoder = DdsEncoder::new(DxtFormat::Dxt5).with_parallel(true);
///
/// // 5×5 needs 2×2 tiles of 16 bytes each
/// assert_eq!(encoder.expected_size(5, 5), 128 + 4 * 16);
/// ```
#[derive(Clone)]
pub struct DdsEncoder {
    format: DxtFormat,
    compressor: Arc<dyn BlockCompressor>,
    parallel: bool,
}

impl DdsEncoder {
    /// Create a sequential encoder using the built-in [`RangeFitCompressor`].
    pub fn new(format: DxtFormat) -> Self {
        Self {
            format,
            compressor: Arc::new(RangeFitCompressor::new()),
            parallel: false,
        }
    }

    /// Replace the block compressor.
    pub fn with_compressor(mut self, compressor: Arc<dyn BlockCompressor>) -> Self {
        self.compressor = compressor;
        self
    }

    /// Compute each tile row's payloads on the rayon thread pool.
    ///
    /// Payloads are still written in row-major tile order, so the output is
    /// byte-identical to a sequential encode.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Get the compression format.
    pub fn format(&self) -> DxtFormat {
        self.format
    }

    /// Whether tile payloads are computed in parallel.
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Name of the configured block compressor.
    pub fn compressor_name(&self) -> &str {
        self.compressor.name()
    }

    /// Total container size for a `width`×`height` raster.
    pub fn expected_size(&self, width: u32, height: u32) -> usize {
        HEADER_SIZE + TileGrid::new(width, height).count() * self.format.payload_size()
    }

    /// Extract and compress the tile at `(tile_x, tile_y)`.
    pub fn encode_tile(&self, raster: &Raster, tile_x: u32, tile_y: u32) -> Payload {
        let tile = extract_tile(raster, tile_x, tile_y);
        build_payload(self.format, &tile, self.compressor.as_ref())
    }

    /// Write the header and every tile payload to `out`.
    ///
    /// # Errors
    ///
    /// The first failed write aborts the encode and is returned as
    /// [`DdsError::Io`]. Bytes already written are left in `out`.
    pub fn write_container<W: Write + ?Sized>(
        &self,
        out: &mut W,
        raster: &Raster,
    ) -> Result<EncodeSummary, DdsError> {
        let width = raster.width();
        let height = raster.height();
        let grid = TileGrid::new(width, height);

        tracing::debug!(
            width,
            height,
            format = %self.format,
            tiles = grid.count(),
            parallel = self.parallel,
            compressor = self.compressor.name(),
            "Encoding DDS container"
        );

        if self.format.is_premultiplied() {
            tracing::debug!(
                format = %self.format,
                "Format declares premultiplied color; pixels are written as given"
            );
        }

        DdsHeader::new(width, height, self.format)
            .write_to(out)
            .map_err(|e| {
                tracing::warn!(error = %e, "Failed to write DDS header");
                e
            })?;
        let mut bytes_written = HEADER_SIZE;

        if self.parallel {
            for tile_y in 0..grid.tiles_high {
                let row: Vec<Payload> = (0..grid.tiles_wide)
                    .into_par_iter()
                    .map(|tile_x| self.encode_tile(raster, tile_x, tile_y))
                    .collect();

                for payload in &row {
                    write_payload(out, payload, &mut bytes_written)?;
                }
            }
        } else {
            for (tile_x, tile_y) in grid.coords() {
                let payload = self.encode_tile(raster, tile_x, tile_y);
                write_payload(out, &payload, &mut bytes_written)?;
            }
        }

        let summary = EncodeSummary {
            width,
            height,
            format: self.format,
            tiles: grid.count(),
            bytes_written,
        };
        tracing::debug!(bytes = bytes_written, "DDS container written");

        Ok(summary)
    }

    /// Encode into an in-memory DDS file.
    pub fn encode(&self, raster: &Raster) -> Result<Vec<u8>, DdsError> {
        let mut output =
            Vec::with_capacity(self.expected_size(raster.width(), raster.height()));
        self.write_container(&mut output, raster)?;
        Ok(output)
    }
}

fn write_payload<W: Write + ?Sized>(
    out: &mut W,
    payload: &Payload,
    bytes_written: &mut usize,
) -> Result<(), DdsError> {
    out.write_all(payload.as_bytes()).map_err(|e| {
        tracing::warn!(offset = *bytes_written, error = %e, "Failed to write tile payload");
        DdsError::Io(e)
    })?;
    *bytes_written += payload.len();
    Ok(())
}

impl fmt::Debug for DdsEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DdsEncoder")
            .field("format", &self.format)
            .field("compressor", &self.compressor.name())
            .field("parallel", &self.parallel)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dds::compressor::CompressionQuality;
    use crate::dds::tile::{AlphaPlane, ColorBlock};
    use std::io;

    /// Encodes each tile's top-left red channel so tile order is visible.
    struct MarkerCompressor;

    impl BlockCompressor for MarkerCompressor {
        fn compress_color_block(
            &self,
            block: &ColorBlock,
            _use_alpha_blend: bool,
            _quality: CompressionQuality,
        ) -> [u8; 8] {
            [block[0][0]; 8]
        }

        fn compress_alpha_block(&self, alpha: &AlphaPlane) -> [u8; 8] {
            [alpha[0]; 8]
        }

        fn name(&self) -> &str {
            "marker"
        }
    }

    /// Accepts `remaining` bytes, then fails every write.
    struct FailingWriter {
        remaining: usize,
        written: Vec<u8>,
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.remaining == 0 {
                return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Raster whose red channel is the tile index at each tile's top-left.
    fn tile_index_raster(width: u32, height: u32) -> Raster {
        let tiles_wide = width.div_ceil(4);
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let index = (y / 4) * tiles_wide + x / 4;
                pixels.extend_from_slice(&[index as u8, 0, 0, 255]);
            }
        }
        Raster::new(width, height, pixels).unwrap()
    }

    fn solid_raster(width: u32, height: u32, texel: [u8; 4]) -> Raster {
        Raster::new(width, height, texel.repeat((width * height) as usize)).unwrap()
    }

    #[test]
    fn test_encoder_defaults() {
        let encoder = DdsEncoder::new(DxtFormat::Dxt1);
        assert_eq!(encoder.format(), DxtFormat::Dxt1);
        assert!(!encoder.is_parallel());
        assert_eq!(encoder.compressor_name(), "range-fit");
    }

    #[test]
    fn test_encoder_builder() {
        let encoder = DdsEncoder::new(DxtFormat::Dxt3)
            .with_compressor(Arc::new(MarkerCompressor))
            .with_parallel(true);
        assert!(encoder.is_parallel());
        assert_eq!(encoder.compressor_name(), "marker");
        assert!(format!("{:?}", encoder).contains("marker"));
    }

    #[test]
    fn test_expected_size() {
        assert_eq!(DdsEncoder::new(DxtFormat::Dxt1).expected_size(4, 4), 136);
        assert_eq!(DdsEncoder::new(DxtFormat::Dxt5).expected_size(5, 5), 192);
        assert_eq!(
            DdsEncoder::new(DxtFormat::Dxt1).expected_size(256, 256),
            128 + 32768
        );
        assert_eq!(
            DdsEncoder::new(DxtFormat::Dxt3).expected_size(100, 100),
            128 + 25 * 25 * 16
        );
    }

    #[test]
    fn test_encode_4x4_dxt1() {
        let raster = solid_raster(4, 4, [0, 0, 0, 255]);
        let dds = DdsEncoder::new(DxtFormat::Dxt1).encode(&raster).unwrap();

        assert_eq!(dds.len(), 128 + 8);
        assert_eq!(&dds[0..4], b"DDS ");
        assert_eq!(&dds[84..88], b"DXT1");
    }

    #[test]
    fn test_encode_5x5_dxt5() {
        let raster = solid_raster(5, 5, [10, 20, 30, 40]);
        let encoder = DdsEncoder::new(DxtFormat::Dxt5);

        let mut out = Vec::new();
        let summary = encoder.write_container(&mut out, &raster).unwrap();

        assert_eq!(out.len(), 192);
        assert_eq!(summary.tiles, 4);
        assert_eq!(summary.bytes_written, 192);
        assert_eq!(summary.to_string(), "Encoded 5×5 DXT5: 4 tiles, 192 bytes");
    }

    #[test]
    fn test_tiles_written_row_major() {
        let raster = tile_index_raster(12, 9);
        let encoder =
            DdsEncoder::new(DxtFormat::Dxt1).with_compressor(Arc::new(MarkerCompressor));

        let dds = encoder.encode(&raster).unwrap();
        let grid = TileGrid::new(12, 9);
        assert_eq!(dds.len(), 128 + grid.count() * 8);

        for (i, payload) in dds[128..].chunks(8).enumerate() {
            assert_eq!(payload, &[i as u8; 8], "tile {} out of order", i);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut pixels = Vec::new();
        for y in 0..37u32 {
            for x in 0..29u32 {
                pixels.extend_from_slice(&[
                    (x * 9) as u8,
                    (y * 7) as u8,
                    (x * y) as u8,
                    (x + y * 3) as u8,
                ]);
            }
        }
        let raster = Raster::new(29, 37, pixels).unwrap();

        for format in DxtFormat::ALL {
            let sequential = DdsEncoder::new(format).encode(&raster).unwrap();
            let parallel = DdsEncoder::new(format)
                .with_parallel(true)
                .encode(&raster)
                .unwrap();
            assert_eq!(sequential, parallel, "{} output differs", format);
        }
    }

    #[test]
    fn test_write_failure_in_header() {
        let raster = solid_raster(8, 8, [1, 2, 3, 4]);
        let mut out = FailingWriter {
            remaining: 10,
            written: Vec::new(),
        };

        let result = DdsEncoder::new(DxtFormat::Dxt1).write_container(&mut out, &raster);
        assert!(matches!(result, Err(DdsError::Io(_))));
        assert_eq!(out.written.len(), 10);
    }

    #[test]
    fn test_write_failure_mid_stream_keeps_partial_output() {
        let raster = solid_raster(16, 16, [1, 2, 3, 4]);
        let mut out = FailingWriter {
            remaining: 128 + 3 * 16,
            written: Vec::new(),
        };

        let result = DdsEncoder::new(DxtFormat::Dxt5)
            .with_parallel(true)
            .write_container(&mut out, &raster);

        match result {
            Err(DdsError::Io(e)) => assert_eq!(e.to_string(), "disk full"),
            other => panic!("Expected Io error, got {:?}", other),
        }
        assert_eq!(out.written.len(), 128 + 3 * 16);
        assert_eq!(&out.written[0..4], b"DDS ");
    }

    #[test]
    fn test_encode_tile_uses_clamped_samples() {
        let raster = tile_index_raster(6, 6);
        let encoder =
            DdsEncoder::new(DxtFormat::Dxt1).with_compressor(Arc::new(MarkerCompressor));

        // Tile (1,1) starts at (4,4), which belongs to tile index 3
        assert_eq!(encoder.encode_tile(&raster, 1, 1).as_bytes(), &[3u8; 8]);
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DdsEncoder>();
    }
}
