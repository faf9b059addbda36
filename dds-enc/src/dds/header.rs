//! DDS header construction.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! offset 0   magic "DDS "
//! offset 4   u32 record size (124)
//! offset 8   u32 flags (caps | height | width | pixel format)
//! offset 12  u32 height
//! offset 16  u32 width
//! offset 20  14 × u32 reserved
//! offset 76  pixel format record (32 bytes)
//! offset 108 u32 caps (texture)
//! offset 112 4 × u32 reserved
//! ```

use std::io::{self, Write};

use crate::dds::types::{DxtFormat, HEADER_SIZE};

// DDS header flags (DDSD_*)
pub const DDSD_CAPS: u32 = 0x1;
pub const DDSD_HEIGHT: u32 = 0x2;
pub const DDSD_WIDTH: u32 = 0x4;
pub const DDSD_PIXELFORMAT: u32 = 0x1000;

// DDS pixel format flags (DDPF_*)
pub const DDPF_FOURCC: u32 = 0x4;

// DDS caps flags (DDSCAPS_*)
pub const DDSCAPS_TEXTURE: u32 = 0x1000;

const HEADER_RECORD_SIZE: u32 = 124;
const PIXEL_FORMAT_RECORD_SIZE: u32 = 32;

/// DDS file header, magic included (128 bytes once serialized).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsHeader {
    /// Magic number: "DDS "
    pub magic: [u8; 4],
    /// Size of the header record (124)
    pub size: u32,
    /// Flags indicating which fields are valid
    pub flags: u32,
    /// Surface height in texels
    pub height: u32,
    /// Surface width in texels
    pub width: u32,
    /// Pitch, depth, mipmap count and the reserved block, all zero
    pub reserved1: [u32; 14],
    /// Pixel format record
    pub pixel_format: DdsPixelFormat,
    /// Surface capabilities
    pub caps: u32,
    /// caps2-caps4 and the trailing reserved word, all zero
    pub reserved2: [u32; 4],
}

/// DDS pixel format record (32 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdsPixelFormat {
    /// Size of the record (32)
    pub size: u32,
    /// Pixel format flags
    pub flags: u32,
    /// FourCC code, e.g. "DXT1"
    pub fourcc: [u8; 4],
    /// Bit count and channel masks, unused for compressed formats
    pub reserved: [u32; 5],
}

impl DdsHeader {
    /// Create a header for a single-surface texture.
    ///
    /// Dimensions are stored exactly as given, whether or not they are
    /// multiples of 4.
    pub fn new(width: u32, height: u32, format: DxtFormat) -> Self {
        DdsHeader {
            magic: *b"DDS ",
            size: HEADER_RECORD_SIZE,
            flags: DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT,
            height,
            width,
            reserved1: [0; 14],
            pixel_format: DdsPixelFormat {
                size: PIXEL_FORMAT_RECORD_SIZE,
                flags: DDPF_FOURCC,
                fourcc: format.fourcc(),
                reserved: [0; 5],
            },
            caps: DDSCAPS_TEXTURE,
            reserved2: [0; 4],
        }
    }

    /// Serialize the header into `out`.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        out.write_all(&self.to_bytes())
    }

    /// Convert header to its 128-byte on-disk form.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = Vec::with_capacity(HEADER_SIZE);

        bytes.extend_from_slice(&self.magic);
        bytes.extend_from_slice(&self.size.to_le_bytes());
        bytes.extend_from_slice(&self.flags.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        for &val in &self.reserved1 {
            bytes.extend_from_slice(&val.to_le_bytes());
        }

        bytes.extend_from_slice(&self.pixel_format.size.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.flags.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.fourcc);
        for &val in &self.pixel_format.reserved {
            bytes.extend_from_slice(&val.to_le_bytes());
        }

        bytes.extend_from_slice(&self.caps.to_le_bytes());
        for &val in &self.reserved2 {
            bytes.extend_from_slice(&val.to_le_bytes());
        }

        let mut out = [0u8; HEADER_SIZE];
        out.copy_from_slice(&bytes);
        out
    }
}
