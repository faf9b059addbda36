//! DDS format types and error definitions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Size of the magic plus the DDS header record, in bytes.
pub const HEADER_SIZE: usize = 128;

/// DXT compression format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DxtFormat {
    /// BC1, color only.
    Dxt1,
    /// BC2 with premultiplied color, explicit 4-bit alpha.
    Dxt2,
    /// BC2, explicit 4-bit alpha.
    Dxt3,
    /// BC3 with premultiplied color, interpolated alpha.
    Dxt4,
    /// BC3, interpolated alpha.
    Dxt5,
}

impl DxtFormat {
    /// Every supported format, in fourcc order.
    pub const ALL: [DxtFormat; 5] = [
        DxtFormat::Dxt1,
        DxtFormat::Dxt2,
        DxtFormat::Dxt3,
        DxtFormat::Dxt4,
        DxtFormat::Dxt5,
    ];

    /// The four-character code written into the header.
    pub fn fourcc(self) -> [u8; 4] {
        match self {
            DxtFormat::Dxt1 => *b"DXT1",
            DxtFormat::Dxt2 => *b"DXT2",
            DxtFormat::Dxt3 => *b"DXT3",
            DxtFormat::Dxt4 => *b"DXT4",
            DxtFormat::Dxt5 => *b"DXT5",
        }
    }

    /// Compressed bytes per 4×4 tile.
    pub fn payload_size(self) -> usize {
        match self {
            DxtFormat::Dxt1 => 8,
            _ => 16,
        }
    }

    /// Whether the format declares premultiplied color.
    pub fn is_premultiplied(self) -> bool {
        matches!(self, DxtFormat::Dxt2 | DxtFormat::Dxt4)
    }

    /// The uppercase format name, e.g. `"DXT3"`.
    pub fn name(self) -> &'static str {
        match self {
            DxtFormat::Dxt1 => "DXT1",
            DxtFormat::Dxt2 => "DXT2",
            DxtFormat::Dxt3 => "DXT3",
            DxtFormat::Dxt4 => "DXT4",
            DxtFormat::Dxt5 => "DXT5",
        }
    }
}

impl fmt::Display for DxtFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DxtFormat {
    type Err = DdsError;

    /// Parse a format name, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_uppercase();
        DxtFormat::ALL
            .into_iter()
            .find(|format| format.name() == normalized)
            .ok_or_else(|| DdsError::UnknownFormat(s.to_string()))
    }
}

/// Errors that can occur during DDS encoding.
#[derive(Debug, Error)]
pub enum DdsError {
    /// Format name is not one of DXT1-DXT5.
    #[error("Unknown format '{0}' (expected one of dxt1, dxt2, dxt3, dxt4, dxt5)")]
    UnknownFormat(String),

    /// Writing to the output failed.
    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}
