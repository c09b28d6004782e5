//! BRCM sensor header parsing
//!
//! The header record sits 0xB0 bytes past the `BRCM` ident and is laid out
//! little-endian as:
//!
//! ```text
//! name[32] width:u16 height:u16 padding_right:u16 padding_down:u16
//! reserved:[u32; 6] transform:u16 format:u16 bayer_order:u8 bayer_format:u8
//! ```

use std::fmt;

use tracing::info;

use crate::lens_shading::common::error::{LensShadingError, Result};
use crate::lens_shading::raw::types::RawCapture;

/// Offset of the header record from the `BRCM` ident.
pub const HEADER_OFFSET: usize = 0xB0;

/// Size of the header record in bytes.
pub const HEADER_LEN: usize = 70;

/// Offset and length of the sensor model name within the BRCM block.
const MODEL_OFFSET: usize = 16;
const MODEL_LEN: usize = 6;

const NAME_LEN: usize = 32;

/// Image format tag for Bayer data (`VC_IMAGE_BAYER`).
pub const FORMAT_BAYER: u16 = 33;

/// Black level used for sensors missing from the model table.
pub const DEFAULT_BLACK_LEVEL: u32 = 16;

/// Colour filter layout of the top-left 2x2 tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerOrder {
    Rggb,
    Gbrg,
    Bggr,
    Grbg,
}

impl BayerOrder {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(BayerOrder::Rggb),
            1 => Some(BayerOrder::Gbrg),
            2 => Some(BayerOrder::Bggr),
            3 => Some(BayerOrder::Grbg),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for BayerOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BayerOrder::Rggb => "RGGB",
            BayerOrder::Gbrg => "GBRG",
            BayerOrder::Bggr => "BGGR",
            BayerOrder::Grbg => "GRBG",
        };
        f.write_str(name)
    }
}

/// Packing of the Bayer samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// 4 pixels in 5 bytes
    Raw10,
    /// 4 pixels in 6 bytes
    Raw12,
}

impl BitDepth {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            3 => Some(BitDepth::Raw10),
            4 => Some(BitDepth::Raw12),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            BitDepth::Raw10 => 3,
            BitDepth::Raw12 => 4,
        }
    }

    pub fn bits_per_sample(self) -> u32 {
        u32::from(self.tag()) * 2 + 4
    }

    pub fn max_sample_value(self) -> u16 {
        ((1u32 << self.bits_per_sample()) - 1) as u16
    }

    /// Bytes holding one cluster of 4 packed pixels
    pub fn cluster_bytes(self) -> usize {
        match self {
            BitDepth::Raw10 => 5,
            BitDepth::Raw12 => 6,
        }
    }
}

/// Parsed BRCM sensor header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorHeader {
    /// Sensor model, e.g. `imx219`
    pub model: String,
    /// Sensor mode name from the header record
    pub mode_name: String,
    pub width: u16,
    pub height: u16,
    pub padding_right: u16,
    pub padding_down: u16,
    /// Opaque transform, forwarded to the emitted grid
    pub transform: u16,
    pub format: u16,
    pub bayer_order: BayerOrder,
    pub bit_depth: BitDepth,
}

impl SensorHeader {
    /// Parses and validates the header of a located capture.
    ///
    /// Fails with `UnsupportedFormat` unless the record describes RAW10 or
    /// RAW12 Bayer data with a known bayer order.
    pub fn parse(capture: &RawCapture<'_>) -> Result<Self> {
        let bytes = capture.bytes();
        let record = bytes
            .get(HEADER_OFFSET..HEADER_OFFSET + HEADER_LEN)
            .ok_or(LensShadingError::BufferUnderrun {
                needed: capture.offset() + HEADER_OFFSET + HEADER_LEN,
                available: capture.len(),
            })?;

        let model = bytes
            .get(MODEL_OFFSET..MODEL_OFFSET + MODEL_LEN)
            .map(c_string)
            .unwrap_or_default();
        let mode_name = c_string(&record[..NAME_LEN]);

        let width = read_u16(record, 32);
        let height = read_u16(record, 34);
        let padding_right = read_u16(record, 36);
        let padding_down = read_u16(record, 38);
        let transform = read_u16(record, 64);
        let format = read_u16(record, 66);
        let bayer_order_tag = record[68];
        let bayer_format_tag = record[69];

        info!(
            "Header decoding: mode {}, width {}, height {}, padding {} {}",
            mode_name, width, height, padding_right, padding_down
        );
        info!(
            "transform {}, image format {}, bayer order {}, bayer format {}",
            transform, format, bayer_order_tag, bayer_format_tag
        );

        let bit_depth = match BitDepth::from_tag(bayer_format_tag) {
            Some(depth) if format == FORMAT_BAYER => depth,
            _ => {
                return Err(LensShadingError::UnsupportedFormat(format!(
                    "raw file is not Bayer raw10 or raw12 (format {}, bayer format {})",
                    format, bayer_format_tag
                )));
            }
        };
        let bayer_order = BayerOrder::from_tag(bayer_order_tag).ok_or_else(|| {
            LensShadingError::UnsupportedFormat(format!("unknown bayer order {}", bayer_order_tag))
        })?;

        Ok(Self {
            model,
            mode_name,
            width,
            height,
            padding_right,
            padding_down,
            transform,
            format,
            bayer_order,
            bit_depth,
        })
    }

    pub fn bits_per_sample(&self) -> u32 {
        self.bit_depth.bits_per_sample()
    }

    pub fn max_sample_value(&self) -> u16 {
        self.bit_depth.max_sample_value()
    }

    pub fn plane_width(&self) -> usize {
        usize::from(self.width) / 2
    }

    pub fn plane_height(&self) -> usize {
        usize::from(self.height) / 2
    }
}

/// Black level of a known sensor model, or the generic default.
pub fn default_black_level(model: &str) -> u32 {
    match model {
        "imx219" => 64,
        "ov5647" => 16,
        "imx477" | "testc" => 257,
        _ => DEFAULT_BLACK_LEVEL,
    }
}

/// A non-zero override wins over the model table.
pub fn resolve_black_level(black_level: u32, model: &str) -> u32 {
    if black_level != 0 {
        black_level
    } else {
        default_black_level(model)
    }
}

fn read_u16(record: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([record[at], record[at + 1]])
}

fn c_string(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}
