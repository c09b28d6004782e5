//! Analysis configuration types

use crate::lens_shading::common::error::{LensShadingError, Result};

/// Default side of the sampling window, in plane pixels.
pub const DEFAULT_CELL_SIZE: usize = 4;

/// Largest sampling window, one full grid cell.
pub const MAX_CELL_SIZE: u8 = 32;

/// Compression used for the per-channel TIFF dumps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneCompression {
    /// No compression (fastest, largest file)
    None,
    /// LZW compression
    Lzw,
    /// Deflate compression, balanced level
    Deflate,
}

/// Artifacts written by a run. Mirrors the `-o` bitmask of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormats {
    /// `ls_table.h`, bit 1
    pub header: bool,
    /// `ls.bin`, bit 2
    pub binary: bool,
    /// `ls_table.txt`, bit 4
    pub text: bool,
    /// `ch1.tiff`..`ch4.tiff`, bit 8
    pub channel_data: bool,
}

impl OutputFormats {
    pub const HEADER: u8 = 0x01;
    pub const BINARY: u8 = 0x02;
    pub const TEXT: u8 = 0x04;
    pub const CHANNEL_DATA: u8 = 0x08;

    pub fn from_mask(mask: u8) -> Result<Self> {
        if mask & 0x0F == 0 {
            return Err(LensShadingError::InvalidConfiguration(format!(
                "output format {} selects nothing",
                mask
            )));
        }
        Ok(Self {
            header: mask & Self::HEADER != 0,
            binary: mask & Self::BINARY != 0,
            text: mask & Self::TEXT != 0,
            channel_data: mask & Self::CHANNEL_DATA != 0,
        })
    }

    pub fn mask(&self) -> u8 {
        let mut mask = 0;
        if self.header {
            mask |= Self::HEADER;
        }
        if self.binary {
            mask |= Self::BINARY;
        }
        if self.text {
            mask |= Self::TEXT;
        }
        if self.channel_data {
            mask |= Self::CHANNEL_DATA;
        }
        mask
    }
}

impl Default for OutputFormats {
    fn default() -> Self {
        Self {
            header: true,
            binary: false,
            text: false,
            channel_data: false,
        }
    }
}

/// Brings a requested analysis cell size into range.
///
/// Sizes from 1 to 32 are accepted and odd sizes are bumped to the next even
/// value; 0 and anything above 32 are rejected.
pub fn normalize_cell_size(size: u8) -> Result<usize> {
    if size == 0 || size > MAX_CELL_SIZE {
        return Err(LensShadingError::InvalidConfiguration(format!(
            "analysis cell size {} out of range (1-{})",
            size, MAX_CELL_SIZE
        )));
    }
    Ok(usize::from(size + size % 2))
}

/// Configuration for a lens shading analysis run
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Black level override; 0 uses the sensor model's default
    pub black_level: u32,
    /// Sampling window side, always even and within 2..=32
    pub cell_size: usize,
    /// Artifacts to emit
    pub outputs: OutputFormats,
    /// Compression for channel dumps
    pub plane_compression: PlaneCompression,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            black_level: 0,
            cell_size: DEFAULT_CELL_SIZE,
            outputs: OutputFormats::default(),
            plane_compression: PlaneCompression::None,
        }
    }
}

impl AnalysisConfig {
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }
}

/// Builder for AnalysisConfig
#[derive(Default)]
pub struct AnalysisConfigBuilder {
    black_level: Option<u32>,
    cell_size: Option<u8>,
    output_mask: Option<u8>,
    plane_compression: Option<PlaneCompression>,
}

impl AnalysisConfigBuilder {
    pub fn black_level(mut self, black_level: u32) -> Self {
        self.black_level = Some(black_level);
        self
    }

    pub fn cell_size(mut self, size: u8) -> Self {
        self.cell_size = Some(size);
        self
    }

    pub fn output_mask(mut self, mask: u8) -> Self {
        self.output_mask = Some(mask);
        self
    }

    pub fn outputs(mut self, outputs: OutputFormats) -> Self {
        self.output_mask = Some(outputs.mask());
        self
    }

    pub fn plane_compression(mut self, compression: PlaneCompression) -> Self {
        self.plane_compression = Some(compression);
        self
    }

    pub fn build(self) -> Result<AnalysisConfig> {
        let default = AnalysisConfig::default();
        Ok(AnalysisConfig {
            black_level: self.black_level.unwrap_or(default.black_level),
            cell_size: match self.cell_size {
                Some(size) => normalize_cell_size(size)?,
                None => default.cell_size,
            },
            outputs: match self.output_mask {
                Some(mask) => OutputFormats::from_mask(mask)?,
                None => default.outputs,
            },
            plane_compression: self.plane_compression.unwrap_or(default.plane_compression),
        })
    }
}
