//! Grid data types

/// Logical output channel. Emission order is always R, Gr, Gb, B.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    R,
    Gr,
    Gb,
    B,
}

impl Channel {
    pub const ALL: [Channel; 4] = [Channel::R, Channel::Gr, Channel::Gb, Channel::B];

    pub fn label(self) -> &'static str {
        match self {
            Channel::R => "R",
            Channel::Gr => "Gr",
            Channel::Gb => "Gb",
            Channel::B => "B",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

/// Per-cell block values of one channel plane
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockGrid {
    /// Cells per row
    pub width: usize,
    /// Cells per column
    pub height: usize,
    /// Block values, row-major, never zero
    pub cells: Vec<u32>,
    /// Largest block value before zero clamping
    pub max_value: u32,
}

/// Gains for one logical channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGains {
    pub channel: Channel,
    /// Physical plane the gains were derived from
    pub source_plane: usize,
    /// Fixed-point gains (32 = x1.0), row-major
    pub gains: Vec<u8>,
}

/// The lens shading table handed to the emitters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GainGrid {
    pub width: usize,
    pub height: usize,
    /// Opaque transform copied from the sensor header
    pub transform: u32,
    /// Channels in R, Gr, Gb, B order
    pub channels: [ChannelGains; 4],
}

impl GainGrid {
    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }
}
