//! Raw capture data types

/// Borrowed view over a capture buffer, anchored at the BRCM block.
#[derive(Debug, Clone, Copy)]
pub struct RawCapture<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> RawCapture<'a> {
    pub(crate) fn new(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    /// Byte offset of the BRCM block within the input buffer
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Total length of the input buffer
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Bytes from the start of the BRCM block to the end of the buffer
    pub fn bytes(&self) -> &'a [u8] {
        &self.data[self.offset..]
    }
}

/// One corrected single-colour plane at half the sensor resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPlane {
    /// Width of the plane in pixels
    pub width: usize,
    /// Height of the plane in pixels
    pub height: usize,
    /// Black-level corrected samples, row-major
    pub data: Vec<u16>,
}

impl ChannelPlane {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0u16; width * height],
        }
    }

    pub fn row(&self, y: usize) -> &[u16] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn get(&self, y: usize, x: usize) -> u16 {
        self.data[y * self.width + x]
    }
}

/// The four planes in physical order: even sensor rows feed planes 0 and 1,
/// odd rows feed planes 2 and 3.
pub type ChannelPlanes = [ChannelPlane; 4];
