//! Packed Bayer sample unpacking
//!
//! Splits each packed scanline into its two interleaved colour channels and
//! applies black-level correction to every sample on the way out.

use tracing::{debug, instrument};

use crate::lens_shading::common::error::{LensShadingError, Result};
use crate::lens_shading::raw::header::{BitDepth, SensorHeader};
use crate::lens_shading::raw::types::{ChannelPlane, ChannelPlanes, RawCapture};

/// Offset of the first scanline from the BRCM ident.
pub const PIXEL_DATA_OFFSET: usize = 32768;

/// Bytes per scanline, using the same rounding as the firmware.
pub fn scanline_stride(width: u16, padding_right: u16, bit_depth: BitDepth) -> usize {
    let multiplier = match bit_depth {
        BitDepth::Raw10 => 5,
        BitDepth::Raw12 => 6,
    };
    let packed = ((usize::from(width) + usize::from(padding_right)) * multiplier + 3) >> 2;
    (packed + 31) & !31
}

/// Subtracts the black level and stretches the remainder back to full range.
///
/// Evaluated in wrapping 32-bit unsigned arithmetic and truncated to 16 bits,
/// so samples below the black level wrap exactly like the firmware tooling.
/// `black_level` must be below `max_value`.
pub fn black_level_correct(raw: u16, black_level: u32, max_value: u16) -> u16 {
    let max_value = u32::from(max_value);
    let offset = u32::from(raw).wrapping_sub(black_level);
    (offset.wrapping_mul(max_value) / (max_value - black_level)) as u16
}

/// Walks the 4-pixel clusters of one packed scanline.
struct ClusterCursor<'a> {
    line: &'a [u8],
    pos: usize,
    bit_depth: BitDepth,
}

impl<'a> ClusterCursor<'a> {
    fn new(line: &'a [u8], bit_depth: BitDepth) -> Self {
        Self { line, pos: 0, bit_depth }
    }
}

impl Iterator for ClusterCursor<'_> {
    /// Raw samples in sensor order: channel a, b, a, b
    type Item = [u16; 4];

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.bit_depth.cluster_bytes();
        let c = self.line.get(self.pos..self.pos + len)?;
        self.pos += len;

        let mut wide = [0u16; 6];
        for (w, &b) in wide.iter_mut().zip(c) {
            *w = u16::from(b);
        }
        let c = wide;
        Some(match self.bit_depth {
            BitDepth::Raw10 => {
                let lsbs = c[4];
                [
                    (c[0] << 2) | ((lsbs >> 6) & 0x3),
                    (c[1] << 2) | ((lsbs >> 4) & 0x3),
                    (c[2] << 2) | ((lsbs >> 2) & 0x3),
                    (c[3] << 2) | (lsbs & 0x3),
                ]
            }
            BitDepth::Raw12 => [
                (c[0] << 4) | (c[2] >> 4),
                (c[1] << 4) | (c[2] & 0x0F),
                (c[3] << 4) | (c[5] >> 4),
                (c[4] << 4) | (c[5] & 0x0F),
            ],
        })
    }
}

/// Unpacks the capture into four black-level corrected channel planes.
///
/// Every scanline is bounds checked against the buffer before any sample is
/// written; a header that claims more data than the capture holds yields
/// `BufferUnderrun`.
#[instrument(skip_all, fields(width = header.width, height = header.height, black_level = black_level))]
pub fn unpack(capture: &RawCapture<'_>, header: &SensorHeader, black_level: u32) -> Result<ChannelPlanes> {
    let bit_depth = header.bit_depth;
    let max_value = header.max_sample_value();
    if black_level >= u32::from(max_value) {
        return Err(LensShadingError::InvalidConfiguration(format!(
            "black level {} must be below the maximum sample value {}",
            black_level, max_value
        )));
    }

    let stride = scanline_stride(header.width, header.padding_right, bit_depth);
    let plane_width = header.plane_width();
    let plane_height = header.plane_height();
    let rows = plane_height * 2;
    let line_bytes = usize::from(header.width).div_ceil(4) * bit_depth.cluster_bytes();
    debug!(
        "Stride {} bytes, {} bytes packed per line, planes {}x{}",
        stride, line_bytes, plane_width, plane_height
    );

    let bytes = capture.bytes();
    if rows > 0 {
        let needed = PIXEL_DATA_OFFSET + (rows - 1) * stride + line_bytes;
        if needed > bytes.len() {
            return Err(LensShadingError::BufferUnderrun {
                needed: capture.offset() + needed,
                available: capture.len(),
            });
        }
    }

    let mut planes: ChannelPlanes = std::array::from_fn(|_| ChannelPlane::new(plane_width, plane_height));

    for y in 0..rows {
        let start = PIXEL_DATA_OFFSET + y * stride;
        let line = bytes
            .get(start..start + line_bytes)
            .ok_or(LensShadingError::BufferUnderrun {
                needed: capture.offset() + start + line_bytes,
                available: capture.len(),
            })?;

        let (even, odd) = planes.split_at_mut(2);
        let pair = if y & 1 == 0 { even } else { odd };
        let (chan_a, chan_b) = pair.split_at_mut(1);
        let row_offset = (y >> 1) * plane_width;
        let a_line = &mut chan_a[0].data[row_offset..row_offset + plane_width];
        let b_line = &mut chan_b[0].data[row_offset..row_offset + plane_width];

        for (cluster, samples) in ClusterCursor::new(line, bit_depth).enumerate() {
            for (i, pixel) in samples.into_iter().enumerate() {
                let col = cluster * 2 + i / 2;
                if col >= plane_width {
                    break;
                }
                let value = black_level_correct(pixel, black_level, max_value);
                if i % 2 == 0 {
                    a_line[col] = value;
                } else {
                    b_line[col] = value;
                }
            }
        }
    }

    Ok(planes)
}
