use std::io::Write;

use crate::lens_shading::common::error::{LensShadingError, Result};
use crate::lens_shading::emit::writer::GridWriter;
use crate::lens_shading::grid::types::{Channel, ChannelGains, GainGrid};

/// Length of the transform, width, height prefix.
const PREFIX_LEN: usize = 12;

/// Writes the compact binary table (`ls.bin`): little-endian `u32`
/// transform, grid width and grid height, then one byte per cell for each
/// channel in R, Gr, Gb, B order.
pub struct BinaryGridWriter;

impl GridWriter for BinaryGridWriter {
    fn file_name(&self) -> &'static str {
        "ls.bin"
    }

    fn write_grid(&self, grid: &GainGrid, output: &mut dyn Write) -> Result<()> {
        let mut buffer = Vec::with_capacity(PREFIX_LEN + grid.cell_count() * 4);
        for field in [grid.transform, grid.width as u32, grid.height as u32] {
            buffer.extend_from_slice(&field.to_le_bytes());
        }
        for channel in &grid.channels {
            buffer.extend_from_slice(&channel.gains);
        }
        output.write_all(&buffer)?;
        Ok(())
    }
}

/// Reads back a table written by [`BinaryGridWriter`].
///
/// The format carries no bayer order, so `source_plane` is reported as the
/// identity mapping.
pub fn decode_binary_grid(data: &[u8]) -> Result<GainGrid> {
    let field = |at: usize| -> Result<u32> {
        data.get(at..at + 4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .ok_or_else(|| LensShadingError::DecodeError(format!("truncated prefix ({} bytes)", data.len())))
    };
    let transform = field(0)?;
    let width = field(4)? as usize;
    let height = field(8)? as usize;

    let (cells, expected) = width
        .checked_mul(height)
        .and_then(|cells| Some((cells, cells.checked_mul(4)?.checked_add(PREFIX_LEN)?)))
        .ok_or_else(|| LensShadingError::DecodeError(format!("grid {}x{} is too large", width, height)))?;
    if data.len() != expected {
        return Err(LensShadingError::DecodeError(format!(
            "expected {} bytes for a {}x{} grid, found {}",
            expected,
            width,
            height,
            data.len()
        )));
    }

    let body = &data[PREFIX_LEN..];
    let channels = Channel::ALL.map(|channel| {
        let start = channel.index() * cells;
        ChannelGains {
            channel,
            source_plane: channel.index(),
            gains: body[start..start + cells].to_vec(),
        }
    });

    Ok(GainGrid {
        width,
        height,
        transform,
        channels,
    })
}
