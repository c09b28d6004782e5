use std::io::Write;

use crate::lens_shading::common::error::Result;
use crate::lens_shading::emit::writer::GridWriter;
use crate::lens_shading::grid::types::GainGrid;

/// Writes the grid as a C array definition (`ls_table.h`).
pub struct HeaderGridWriter;

impl GridWriter for HeaderGridWriter {
    fn file_name(&self) -> &'static str {
        "ls_table.h"
    }

    fn write_grid(&self, grid: &GainGrid, output: &mut dyn Write) -> Result<()> {
        writeln!(output, "uint8_t ls_grid[] = {{")?;
        for channel in &grid.channels {
            writeln!(output, "//{} - Ch {}", channel.channel.label(), channel.source_plane)?;
            for gain in &channel.gains {
                write!(output, "{}, ", gain)?;
            }
        }
        writeln!(output, "}};")?;
        writeln!(output, "uint32_t ref_transform = {};", grid.transform)?;
        writeln!(output, "uint32_t grid_width = {};", grid.width)?;
        writeln!(output, "uint32_t grid_height = {};", grid.height)?;
        Ok(())
    }
}
