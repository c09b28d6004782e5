use std::io::Write;

use crate::lens_shading::common::error::Result;
use crate::lens_shading::emit::writer::GridWriter;
use crate::lens_shading::grid::aggregate::GRID_PITCH;
use crate::lens_shading::grid::types::GainGrid;

/// Writes one `x y gain channel` line per cell (`ls_table.txt`), where `x`
/// and `y` are the plane coordinates of the cell centre.
pub struct TextGridWriter;

impl GridWriter for TextGridWriter {
    fn file_name(&self) -> &'static str {
        "ls_table.txt"
    }

    fn write_grid(&self, grid: &GainGrid, output: &mut dyn Write) -> Result<()> {
        for (index, channel) in grid.channels.iter().enumerate() {
            for (cell, gain) in channel.gains.iter().enumerate() {
                let x = cell % grid.width;
                let y = cell / grid.width;
                writeln!(
                    output,
                    "{} {} {} {}",
                    x * GRID_PITCH + GRID_PITCH / 2,
                    y * GRID_PITCH + GRID_PITCH / 2,
                    gain,
                    index
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_shading::emit::binary_writer::tests::sample_grid;

    #[test]
    fn test_text_listing() {
        let mut output = Vec::new();
        TextGridWriter.write_grid(&sample_grid(), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "16 16 32 0");
        assert_eq!(lines[1], "48 16 40 0");
        assert_eq!(lines[7], "48 16 43 3");
    }
}
