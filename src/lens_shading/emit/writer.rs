use std::io::Write;

use crate::lens_shading::common::error::Result;
use crate::lens_shading::grid::types::GainGrid;
use crate::lens_shading::raw::types::ChannelPlane;

pub trait GridWriter {
    /// Default file name for this format
    fn file_name(&self) -> &'static str;
    fn write_grid(&self, grid: &GainGrid, output: &mut dyn Write) -> Result<()>;
}

pub trait PlaneWriter {
    /// File name for the physical plane at `index`
    fn file_name(&self, index: usize) -> String;
    fn write_plane(&self, plane: &ChannelPlane, output: &mut dyn Write) -> Result<()>;
}
