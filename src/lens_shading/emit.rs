//! Grid emission module
//!
//! Serialises gain grids to the formats consumed by camera tooling and dumps
//! the corrected channel planes for inspection.

mod binary_writer;
mod header_writer;
mod text_writer;
mod tiff_plane_writer;
mod writer;

pub use binary_writer::{BinaryGridWriter, decode_binary_grid};
pub use header_writer::HeaderGridWriter;
pub use text_writer::TextGridWriter;
pub use tiff_plane_writer::TiffPlaneWriter;
pub use writer::{GridWriter, PlaneWriter};
