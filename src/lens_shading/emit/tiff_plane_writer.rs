use std::io::Write;

use tracing::debug;

use crate::lens_shading::common::error::{LensShadingError, Result};
use crate::lens_shading::config::PlaneCompression;
use crate::lens_shading::emit::writer::PlaneWriter;
use crate::lens_shading::raw::types::ChannelPlane;

/// Dumps corrected channel planes as 16-bit grayscale TIFF.
pub struct TiffPlaneWriter {
    pub compression: PlaneCompression,
}

impl TiffPlaneWriter {
    pub fn new(compression: PlaneCompression) -> Self {
        Self { compression }
    }
}

impl PlaneWriter for TiffPlaneWriter {
    fn file_name(&self, index: usize) -> String {
        format!("ch{}.tiff", index + 1)
    }

    fn write_plane(&self, plane: &ChannelPlane, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding channel plane: {}x{}", plane.width, plane.height);

        let mut buffer = Vec::new();

        let compression = match self.compression {
            PlaneCompression::None => tiff::encoder::Compression::Uncompressed,
            PlaneCompression::Lzw => tiff::encoder::Compression::Lzw,
            PlaneCompression::Deflate => tiff::encoder::Compression::Deflate(tiff::encoder::compression::DeflateLevel::Balanced),
        };

        let mut encoder = tiff::encoder::TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| LensShadingError::EncodeError(e.to_string()))?
            .with_compression(compression);

        encoder.write_image::<tiff::encoder::colortype::Gray16>(
            plane.width as u32,
            plane.height as u32,
            &plane.data,
        ).map_err(|e| LensShadingError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;

        debug!("Channel plane encoding complete");
        Ok(())
    }
}
