use tracing::debug;

use crate::lens_shading::common::error::{LensShadingError, Result};
use crate::lens_shading::raw::types::RawCapture;

pub(crate) const BRCM_MAGIC: &[u8; 4] = b"BRCM";

const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];

/// Distance of the BRCM block from the end of a JPEG+raw capture, per sensor
/// (ov5647, imx219, imx477), tried in this order.
const JPEG_TRAILER_OFFSETS: [usize; 3] = [6_404_096, 10_270_208, 18_711_040];

/// Finds the BRCM block in `buffer`.
///
/// Plain raw dumps carry the block at offset 0. Captures that start with a
/// JPEG image have the raw data appended, so the block sits a fixed,
/// sensor-dependent distance before the end of the buffer.
pub fn locate(buffer: &[u8]) -> Result<RawCapture<'_>> {
    if buffer.starts_with(&JPEG_SOI) {
        debug!("JPEG preamble detected, searching raw trailer");
        for trailer in JPEG_TRAILER_OFFSETS {
            let Some(offset) = buffer.len().checked_sub(trailer) else {
                continue;
            };
            if has_magic(buffer, offset) {
                debug!("BRCM block found {} bytes from end (offset {})", trailer, offset);
                return Ok(RawCapture::new(buffer, offset));
            }
        }
        return Err(LensShadingError::ContainerNotFound(buffer.len()));
    }

    if has_magic(buffer, 0) {
        Ok(RawCapture::new(buffer, 0))
    } else {
        Err(LensShadingError::ContainerNotFound(buffer.len()))
    }
}

fn has_magic(buffer: &[u8], offset: usize) -> bool {
    buffer.get(offset..offset + BRCM_MAGIC.len()) == Some(&BRCM_MAGIC[..])
}
