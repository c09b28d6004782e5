//! Capture decoding front end.
//!
//! Chains container location, header parsing, black level resolution and
//! unpacking into a single call so the pipeline can swap the whole stage
//! out in tests.

use tracing::{debug, info};

use crate::lens_shading::common::error::Result;
use crate::lens_shading::raw::container::locate;
use crate::lens_shading::raw::header::{SensorHeader, resolve_black_level};
use crate::lens_shading::raw::types::ChannelPlanes;
use crate::lens_shading::raw::unpack::unpack;
use crate::lens_shading::timing::{PipelineTimings, Stage};

/// Output of a decode: the validated header, the black level actually
/// applied, the corrected channel planes and the time each step took.
#[derive(Debug, Clone)]
pub struct DecodedCapture {
    pub header: SensorHeader,
    pub black_level: u32,
    pub planes: ChannelPlanes,
    pub timings: PipelineTimings,
}

pub trait CaptureDecoder {
    /// `black_level` of 0 selects the sensor model's default.
    fn decode(&self, data: &[u8], black_level: u32) -> Result<DecodedCapture>;
}

/// Decoder for BRCM raw captures, bare or appended to a JPEG.
pub struct BrcmDecoder;

impl CaptureDecoder for BrcmDecoder {
    fn decode(&self, data: &[u8], black_level: u32) -> Result<DecodedCapture> {
        debug!("Decoding BRCM capture, {} bytes", data.len());

        let mut timings = PipelineTimings::new();
        let capture = timings.time(Stage::Locate, || locate(data))?;
        let header = timings.time(Stage::Parse, || SensorHeader::parse(&capture))?;

        let black_level = resolve_black_level(black_level, &header.model);
        info!("Sensor type: {}", header.model);
        info!("Black level: {}", black_level);

        let planes = timings.time(Stage::Unpack, || unpack(&capture, &header, black_level))?;
        debug!(
            "Unpacked {} planes of {}x{}",
            planes.len(),
            header.plane_width(),
            header.plane_height()
        );

        Ok(DecodedCapture {
            header,
            black_level,
            planes,
            timings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens_shading::common::error::LensShadingError;
    use crate::lens_shading::raw::header::BitDepth;
    use crate::lens_shading::raw::test_support::CaptureBuilder;

    #[test]
    fn test_model_default_black_level() {
        let buffer = CaptureBuilder::new(8, 2, BitDepth::Raw10)
            .model("imx219")
            .pixels(|_, _| 64)
            .build();
        let decoded = BrcmDecoder.decode(&buffer, 0).unwrap();
        assert_eq!(decoded.black_level, 64);
        for stage in [Stage::Locate, Stage::Parse, Stage::Unpack] {
            assert!(decoded.timings.get(stage).is_some(), "{} not timed", stage);
        }
        assert!(decoded.planes.iter().all(|p| p.data.iter().all(|&v| v == 0)));
    }

    #[test]
    fn test_explicit_black_level() {
        let buffer = CaptureBuilder::new(8, 2, BitDepth::Raw12).model("imx477").build();
        let decoded = BrcmDecoder.decode(&buffer, 100).unwrap();
        assert_eq!(decoded.black_level, 100);
        assert_eq!(decoded.header.bits_per_sample(), 12);
    }

    #[test]
    fn test_not_a_capture() {
        let result = BrcmDecoder.decode(b"definitely not raw", 0);
        assert!(matches!(result, Err(LensShadingError::ContainerNotFound(_))));
    }
}
