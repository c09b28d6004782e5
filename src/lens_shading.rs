//! Lens shading analysis module
//!
//! Turns a single BRCM raw capture into a per-channel gain grid that
//! flattens lens vignetting. Stages are split into raw decoding, grid
//! computation, emission and the orchestrating pipeline.

pub mod common;
pub mod config;
pub mod conversions;
pub mod emit;
pub mod grid;
pub mod raw;
pub mod timing;

pub use common::{
    LensShadingError,
    Result,
};

pub use config::{
    AnalysisConfig,
    AnalysisConfigBuilder,
    OutputFormats,
    PlaneCompression,
};

pub use raw::{
    BayerOrder,
    BitDepth,
    BrcmDecoder,
    CaptureDecoder,
    ChannelPlane,
    ChannelPlanes,
    DecodedCapture,
    RawCapture,
    SensorHeader,
};

pub use grid::{
    BlockGrid,
    Channel,
    ChannelGains,
    GainGrid,
};

pub use emit::{
    BinaryGridWriter,
    GridWriter,
    HeaderGridWriter,
    PlaneWriter,
    TextGridWriter,
    TiffPlaneWriter,
};

pub use conversions::{
    Analysis,
    LensShadingPipeline,
};

pub use timing::{PipelineTimings, Stage};
