//! BRCM raw capture decoding module
//!
//! Locates the BRCM block inside a capture, parses its sensor header and
//! unpacks the packed Bayer samples into four channel planes.

mod container;
mod decoder;
pub mod header;
pub mod types;
pub mod unpack;

#[cfg(test)]
pub(crate) mod test_support;

pub use container::locate;
pub use decoder::{BrcmDecoder, CaptureDecoder, DecodedCapture};
pub use header::{BayerOrder, BitDepth, SensorHeader};
pub use types::{ChannelPlane, ChannelPlanes, RawCapture};
pub use unpack::unpack;
