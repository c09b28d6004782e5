//! Pipeline orchestration module
//!
//! Drives a capture through decoding, grid computation and emission.

mod analyse;


pub use analyse::{Analysis, LensShadingPipeline};
