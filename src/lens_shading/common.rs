//! Common utilities module
//!
//! This module contains shared utilities used across the analysis stages.

pub mod error;

pub use error::{LensShadingError, Result};
