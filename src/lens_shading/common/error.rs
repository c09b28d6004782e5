use thiserror::Error;

#[derive(Error, Debug)]
pub enum LensShadingError {
    #[error("Raw capture missing BRCM header ({0} bytes searched)")]
    ContainerNotFound(usize),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Capture truncated: needed {needed} bytes, buffer holds {available}")]
    BufferUnderrun { needed: usize, available: usize },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed to read input file: {0}")]
    InputReadError(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode channel plane: {0}")]
    EncodeError(String),

    #[error("Failed to decode gain grid: {0}")]
    DecodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LensShadingError>;
