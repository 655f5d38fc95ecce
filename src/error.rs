use std::path::PathBuf;

/// Everything that can go wrong at the boundary of the detector.
///
/// The per-pixel model itself has no failure modes; these variants describe
/// frames, parameters, or files the caller handed in.
#[derive(Debug, thiserror::Error)]
pub enum DetectorError {
    #[error(
        "Dimension mismatch: expected {expected_width}x{expected_height}, got {actual_width}x{actual_height}"
    )]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Detector service is no longer running")]
    ServiceClosed,

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, DetectorError>;
