//! Error types for calotrack-core.

use thiserror::Error;

/// Result type alias for calotrack operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for reconstruction operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No track fitter was attached before running the track finder.
    #[error("a track fitter must be attached before running the track finder")]
    MissingFitter,

    /// Track parameters describe a null orientation vector.
    #[error("track orientation vector is null, distance is undefined")]
    DegenerateTrack,

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
