use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// No usable colour source, or an inconsistent loader setup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input array does not have the expected channel layout.
    #[error("shape error: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },

    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load image from {}: {source}", .path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("index {index} out of bounds for dataset of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Only raised when strict colour matching is enabled.
    #[error("{count} pixels match no registered colour")]
    UnmatchedPixels { count: usize },

    #[error("array error: {0}")]
    Array(#[from] ndarray::ShapeError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Error::Configuration(msg.into())
    }

    pub(crate) fn channels(expected: usize, actual: &[usize]) -> Self {
        Error::Shape {
            expected: format!("{} channels in the last dimension", expected),
            actual: format!("shape {:?}", actual),
        }
    }
}
