//! This module defines the custom error type `Error` used throughout the conversion,
//! as well as various error message constants.
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Error decoding image '{input}': {reason}")]
    ImageDecode { input: String, reason: String },
    #[error("Invalid dimension: {0}")]
    InvalidDimension(String),
    #[error("Grid shape error: {width}x{height} is not a multiple of the 2x4 block size")]
    Shape { width: u32, height: u32 },
    #[error("No glyph mapped for dot pattern '{0}'")]
    UnknownPattern(String),
    #[error("Error loading mapping '{path}': {reason}")]
    MappingLoad { path: String, reason: String },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn decode(input: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Error::ImageDecode {
            input: input.into(),
            reason: reason.to_string(),
        }
    }
}

/// Error message for issues related to fetching a remote image.
pub const ERROR_FETCHING_URL: &str = "Cannot fetch image";
/// Error message for issues related to resizing an image.
pub const ERROR_RESIZE: &str = "Image resizing error";
/// Error message for issues related to pixel buffers.
pub const ERROR_DATA: &str = "Data error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_offending_input() {
        let err = Error::UnknownPattern("BLANK".to_string());
        assert_eq!(err.to_string(), "No glyph mapped for dot pattern 'BLANK'");

        let err = Error::decode("cat.png", "truncated");
        assert!(err.to_string().starts_with("Error decoding image 'cat.png'"));
    }

    #[test]
    fn test_io_error_converts() {
        let err: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
        assert!(matches!(err, Error::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
        assert_eq!(err.to_string(), "I/O error: gone");
    }
}
