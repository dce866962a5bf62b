//! Error type definitions for the playlist transformer
//!
//! This module defines the error hierarchy shared by the parser, the source
//! adapters, configuration loading and the pipeline.

use thiserror::Error;

use crate::pipeline::error::PipelineError;

/// Top-level application error type
///
/// Wraps the layer-specific errors so callers that do not care which layer
/// failed can still propagate with `?`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Raw playlist text could not be parsed
    #[error("Playlist error: {0}")]
    Playlist(#[from] PlaylistError),

    /// Source payload could not be adapted
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Configuration was rejected
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A pipeline step failed
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// I/O errors raised by the host
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Structural playlist errors
///
/// The parser is lenient by design of the format: the only hard failure is
/// input that does not look like a playlist at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaylistError {
    /// No `#EXTINF` marker anywhere in the input
    #[error("Not a playlist: no #EXTINF entries found in {bytes} bytes of input")]
    NotAPlaylist { bytes: usize },
}

/// Source adapter errors
#[derive(Error, Debug)]
pub enum SourceError {
    /// Payload did not match the expected provider format
    #[error("Parse error: {format} - {message}")]
    Parse { format: String, message: String },

    /// Format could not be detected or is not supported
    #[error("Unsupported format: {format}")]
    UnsupportedFormat { format: String },

    /// Payload is not valid UTF-8
    #[error("Invalid encoding: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A normalization rule pattern failed to compile
    #[error("Invalid regex '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },

    /// Unknown pipeline step identifier
    #[error("Unknown pipeline step: {step}")]
    UnknownStep { step: String },

    /// Generic invalid option
    #[error("Invalid option {field}: {message}")]
    Invalid { field: String, message: String },

    /// Layered configuration could not be extracted
    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl SourceError {
    /// Create a parse error for the given format
    pub fn parse<F: Into<String>, M: Into<String>>(format: F, message: M) -> Self {
        Self::Parse {
            format: format.into(),
            message: message.into(),
        }
    }
}

impl ConfigError {
    /// Create an invalid option error
    pub fn invalid<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Load(Box::new(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_errors_convert() {
        let err: AppError = PlaylistError::NotAPlaylist { bytes: 4 }.into();
        assert!(matches!(err, AppError::Playlist(_)));
        assert_eq!(
            err.to_string(),
            "Playlist error: Not a playlist: no #EXTINF entries found in 4 bytes of input"
        );

        let err: AppError = ConfigError::UnknownStep { step: "x".into() }.into();
        assert_eq!(err.to_string(), "Configuration error: Unknown pipeline step: x");

        let err: AppError = PipelineError::EmptyPipeline.into();
        assert!(matches!(err, AppError::Pipeline(_)));
    }

    #[test]
    fn test_source_parse_helper() {
        let err = SourceError::parse("nstream-json", "expected value");
        assert_eq!(err.to_string(), "Parse error: nstream-json - expected value");
    }
}
