//! Centralized error handling for the playlist transformer
//!
//! Every layer of the crate reports failures through the types in this
//! module so the host binary can render a single, chained error message.
//!
//! # Error Categories
//!
//! - **Playlist Errors**: structural problems with raw M3U8 input
//! - **Source Errors**: provider payloads (JSON/XML) that cannot be adapted
//! - **Config Errors**: invalid options, unknown steps, bad regex rules
//! - **Pipeline Errors**: a transform step failed (see [`crate::pipeline::PipelineError`])
//!
//! # Usage
//!
//! ```rust
//! use m3u_transform::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("#EXTM3U\n".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for playlist parsing Results
pub type PlaylistResult<T> = Result<T, PlaylistError>;

/// Convenience type alias for Source adapter Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for configuration Results
pub type ConfigResult<T> = Result<T, ConfigError>;
