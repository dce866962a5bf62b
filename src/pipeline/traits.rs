//! Pipeline Traits
//!
//! A transform plugin is a pure step: it reads a typed input and a context
//! and returns the playlist text it produced. Steps never share mutable
//! state; the orchestrator threads each output into the next step.

use std::fmt;

use super::context::TransformContext;
use super::error::PipelineError;
use crate::models::ChannelListing;

/// Kind of value a step consumes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Structured channel records from a source adapter
    Listing,
    /// Raw M3U8 text
    Playlist,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Listing => f.write_str("listing"),
            InputKind::Playlist => f.write_str("playlist"),
        }
    }
}

/// Value handed to a step
#[derive(Debug, Clone)]
pub enum TransformInput {
    Listing(ChannelListing),
    Playlist(String),
}

impl TransformInput {
    pub fn kind(&self) -> InputKind {
        match self {
            TransformInput::Listing(_) => InputKind::Listing,
            TransformInput::Playlist(_) => InputKind::Playlist,
        }
    }

    /// Short description used in error reports and logs
    pub fn summary(&self) -> String {
        match self {
            TransformInput::Listing(listing) => format!(
                "listing ({} channels, {} categories)",
                listing.channels.len(),
                listing.categories.len()
            ),
            TransformInput::Playlist(text) => format!("playlist ({} bytes)", text.len()),
        }
    }

    /// Borrow the playlist text or report an incompatible input
    pub fn as_playlist(&self, stage: &str) -> Result<&str, PipelineError> {
        match self {
            TransformInput::Playlist(text) => Ok(text),
            other => Err(incompatible(stage, InputKind::Playlist, other.kind())),
        }
    }

    /// Borrow the listing or report an incompatible input
    pub fn as_listing(&self, stage: &str) -> Result<&ChannelListing, PipelineError> {
        match self {
            TransformInput::Listing(listing) => Ok(listing),
            other => Err(incompatible(stage, InputKind::Listing, other.kind())),
        }
    }
}

fn incompatible(stage: &str, expected: InputKind, found: InputKind) -> PipelineError {
    PipelineError::IncompatibleInput {
        stage: stage.to_string(),
        step: 0,
        expected,
        found,
    }
}

/// Trait for pluggable transform steps executed in sequence
pub trait TransformPlugin: Send + Sync {
    /// Get the unique identifier for this stage
    fn stage_id(&self) -> &'static str;

    /// Get the human-readable name for this stage
    fn stage_name(&self) -> &'static str;

    /// Input kind this stage consumes
    fn input_kind(&self) -> InputKind {
        InputKind::Playlist
    }

    /// Run the stage and return the produced playlist text
    fn execute(
        &self,
        input: &TransformInput,
        context: &TransformContext,
    ) -> Result<String, PipelineError>;
}
