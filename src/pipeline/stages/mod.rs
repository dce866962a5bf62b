//! Pipeline stage implementations
//!
//! Each stage is one [`TransformPlugin`](super::traits::TransformPlugin).
//! `channel_list` adapts structured listings; the others rewrite playlist text.

pub mod channel_list;
pub mod deduplication;
pub mod rename_groups;
pub mod strip_vlc_options;

pub use channel_list::ChannelListStage;
pub use deduplication::DeduplicationStage;
pub use rename_groups::RenameGroupsStage;
pub use strip_vlc_options::StripVlcOptionsStage;

use super::error::PipelineError;
use crate::playlist::Playlist;

/// Parse playlist text, attributing a failure to `stage`
pub(crate) fn parse_playlist(stage: &str, text: &str) -> Result<Playlist, PipelineError> {
    Playlist::parse(text)
        .map_err(|e| PipelineError::stage_error_with_source(stage, e.to_string(), Box::new(e)))
}
