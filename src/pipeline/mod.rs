//! Playlist transformation pipeline
//!
//! - **Core**: step list construction and ordered execution
//! - **Engines**: the priority resolver used for deduplication
//! - **Stages**: individual transform plugins
//!
//! A run takes one input (a structured listing or playlist text), threads it
//! through each step in order and yields the final playlist text.

pub mod context;
pub mod core;
pub mod engines;
pub mod error;
pub mod stages;
pub mod traits;

pub use context::TransformContext;
pub use core::{PipelineBuilder, PipelineOrchestrator, PipelineOutput, StageReport};
pub use engines::{PriorityResolver, ResolverOptions, ResolverReport};
pub use error::PipelineError;
pub use stages::{ChannelListStage, DeduplicationStage, RenameGroupsStage, StripVlcOptionsStage};
pub use traits::{InputKind, TransformInput, TransformPlugin};

/// Pipeline stage names for consistent naming across the system
pub mod stage_names {
    pub const CHANNEL_LIST: &str = "channel_list";
    pub const DEDUPLICATE: &str = "deduplicate";
    pub const STRIP_VLC_OPTIONS: &str = "strip_vlc_options";
    pub const RENAME_GROUPS: &str = "rename_groups";

    pub const ALL: &[&str] = &[CHANNEL_LIST, DEDUPLICATE, STRIP_VLC_OPTIONS, RENAME_GROUPS];
}
