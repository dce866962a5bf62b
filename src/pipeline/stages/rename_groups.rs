//! Moves every entry into a single named group.
//!
//! The `group-title` attribute is rewritten per entry through the
//! [`ExtInf`](crate::playlist::ExtInf) attribute model, and `#EXTGRP:` lines
//! are replaced, so quoting inside titles or other attributes is untouched.

use tracing::info;

use crate::pipeline::context::TransformContext;
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage_names;
use crate::pipeline::traits::{TransformInput, TransformPlugin};
use crate::playlist::{PlaylistEmitter, PlaylistEntry};

use super::parse_playlist;

const EXTGRP_PREFIX: &str = "#EXTGRP:";

pub struct RenameGroupsStage {
    group_name: String,
}

impl RenameGroupsStage {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
        }
    }

    fn rename(&self, entry: &PlaylistEntry) -> PlaylistEntry {
        let lines = entry
            .lines
            .iter()
            .map(|line| {
                if line.starts_with(EXTGRP_PREFIX) {
                    format!("{EXTGRP_PREFIX}{}", self.group_name)
                } else {
                    line.clone()
                }
            })
            .collect();

        PlaylistEntry {
            extinf: entry.extinf.with_attribute("group-title", &self.group_name),
            lines,
        }
    }
}

impl TransformPlugin for RenameGroupsStage {
    fn stage_id(&self) -> &'static str {
        stage_names::RENAME_GROUPS
    }

    fn stage_name(&self) -> &'static str {
        "Rename Groups"
    }

    fn execute(
        &self,
        input: &TransformInput,
        _context: &TransformContext,
    ) -> Result<String, PipelineError> {
        let playlist = parse_playlist(self.stage_id(), input.as_playlist(self.stage_id())?)?;

        let mut emitter = PlaylistEmitter::new().with_header(playlist.header.as_deref());
        for entry in &playlist.entries {
            emitter.push_entry(&self.rename(entry));
        }

        info!(
            "Rename groups stage completed: entries={} group='{}'",
            emitter.written(),
            self.group_name
        );
        Ok(emitter.finish())
    }
}
