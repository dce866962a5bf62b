//! Removes `#EXTVLCOPT:` option lines (user-agent, referrer overrides)
//! from every entry.

use tracing::info;

use crate::pipeline::context::TransformContext;
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage_names;
use crate::pipeline::traits::{TransformInput, TransformPlugin};
use crate::playlist::{PlaylistEmitter, PlaylistEntry};

use super::parse_playlist;

const VLC_OPTION_PREFIX: &str = "#EXTVLCOPT:";

#[derive(Default)]
pub struct StripVlcOptionsStage;

impl StripVlcOptionsStage {
    pub fn new() -> Self {
        Self
    }
}

impl TransformPlugin for StripVlcOptionsStage {
    fn stage_id(&self) -> &'static str {
        stage_names::STRIP_VLC_OPTIONS
    }

    fn stage_name(&self) -> &'static str {
        "Strip VLC Options"
    }

    fn execute(
        &self,
        input: &TransformInput,
        _context: &TransformContext,
    ) -> Result<String, PipelineError> {
        let playlist = parse_playlist(self.stage_id(), input.as_playlist(self.stage_id())?)?;

        let mut removed = 0;
        let mut emitter = PlaylistEmitter::new().with_header(playlist.header.as_deref());
        for entry in &playlist.entries {
            let lines: Vec<String> = entry
                .lines
                .iter()
                .filter(|line| !line.starts_with(VLC_OPTION_PREFIX))
                .cloned()
                .collect();
            removed += entry.lines.len() - lines.len();

            emitter.push_entry(&PlaylistEntry {
                extinf: entry.extinf.clone(),
                lines,
            });
        }

        info!(
            "Strip VLC options stage completed: entries={} option_lines_removed={}",
            emitter.written(),
            removed
        );
        Ok(emitter.finish())
    }
}
