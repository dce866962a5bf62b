//! Deduplication stage
//!
//! Parses the incoming playlist, groups quality variants of the same channel
//! through the [`PriorityResolver`], and re-emits every member under its
//! group's canonical name, best quality first.

use std::time::Instant;
use tracing::info;

use crate::pipeline::context::TransformContext;
use crate::pipeline::engines::priority_resolver::{PriorityResolver, ResolverOptions};
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage_names;
use crate::pipeline::traits::{TransformInput, TransformPlugin};
use crate::playlist::PlaylistEmitter;
use crate::utils::human_format::format_duration;

use super::parse_playlist;

pub struct DeduplicationStage {
    resolver: PriorityResolver,
}

impl DeduplicationStage {
    pub fn new(options: ResolverOptions) -> Self {
        Self {
            resolver: PriorityResolver::new(options),
        }
    }

    /// Transform playlist text directly
    pub fn transform(&self, text: &str) -> Result<String, PipelineError> {
        let start = Instant::now();
        let playlist = parse_playlist(self.stage_id(), text)?;

        let header = playlist.header.clone();
        let resolved = self.resolver.resolve(playlist.entries);
        let report = resolved.report;

        let mut emitter = PlaylistEmitter::new().with_header(header.as_deref());
        for entry in resolved.into_entries() {
            emitter.push_entry(&entry);
        }

        info!(
            "Deduplication stage completed: duration={} entries_in={} excluded={} groups={} entries_out={} skipped_without_url={}",
            format_duration(start.elapsed()),
            report.input_entries,
            report.excluded_entries,
            report.groups,
            emitter.written(),
            emitter.skipped()
        );
        Ok(emitter.finish())
    }
}

impl TransformPlugin for DeduplicationStage {
    fn stage_id(&self) -> &'static str {
        stage_names::DEDUPLICATE
    }

    fn stage_name(&self) -> &'static str {
        "Deduplicate"
    }

    fn execute(
        &self,
        input: &TransformInput,
        _context: &TransformContext,
    ) -> Result<String, PipelineError> {
        self.transform(input.as_playlist(self.stage_id())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(suffixes: &[&str]) -> DeduplicationStage {
        DeduplicationStage::new(ResolverOptions {
            suffix_priority: suffixes.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        })
    }

    #[test]
    fn test_bbc_one_variants() {
        let input = "#EXTM3U\n\
            #EXTINF:-1 group-title=\"UK\",BBC One HD\n\
            http://s/hd\n\
            #EXTINF:-1 group-title=\"UK\",BBC One 4K\n\
            http://s/4k\n\
            #EXTINF:-1 group-title=\"UK\",BBC One\n\
            http://s/sd\n";

        let output = stage(&[" 4K", " HD"]).transform(input).unwrap();
        assert_eq!(
            output,
            "#EXTM3U\n\
             #EXTINF:-1 group-title=\"UK\",BBC One\n\
             http://s/4k\n\
             #EXTINF:-1 group-title=\"UK\",BBC One\n\
             http://s/hd\n\
             #EXTINF:-1 group-title=\"UK\",BBC One\n\
             http://s/sd\n"
        );
    }

    #[test]
    fn test_option_lines_travel_with_entry() {
        let input = "#EXTINF:-1,Sport HD\n#EXTVLCOPT:http-user-agent=X\nhttp://s/hd\n#EXTINF:-1,Sport 4K\nhttp://s/4k\n";
        let output = stage(&[" 4K", " HD"]).transform(input).unwrap();
        assert_eq!(
            output,
            "#EXTM3U\n#EXTINF:-1,Sport\nhttp://s/4k\n#EXTINF:-1,Sport\n#EXTVLCOPT:http-user-agent=X\nhttp://s/hd\n"
        );
    }

    #[test]
    fn test_not_a_playlist_names_stage() {
        let err = stage(&[" HD"]).transform("just some text").unwrap_err();
        assert_eq!(err.stage(), Some("deduplicate"));
        assert!(err.to_string().contains("Not a playlist"));
    }
}
