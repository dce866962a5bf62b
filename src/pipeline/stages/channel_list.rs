//! Channel list stage: structured listing to M3U8
//!
//! Resolves each record's categories into a `group-title` and hands the
//! records to the emitter in listing order.

use std::time::Instant;
use tracing::info;

use crate::pipeline::context::TransformContext;
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage_names;
use crate::pipeline::traits::{InputKind, TransformInput, TransformPlugin};
use crate::playlist::{record_group_title, PlaylistEmitter};
use crate::utils::human_format::format_duration;

pub struct ChannelListStage {
    max_group_titles: Option<usize>,
}

impl ChannelListStage {
    /// `max_group_titles` overrides the cap preferred by the source adapter
    pub fn new(max_group_titles: Option<usize>) -> Self {
        Self { max_group_titles }
    }
}

impl TransformPlugin for ChannelListStage {
    fn stage_id(&self) -> &'static str {
        stage_names::CHANNEL_LIST
    }

    fn stage_name(&self) -> &'static str {
        "Channel List"
    }

    fn input_kind(&self) -> InputKind {
        InputKind::Listing
    }

    fn execute(
        &self,
        input: &TransformInput,
        _context: &TransformContext,
    ) -> Result<String, PipelineError> {
        let start = Instant::now();
        let listing = input.as_listing(self.stage_id())?;
        let cap = self.max_group_titles.or(listing.default_max_group_titles);

        let mut emitter = PlaylistEmitter::new();
        for record in &listing.channels {
            let group_title = record_group_title(record, &listing.categories, cap);
            emitter.push_record(record, group_title.as_deref());
        }

        info!(
            "Channel list stage completed: duration={} channels_written={} channels_skipped={} categories={}",
            format_duration(start.elapsed()),
            emitter.written(),
            emitter.skipped(),
            listing.categories.len()
        );
        Ok(emitter.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryIndex, ChannelListing, ChannelRecord};

    fn listing() -> ChannelListing {
        let categories: CategoryIndex = [("1", "News"), ("2", "General")].into_iter().collect();
        ChannelListing::new(
            vec![
                ChannelRecord::new("News 24", "http://s/1")
                    .with_logo("http://l/1.png")
                    .with_category_list("1,2"),
                ChannelRecord::new("Placeholder", ""),
                ChannelRecord::new("Unsorted", "http://s/3").with_category_list("42"),
            ],
            categories,
        )
    }

    #[test]
    fn test_listing_to_playlist() {
        let stage = ChannelListStage::new(None);
        let output = stage
            .execute(&TransformInput::Listing(listing()), &TransformContext::new("test", 1))
            .unwrap();

        assert_eq!(
            output,
            "#EXTM3U\n\
             #EXTINF:0 tvg-logo=\"http://l/1.png\" group-title=\"News;General\",News 24\n\
             http://s/1\n\
             #EXTINF:0,Unsorted\n\
             http://s/3\n"
        );
    }

    #[test]
    fn test_adapter_cap_and_override() {
        let capped = TransformInput::Listing(listing().with_max_group_titles(1));
        let context = TransformContext::new("test", 1);

        let output = ChannelListStage::new(None).execute(&capped, &context).unwrap();
        assert!(output.contains("group-title=\"News\","));

        let output = ChannelListStage::new(Some(2)).execute(&capped, &context).unwrap();
        assert!(output.contains("group-title=\"News;General\","));
    }

    #[test]
    fn test_rejects_playlist_input() {
        let err = ChannelListStage::new(None)
            .execute(
                &TransformInput::Playlist("#EXTM3U\n".into()),
                &TransformContext::new("test", 1),
            )
            .unwrap_err();
        assert!(matches!(err, PipelineError::IncompatibleInput { .. }));
    }
}
