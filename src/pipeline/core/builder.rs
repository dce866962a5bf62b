//! Pipeline Builder
//!
//! Turns the configured step list into a [`PipelineOrchestrator`], creating
//! each stage with its section of the configuration.

use tracing::debug;

use crate::config::Config;
use crate::errors::{ConfigError, ConfigResult};
use crate::pipeline::core::orchestrator::PipelineOrchestrator;
use crate::pipeline::stage_names;
use crate::pipeline::stages::{
    ChannelListStage, DeduplicationStage, RenameGroupsStage, StripVlcOptionsStage,
};
use crate::pipeline::traits::{InputKind, TransformPlugin};

pub struct PipelineBuilder {
    app_config: Config,
    steps: Vec<String>,
}

impl PipelineBuilder {
    /// Start from the configuration's own step list
    pub fn new(app_config: Config) -> Self {
        let steps = app_config.pipeline.steps.clone();
        Self { app_config, steps }
    }

    /// Replace the step list (command-line override)
    pub fn with_steps(mut self, steps: Vec<String>) -> Self {
        self.steps = steps;
        self
    }

    /// Fit the step list to the adapted input. Playlist input skips a
    /// leading `channel_list` step, which only accepts listings, as long as
    /// other steps remain.
    pub fn for_input(mut self, kind: InputKind) -> Self {
        let leading_listing_step = self
            .steps
            .first()
            .is_some_and(|step| step == stage_names::CHANNEL_LIST);
        if kind == InputKind::Playlist && leading_listing_step && self.steps.len() > 1 {
            debug!("Input is already a playlist, skipping '{}'", stage_names::CHANNEL_LIST);
            self.steps.remove(0);
        }
        self
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Build the orchestrator. Unknown step names and invalid rules are
    /// reported here, before any input is read.
    pub fn build(self) -> ConfigResult<PipelineOrchestrator> {
        if self.steps.is_empty() {
            return Err(ConfigError::invalid("pipeline.steps", "at least one step is required"));
        }

        let mut orchestrator = PipelineOrchestrator::new();
        for step in &self.steps {
            let stage = self.create_stage(step)?;
            debug!("Added stage '{}' ({})", stage.stage_id(), stage.stage_name());
            orchestrator.add_stage(stage);
        }
        Ok(orchestrator)
    }

    fn create_stage(&self, step: &str) -> ConfigResult<Box<dyn TransformPlugin>> {
        let stage: Box<dyn TransformPlugin> = match step {
            stage_names::CHANNEL_LIST => Box::new(ChannelListStage::new(
                self.app_config.channel_list.max_group_titles,
            )),
            stage_names::DEDUPLICATE => Box::new(DeduplicationStage::new(
                self.app_config.deduplicate.resolver_options()?,
            )),
            stage_names::STRIP_VLC_OPTIONS => Box::new(StripVlcOptionsStage::new()),
            stage_names::RENAME_GROUPS => Box::new(RenameGroupsStage::new(
                self.app_config.rename_groups.group_name.clone(),
            )),
            other => {
                return Err(ConfigError::UnknownStep {
                    step: other.to_string(),
                })
            }
        };
        Ok(stage)
    }
}
