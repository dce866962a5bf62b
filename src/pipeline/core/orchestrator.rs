//! Pipeline Orchestrator
//!
//! Runs the configured steps in order. Each step reads the previous step's
//! output and produces a fresh value, so a failing step never touches what
//! earlier steps built; the run stops at the first failure.

use std::time::{Duration, Instant};
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

use crate::pipeline::context::TransformContext;
use crate::pipeline::error::PipelineError;
use crate::pipeline::traits::{TransformInput, TransformPlugin};
use crate::utils::human_format::{format_duration, format_size};

/// Timing and size of one completed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage_id: &'static str,
    pub duration: Duration,
    pub output_bytes: usize,
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub run_id: Uuid,
    pub playlist: String,
    pub stages: Vec<StageReport>,
}

#[derive(Default)]
pub struct PipelineOrchestrator {
    stages: Vec<Box<dyn TransformPlugin>>,
}

impl PipelineOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stage to the pipeline
    pub fn add_stage(&mut self, stage: Box<dyn TransformPlugin>) {
        self.stages.push(stage);
    }

    pub fn with_stage(mut self, stage: impl TransformPlugin + 'static) -> Self {
        self.add_stage(Box::new(stage));
        self
    }

    pub fn stage_ids(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.stage_id()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Execute every step once over `input`.
    ///
    /// All state lives in this call, so concurrent runs on the same
    /// orchestrator are independent.
    pub fn run(
        &self,
        input: TransformInput,
        source_name: &str,
    ) -> Result<PipelineOutput, PipelineError> {
        if self.stages.is_empty() {
            return Err(PipelineError::EmptyPipeline);
        }

        let context = TransformContext::new(source_name, self.stages.len());
        let span = info_span!("pipeline", run_id = %context.run_id, source = %context.source_name);
        let _enter = span.enter();

        let run_start = Instant::now();
        info!(
            "Starting pipeline: steps={} input={}",
            self.stage_ids().join(" -> "),
            input.summary()
        );

        let mut current = input;
        let mut reports = Vec::with_capacity(self.stages.len());

        for (step, stage) in self.stages.iter().enumerate() {
            let stage_span = info_span!("stage", stage = stage.stage_id(), step);
            let _stage_enter = stage_span.enter();

            if current.kind() != stage.input_kind() {
                let err = PipelineError::IncompatibleInput {
                    stage: stage.stage_id().to_string(),
                    step,
                    expected: stage.input_kind(),
                    found: current.kind(),
                };
                error!("Aborting pipeline: {}", err);
                return Err(err);
            }

            let step_context = context.for_step(step);
            debug!(
                "Running stage '{}' ({}/{}) on {}",
                stage.stage_name(),
                step_context.step + 1,
                step_context.total_steps,
                current.summary()
            );
            let stage_start = Instant::now();
            let output = stage
                .execute(&current, &step_context)
                .map_err(|e| {
                    let err = e.in_step(stage.stage_id(), step, current.summary());
                    error!("Aborting pipeline: {}", err);
                    err
                })?;

            reports.push(StageReport {
                stage_id: stage.stage_id(),
                duration: stage_start.elapsed(),
                output_bytes: output.len(),
            });
            current = TransformInput::Playlist(output);
        }

        let TransformInput::Playlist(playlist) = current else {
            return Err(PipelineError::EmptyPipeline);
        };

        info!(
            "Pipeline completed: duration={} output_size={}",
            format_duration(run_start.elapsed()),
            format_size(playlist.len())
        );

        Ok(PipelineOutput {
            run_id: context.run_id,
            playlist,
            stages: reports,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::engines::ResolverOptions;
    use crate::pipeline::stages::{
        ChannelListStage, DeduplicationStage, RenameGroupsStage, StripVlcOptionsStage,
    };
    use crate::pipeline::traits::InputKind;

    struct FailingStage;

    impl TransformPlugin for FailingStage {
        fn stage_id(&self) -> &'static str {
            "failing"
        }

        fn stage_name(&self) -> &'static str {
            "Failing"
        }

        fn execute(
            &self,
            _input: &TransformInput,
            _context: &TransformContext,
        ) -> Result<String, PipelineError> {
            Err(PipelineError::stage_error("failing", "boom"))
        }
    }

    const INPUT: &str = "#EXTM3U\n#EXTINF:-1 group-title=\"A\",News HD\n#EXTVLCOPT:x=y\nhttp://s/1\n";

    #[test]
    fn test_steps_run_in_order() {
        let pipeline = PipelineOrchestrator::new()
            .with_stage(StripVlcOptionsStage::new())
            .with_stage(RenameGroupsStage::new("All"))
            .with_stage(DeduplicationStage::new(ResolverOptions::default()));

        let output = pipeline
            .run(TransformInput::Playlist(INPUT.to_string()), "test")
            .unwrap();

        assert_eq!(output.playlist, "#EXTM3U\n#EXTINF:-1 group-title=\"All\",News\nhttp://s/1\n");
        assert_eq!(
            output.stages.iter().map(|r| r.stage_id).collect::<Vec<_>>(),
            vec!["strip_vlc_options", "rename_groups", "deduplicate"]
        );
    }

    #[test]
    fn test_failure_reports_step_and_input() {
        let pipeline = PipelineOrchestrator::new()
            .with_stage(StripVlcOptionsStage::new())
            .with_stage(FailingStage)
            .with_stage(RenameGroupsStage::new("All"));

        let err = pipeline
            .run(TransformInput::Playlist(INPUT.to_string()), "test")
            .unwrap_err();

        match err {
            PipelineError::StageExecution {
                stage,
                step,
                input,
                message,
                ..
            } => {
                assert_eq!(stage, "failing");
                assert_eq!(step, 1);
                assert!(input.starts_with("playlist ("));
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_incompatible_input_detected() {
        let pipeline = PipelineOrchestrator::new().with_stage(ChannelListStage::new(None));
        let err = pipeline
            .run(TransformInput::Playlist(INPUT.to_string()), "test")
            .unwrap_err();
        assert!(matches!(
            err,
            PipelineError::IncompatibleInput {
                expected: InputKind::Listing,
                found: InputKind::Playlist,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_pipeline() {
        let err = PipelineOrchestrator::new()
            .run(TransformInput::Playlist(INPUT.to_string()), "test")
            .unwrap_err();
        assert!(matches!(err, PipelineError::EmptyPipeline));
    }
}
