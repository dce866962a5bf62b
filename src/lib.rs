use std::path::Path;

pub mod config;
pub mod errors;
pub mod models;
pub mod observability;
pub mod pipeline;
pub mod playlist;
pub mod sources;
pub mod utils;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use pipeline::{PipelineBuilder, PipelineOrchestrator, PipelineOutput, TransformInput};

/// Adapt a raw payload, build the configured pipeline and run it once.
///
/// `path` only feeds format detection when `config.source.format` is `auto`.
/// A leading `channel_list` step is skipped for playlist input.
pub fn transform(
    config: &Config,
    path: Option<&Path>,
    bytes: &[u8],
    source_name: &str,
) -> AppResult<PipelineOutput> {
    let input = sources::adapt(config.source.format, path, bytes)?;
    let orchestrator = PipelineBuilder::new(config.clone())
        .for_input(input.kind())
        .build()?;
    Ok(orchestrator.run(input, source_name)?)
}
