pub mod builder;
pub mod orchestrator;

pub use builder::PipelineBuilder;
pub use orchestrator::{PipelineOrchestrator, PipelineOutput, StageReport};
