//! Pipeline Error Types
//!
//! Errors raised while running transform steps. Every failure that leaves
//! the orchestrator names the step that failed and the input it was given.

use std::fmt;

use super::traits::InputKind;

/// Main error type for pipeline operations
#[derive(Debug)]
pub enum PipelineError {
    /// Stage execution failed
    StageExecution {
        stage: String,
        step: usize,
        input: String,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A step was handed an input kind it cannot process
    IncompatibleInput {
        stage: String,
        step: usize,
        expected: InputKind,
        found: InputKind,
    },

    /// No steps configured
    EmptyPipeline,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::StageExecution {
                stage,
                step,
                input,
                message,
                ..
            } => {
                write!(f, "Stage '{stage}' (step {}) failed on {input}: {message}", step + 1)
            }
            PipelineError::IncompatibleInput {
                stage,
                step,
                expected,
                found,
            } => write!(
                f,
                "Stage '{stage}' (step {}) expects {expected} input but received {found}",
                step + 1
            ),
            PipelineError::EmptyPipeline => write!(f, "Pipeline has no steps"),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::StageExecution {
                source: Some(e), ..
            } => Some(e.as_ref()),
            _ => None,
        }
    }
}

// Helper methods for creating specific error types
impl PipelineError {
    /// Create a stage execution error
    pub fn stage_error(stage: &str, message: impl Into<String>) -> Self {
        PipelineError::StageExecution {
            stage: stage.to_string(),
            step: 0,
            input: String::new(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a stage execution error with source
    pub fn stage_error_with_source(
        stage: &str,
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        PipelineError::StageExecution {
            stage: stage.to_string(),
            step: 0,
            input: String::new(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Attach the failing step's identity and an input summary
    pub fn in_step(self, stage: &str, step: usize, input: String) -> Self {
        match self {
            PipelineError::StageExecution {
                message, source, ..
            } => PipelineError::StageExecution {
                stage: stage.to_string(),
                step,
                input,
                message,
                source,
            },
            PipelineError::IncompatibleInput {
                expected, found, ..
            } => PipelineError::IncompatibleInput {
                stage: stage.to_string(),
                step,
                expected,
                found,
            },
            other => PipelineError::StageExecution {
                stage: stage.to_string(),
                step,
                input,
                message: other.to_string(),
                source: Some(Box::new(other)),
            },
        }
    }

    /// Identifier of the failing stage, when known
    pub fn stage(&self) -> Option<&str> {
        match self {
            PipelineError::StageExecution { stage, .. }
            | PipelineError::IncompatibleInput { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Position of the failing step, when known
    pub fn step(&self) -> Option<usize> {
        match self {
            PipelineError::StageExecution { step, .. }
            | PipelineError::IncompatibleInput { step, .. } => Some(*step),
            _ => None,
        }
    }
}
