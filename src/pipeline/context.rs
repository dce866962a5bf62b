use uuid::Uuid;

/// Per-run context handed to every step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformContext {
    pub run_id: Uuid,
    /// Where the input came from (file name, `stdin`, ...)
    pub source_name: String,
    /// 0-based position of the step being executed
    pub step: usize,
    pub total_steps: usize,
}

impl TransformContext {
    pub fn new(source_name: impl Into<String>, total_steps: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            source_name: source_name.into(),
            step: 0,
            total_steps,
        }
    }

    pub fn for_step(&self, step: usize) -> Self {
        Self {
            step,
            ..self.clone()
        }
    }
}
