use crate::tape::{DEFAULT_MEMORY_SIZE, PointerPolicy};

/// Configuration for a single program run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of cells on the tape. The cursor starts at `memory_size / 2`.
    pub memory_size: usize,
    /// Maximum instructions to execute (`None` runs until the program ends).
    pub step_limit: Option<usize>,
    /// Treatment of an out-of-range memory pointer.
    pub pointer_policy: PointerPolicy,
    /// Resolve jumps from a bracket table built once per run instead of
    /// scanning the program at every jump.
    pub cache_brackets: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            step_limit: None,
            pointer_policy: PointerPolicy::Strict,
            cache_brackets: false,
        }
    }
}
