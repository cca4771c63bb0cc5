use thiserror::Error;

/// Fatal conditions raised while executing a program.
///
/// Running out of input is not an error: a read past the end of the input
/// stores 0 in the current cell.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecError {
    /// The memory pointer was outside `[0, memory_size)` when a cell was
    /// read or written.
    #[error("memory pointer {mem_ptr} out of bounds for tape of {memory_size} cells")]
    MemoryOutOfBounds { mem_ptr: isize, memory_size: usize },

    /// A bracket scan ran off the program without its nesting count
    /// reaching zero.
    #[error("unmatched '{bracket}' at position {position}")]
    UnmatchedBracket { position: usize, bracket: char },

    /// The tape must hold at least one cell.
    #[error("memory size must be positive")]
    InvalidMemorySize,
}
