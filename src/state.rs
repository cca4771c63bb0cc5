use crate::error::ExecError;
use crate::tape::{PointerPolicy, Tape};

/// The complete state of a running program.
///
/// `code_ptr` is only ever compared against the program length. `mem_ptr`
/// may stray outside the tape between accesses; the tape checks it whenever
/// a cell is touched. `input_ptr` never decreases and `output` only grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterState {
    pub code_ptr: usize,
    pub mem_ptr: isize,
    pub input_ptr: usize,
    pub mem: Tape,
    pub inputs: Vec<u8>,
    pub output: Vec<u8>,
}

impl InterpreterState {
    /// Fresh state: zeroed tape with the cursor at its center, nothing read,
    /// nothing written.
    pub fn init_state(input: &[u8], memory_size: usize, policy: PointerPolicy) -> Result<Self, ExecError> {
        let mem = Tape::new(memory_size, policy)?;
        Ok(Self {
            code_ptr: 0,
            mem_ptr: mem.center(),
            input_ptr: 0,
            mem,
            inputs: input.to_vec(),
            output: Vec::new(),
        })
    }

    /// Value of the cell under the cursor.
    pub fn read_mem(&self) -> Result<u8, ExecError> {
        self.mem.read(self.mem_ptr)
    }

    pub fn write_mem(&mut self, value: u8) -> Result<(), ExecError> {
        self.mem.write(self.mem_ptr, value)
    }

    /// The next input byte, or 0 once the input is exhausted.
    pub fn peek_input(&self) -> u8 {
        self.inputs.get(self.input_ptr).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::DEFAULT_MEMORY_SIZE;

    #[test]
    fn test_init_state_defaults() {
        let state = InterpreterState::init_state(b"abc", DEFAULT_MEMORY_SIZE, PointerPolicy::Strict).unwrap();
        assert_eq!(state.code_ptr, 0);
        assert_eq!(state.mem_ptr, 2048);
        assert_eq!(state.input_ptr, 0);
        assert_eq!(state.mem.len(), DEFAULT_MEMORY_SIZE);
        assert_eq!(state.inputs, b"abc");
        assert!(state.output.is_empty());
    }

    #[test]
    fn test_init_state_rejects_empty_tape() {
        assert_eq!(
            InterpreterState::init_state(b"", 0, PointerPolicy::Strict),
            Err(ExecError::InvalidMemorySize)
        );
    }

    #[test]
    fn test_peek_input_past_end_is_zero() {
        let mut state = InterpreterState::init_state(b"A", 8, PointerPolicy::Strict).unwrap();
        assert_eq!(state.peek_input(), b'A');
        state.input_ptr = 1;
        assert_eq!(state.peek_input(), 0);
        state.input_ptr = 100;
        assert_eq!(state.peek_input(), 0);
    }
}
