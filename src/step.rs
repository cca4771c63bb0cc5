use tracing::trace;

use crate::brackets::{Direction, JumpResolver};
use crate::error::ExecError;
use crate::state::InterpreterState;

pub const LESS: u8 = b'<';
pub const GREATER: u8 = b'>';
pub const MINUS: u8 = b'-';
pub const PLUS: u8 = b'+';
pub const LBRACKET: u8 = b'[';
pub const RBRACKET: u8 = b']';
pub const COMMA: u8 = b',';
pub const DOT: u8 = b'.';

/// The eight instruction bytes. Everything else is a comment.
pub const INSTRUCTIONS: [u8; 8] = [LESS, GREATER, MINUS, PLUS, LBRACKET, RBRACKET, COMMA, DOT];

/// Returns true if the byte does something other than advance the
/// instruction pointer.
pub fn is_instruction(byte: u8) -> bool {
    INSTRUCTIONS.contains(&byte)
}

/// Execute the instruction at `state.code_ptr`.
///
/// Each step either advances `code_ptr` by one or jumps to one past the
/// matching bracket, never both. On error the state is left exactly as it
/// was before the call. A state whose `code_ptr` is already past the end of
/// the program is left untouched.
pub fn step(code: &[u8], state: &mut InterpreterState, resolver: &JumpResolver) -> Result<(), ExecError> {
    let Some(&inst) = code.get(state.code_ptr) else {
        return Ok(());
    };

    match inst {
        LESS => state.mem_ptr -= 1,
        GREATER => state.mem_ptr += 1,
        MINUS => state.mem.sub(state.mem_ptr, 1)?,
        PLUS => state.mem.add(state.mem_ptr, 1)?,
        LBRACKET => {
            if state.read_mem()? == 0 {
                let close = resolver.resolve(code, state.code_ptr, Direction::Forward)?;
                trace!(from = state.code_ptr, to = close + 1, "skip loop");
                state.code_ptr = close + 1;
                return Ok(());
            }
        }
        RBRACKET => {
            if state.read_mem()? != 0 {
                let open = resolver.resolve(code, state.code_ptr, Direction::Backward)?;
                trace!(from = state.code_ptr, to = open + 1, "repeat loop");
                state.code_ptr = open + 1;
                return Ok(());
            }
        }
        COMMA => {
            let available = state.input_ptr < state.inputs.len();
            state.write_mem(state.peek_input())?;
            if available {
                state.input_ptr += 1;
            }
        }
        DOT => {
            let value = state.read_mem()?;
            state.output.push(value);
        }
        _ => {} // comment
    }

    state.code_ptr += 1;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::PointerPolicy;

    fn state_with(input: &[u8]) -> InterpreterState {
        InterpreterState::init_state(input, 16, PointerPolicy::Strict).unwrap()
    }

    fn step_scan(code: &[u8], state: &mut InterpreterState) -> Result<(), ExecError> {
        step(code, state, &JumpResolver::Scan)
    }

    #[test]
    fn test_pointer_moves() {
        let mut state = state_with(b"");
        step_scan(b"<", &mut state).unwrap();
        assert_eq!(state.mem_ptr, 7);
        assert_eq!(state.code_ptr, 1);

        let mut state = state_with(b"");
        step_scan(b">", &mut state).unwrap();
        assert_eq!(state.mem_ptr, 9);
        assert_eq!(state.code_ptr, 1);
    }

    #[test]
    fn test_plus_and_minus_touch_current_cell_only() {
        let mut state = state_with(b"");
        step_scan(b"+", &mut state).unwrap();
        assert_eq!(state.read_mem(), Ok(1));
        for _ in 0..2 {
            state.code_ptr = 0;
            step_scan(b"-", &mut state).unwrap();
        }
        assert_eq!(state.read_mem(), Ok(255));
        assert_eq!(state.mem.cells().iter().filter(|&&c| c != 0).count(), 1);
    }

    #[test]
    fn test_open_bracket_on_zero_jumps_past_match() {
        let code = b"[+]x";
        let mut state = state_with(b"");
        step_scan(code, &mut state).unwrap();
        assert_eq!(state.code_ptr, 3);
    }

    #[test]
    fn test_open_bracket_on_nonzero_enters_loop() {
        let code = b"[+]";
        let mut state = state_with(b"");
        state.write_mem(5).unwrap();
        step_scan(code, &mut state).unwrap();
        assert_eq!(state.code_ptr, 1);
    }

    #[test]
    fn test_close_bracket_on_nonzero_jumps_past_open() {
        let code = b"x[-]";
        let mut state = state_with(b"");
        state.write_mem(2).unwrap();
        state.code_ptr = 3;
        step_scan(code, &mut state).unwrap();
        assert_eq!(state.code_ptr, 2);
    }

    #[test]
    fn test_close_bracket_on_zero_falls_through() {
        let code = b"[-]";
        let mut state = state_with(b"");
        state.code_ptr = 2;
        step_scan(code, &mut state).unwrap();
        assert_eq!(state.code_ptr, 3);
    }

    #[test]
    fn test_read_consumes_input() {
        let mut state = state_with(b"AB");
        step_scan(b",", &mut state).unwrap();
        assert_eq!(state.read_mem(), Ok(b'A'));
        assert_eq!(state.input_ptr, 1);
    }

    #[test]
    fn test_read_past_end_stores_zero() {
        let mut state = state_with(b"");
        state.write_mem(9).unwrap();
        step_scan(b",", &mut state).unwrap();
        assert_eq!(state.read_mem(), Ok(0));
        assert_eq!(state.input_ptr, 0);
        assert_eq!(state.code_ptr, 1);
    }

    #[test]
    fn test_write_appends_output() {
        let mut state = state_with(b"");
        state.write_mem(b'z').unwrap();
        step_scan(b".", &mut state).unwrap();
        assert_eq!(state.output, b"z");
    }

    #[test]
    fn test_comment_bytes_only_advance() {
        for byte in 0..=255u8 {
            if is_instruction(byte) {
                continue;
            }
            let mut state = state_with(b"q");
            let before = state.clone();
            step_scan(&[byte], &mut state).unwrap();
            assert_eq!(state.code_ptr, 1);
            state.code_ptr = 0;
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_out_of_bounds_access_leaves_state_unchanged() {
        let mut state = InterpreterState::init_state(b"A", 1, PointerPolicy::Strict).unwrap();
        step_scan(b"<", &mut state).unwrap();
        state.code_ptr = 0;
        let before = state.clone();
        let codes: [&[u8]; 6] = [b"+", b"-", b".", b",", b"[", b"]"];
        for code in codes {
            let err = step_scan(code, &mut state).unwrap_err();
            assert_eq!(
                err,
                ExecError::MemoryOutOfBounds {
                    mem_ptr: -1,
                    memory_size: 1
                }
            );
            assert_eq!(state, before);
        }
    }

    #[test]
    fn test_unmatched_jump_leaves_state_unchanged() {
        let mut state = state_with(b"");
        let before = state.clone();
        assert!(step_scan(b"[", &mut state).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_step_past_end_is_noop() {
        let mut state = state_with(b"");
        state.code_ptr = 1;
        let before = state.clone();
        step_scan(b"+", &mut state).unwrap();
        assert_eq!(state, before);
    }
}
