use tracing::{debug, warn};

use crate::brackets::JumpResolver;
use crate::config::RunConfig;
use crate::error::ExecError;
use crate::state::InterpreterState;
use crate::step::step;
use crate::tape::PointerPolicy;

/// Result of a run that may have been cut short by a step limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Bytes written by `.` instructions, in execution order.
    pub output: Vec<u8>,
    /// Number of instructions executed, comments included.
    pub steps: usize,
    /// True if the instruction pointer passed the end of the program;
    /// false if the step limit stopped execution first.
    pub halted: bool,
}

/// A program bound to its running state.
///
/// Execution can be driven one instruction at a time, in bounded slices, or
/// to completion. Each call leaves the state between whole instructions, so
/// interleaving slices with other work does not change what the program
/// outputs.
pub struct Interpreter<'a> {
    code: &'a [u8],
    state: InterpreterState,
    resolver: JumpResolver,
    step_limit: Option<usize>,
    steps: usize,
}

impl<'a> Interpreter<'a> {
    pub fn new(code: &'a [u8], input: &[u8], config: &RunConfig) -> Result<Self, ExecError> {
        let state = InterpreterState::init_state(input, config.memory_size, config.pointer_policy)?;
        let resolver = if config.cache_brackets {
            JumpResolver::cached(code)
        } else {
            JumpResolver::Scan
        };
        Ok(Self {
            code,
            state,
            resolver,
            step_limit: config.step_limit,
            steps: 0,
        })
    }

    pub fn is_halted(&self) -> bool {
        self.state.code_ptr >= self.code.len()
    }

    /// Instructions executed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn state(&self) -> &InterpreterState {
        &self.state
    }

    /// Mutable access to the state, e.g. to preload cells before running.
    pub fn state_mut(&mut self) -> &mut InterpreterState {
        &mut self.state
    }

    pub fn output(&self) -> &[u8] {
        &self.state.output
    }

    pub fn into_output(self) -> Vec<u8> {
        self.state.output
    }

    /// Execute one instruction. Returns false without doing anything if the
    /// program has already halted.
    pub fn step(&mut self) -> Result<bool, ExecError> {
        if self.is_halted() {
            return Ok(false);
        }
        step(self.code, &mut self.state, &self.resolver)?;
        self.steps += 1;
        Ok(true)
    }

    /// Execute up to `max_steps` instructions, stopping early if the program
    /// halts. Returns how many were executed. Ignores the configured step
    /// limit; the caller owns the budget.
    pub fn run_for(&mut self, max_steps: usize) -> Result<usize, ExecError> {
        let mut executed = 0;
        while executed < max_steps && self.step()? {
            executed += 1;
        }
        Ok(executed)
    }

    /// Run until the program halts or the configured step limit is reached.
    pub fn run_to_end(mut self) -> Result<RunReport, ExecError> {
        debug!(
            code_len = self.code.len(),
            memory_size = self.state.mem.len(),
            input_len = self.state.inputs.len(),
            step_limit = ?self.step_limit,
            "run start"
        );

        match self.step_limit {
            Some(limit) => {
                let remaining = limit.saturating_sub(self.steps);
                self.run_for(remaining)?;
            }
            None => {
                while self.step()? {}
            }
        }

        let halted = self.is_halted();
        if halted {
            debug!(steps = self.steps, output_len = self.state.output.len(), "run halted");
        } else {
            warn!(
                steps = self.steps,
                code_ptr = self.state.code_ptr,
                output_len = self.state.output.len(),
                "step limit reached before the program halted"
            );
        }

        Ok(RunReport {
            steps: self.steps,
            halted,
            output: self.state.output,
        })
    }
}

/// Run `code` on `input` with a strict tape of `memory_size` cells and no
/// step limit, returning everything the program wrote.
///
/// A program that never halts makes this call never return; use
/// [`run_with_config`] with a step limit when that matters.
pub fn run_program(code: &[u8], input: &[u8], memory_size: usize) -> Result<Vec<u8>, ExecError> {
    let config = RunConfig {
        memory_size,
        step_limit: None,
        pointer_policy: PointerPolicy::Strict,
        cache_brackets: false,
    };
    Ok(run_with_config(code, input, &config)?.output)
}

pub fn run_with_config(code: &[u8], input: &[u8], config: &RunConfig) -> Result<RunReport, ExecError> {
    Interpreter::new(code, input, config)?.run_to_end()
}
