use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rayon::prelude::*;
use tracing::debug;

use crate::config::RunConfig;
use crate::error::ExecError;
use crate::run::Interpreter;
use crate::step::INSTRUCTIONS;
use crate::tape::{DEFAULT_MEMORY_SIZE, PointerPolicy};

/// Configuration for a batch of random programs.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Number of programs to generate and run.
    pub programs: usize,
    /// Bytes per program.
    pub program_size: usize,
    /// Max steps per program execution.
    pub step_limit: usize,
    /// Tape length for every run.
    pub memory_size: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            programs: 1 << 12,
            program_size: 64,
            step_limit: 1 << 13,
            memory_size: DEFAULT_MEMORY_SIZE,
        }
    }
}

/// Aggregate outcome of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Programs that ran off the end of their code.
    pub halted: usize,
    /// Programs stopped by the step limit.
    pub out_of_steps: usize,
    /// Programs that touched a cell outside the tape.
    pub bounds_faults: usize,
    /// Programs that jumped through an unmatched bracket.
    pub bracket_faults: usize,
    /// Instructions executed across all programs, faulted ones included.
    pub total_steps: u64,
    /// Output bytes produced across all programs.
    pub total_output: u64,
}

impl BatchSummary {
    pub fn programs(&self) -> usize {
        self.halted + self.out_of_steps + self.bounds_faults + self.bracket_faults
    }

    fn merge(self, other: Self) -> Self {
        Self {
            halted: self.halted + other.halted,
            out_of_steps: self.out_of_steps + other.out_of_steps,
            bounds_faults: self.bounds_faults + other.bounds_faults,
            bracket_faults: self.bracket_faults + other.bracket_faults,
            total_steps: self.total_steps + other.total_steps,
            total_output: self.total_output + other.total_output,
        }
    }
}

/// Generate `count` programs of `size` bytes drawn from the instruction
/// alphabet. Deterministic for a given seed.
pub fn random_programs(count: usize, size: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            (0..size)
                .map(|_| INSTRUCTIONS[rng.gen_range(0..INSTRUCTIONS.len())])
                .collect()
        })
        .collect()
}

/// Run one program under the batch limits and fold the result into a
/// single-program summary.
fn run_one(code: &[u8], run_config: &RunConfig, step_limit: usize) -> Result<BatchSummary, ExecError> {
    let mut interp = Interpreter::new(code, b"", run_config)?;
    let result = interp.run_for(step_limit);
    let mut summary = BatchSummary {
        total_steps: interp.steps() as u64,
        total_output: interp.output().len() as u64,
        ..Default::default()
    };
    match result {
        Ok(_) if interp.is_halted() => summary.halted = 1,
        Ok(_) => summary.out_of_steps = 1,
        Err(ExecError::MemoryOutOfBounds { .. }) => summary.bounds_faults = 1,
        Err(ExecError::UnmatchedBracket { .. }) => summary.bracket_faults = 1,
        Err(e @ ExecError::InvalidMemorySize) => return Err(e),
    }
    Ok(summary)
}

/// Generate a batch of random programs and execute them all in parallel.
///
/// Generation is sequential and seeded, and the per-program tallies are
/// summed, so the summary does not depend on how rayon schedules the runs.
pub fn run_random_batch(config: &BatchConfig, seed: u64) -> Result<BatchSummary, ExecError> {
    if config.memory_size == 0 {
        return Err(ExecError::InvalidMemorySize);
    }

    let programs = random_programs(config.programs, config.program_size, seed);
    let run_config = RunConfig {
        memory_size: config.memory_size,
        step_limit: Some(config.step_limit),
        pointer_policy: PointerPolicy::Strict,
        cache_brackets: true,
    };

    let summary = programs
        .par_iter()
        .map(|code| run_one(code, &run_config, config.step_limit))
        .try_reduce(BatchSummary::default, |a, b| Ok(a.merge(b)))?;

    debug!(
        programs = summary.programs(),
        halted = summary.halted,
        out_of_steps = summary.out_of_steps,
        total_steps = summary.total_steps,
        "batch finished"
    );
    Ok(summary)
}
