use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use braintape::batch::{BatchConfig, run_random_batch};
use braintape::demo::{ECHO_DEMO, ECHO_INPUT};
use braintape::tape::{DEFAULT_MEMORY_SIZE, PointerPolicy};
use braintape::{RunConfig, RunReport, logging, run_with_config};
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "braintape", version, about = "Brainfuck interpreter on a fixed byte tape")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a program read from a file.
    Run {
        /// Program source. Every byte is read; non-instructions are comments.
        program: PathBuf,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Run a program given on the command line.
    Eval {
        code: String,
        #[command(flatten)]
        run: RunArgs,
    },
    /// Run the bundled hello-world-and-echo program.
    Demo,
    /// Run a batch of random programs in parallel and report throughput.
    Bench {
        /// Random seed for reproducibility.
        #[arg(long)]
        seed: u64,

        /// Number of programs to run.
        #[arg(long, default_value_t = 1 << 12)]
        programs: usize,

        /// Bytes per program.
        #[arg(long, default_value_t = 64)]
        program_size: usize,

        /// Max steps per program execution.
        #[arg(long, default_value_t = 1 << 13)]
        step_limit: usize,

        /// Cells on each tape.
        #[arg(long, default_value_t = DEFAULT_MEMORY_SIZE)]
        memory_size: usize,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Input bytes, given as text.
    #[arg(long, conflicts_with = "input_file")]
    input: Option<String>,

    /// Read input bytes from a file.
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// Cells on the tape. The cursor starts in the middle.
    #[arg(long, default_value_t = DEFAULT_MEMORY_SIZE)]
    memory_size: usize,

    /// Stop after this many instructions.
    #[arg(long)]
    step_limit: Option<usize>,

    /// Wrap the memory pointer around the tape instead of failing.
    #[arg(long)]
    wrap_pointer: bool,

    /// Resolve jumps from a precomputed bracket table.
    #[arg(long)]
    cache_brackets: bool,
}

impl RunArgs {
    fn config(&self) -> RunConfig {
        RunConfig {
            memory_size: self.memory_size,
            step_limit: self.step_limit,
            pointer_policy: if self.wrap_pointer {
                PointerPolicy::Wrap
            } else {
                PointerPolicy::Strict
            },
            cache_brackets: self.cache_brackets,
        }
    }

    fn input_bytes(&self) -> Result<Vec<u8>> {
        if let Some(path) = &self.input_file {
            return std::fs::read(path).with_context(|| format!("reading input {}", path.display()));
        }
        Ok(self.input.as_deref().unwrap_or("").as_bytes().to_vec())
    }
}

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    match cli.command {
        Command::Run { program, run } => {
            let code = std::fs::read(&program).with_context(|| format!("reading program {}", program.display()))?;
            execute(&code, &run)
        }
        Command::Eval { code, run } => execute(code.as_bytes(), &run),
        Command::Demo => {
            let report = run_with_config(ECHO_DEMO, ECHO_INPUT, &RunConfig::default())?;
            println!("output: {}", String::from_utf8_lossy(&report.output));
            Ok(ExitCode::SUCCESS)
        }
        Command::Bench {
            seed,
            programs,
            program_size,
            step_limit,
            memory_size,
        } => {
            let config = BatchConfig {
                programs,
                program_size,
                step_limit,
                memory_size,
            };
            run_benchmark(&config, seed)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn execute(code: &[u8], args: &RunArgs) -> Result<ExitCode> {
    let input = args.input_bytes()?;
    let RunReport { output, halted, .. } = run_with_config(code, &input, &args.config())?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&output).context("writing output")?;
    stdout.flush().context("writing output")?;

    if halted {
        Ok(ExitCode::SUCCESS)
    } else {
        eprintln!("step limit reached; output is partial");
        Ok(ExitCode::from(2))
    }
}

fn run_benchmark(config: &BatchConfig, seed: u64) -> Result<()> {
    let start = std::time::Instant::now();
    let summary = run_random_batch(config, seed)?;
    let elapsed = start.elapsed();

    let steps_per_sec = summary.total_steps as f64 / elapsed.as_secs_f64();
    let programs_per_sec = summary.programs() as f64 / elapsed.as_secs_f64();

    eprintln!("Benchmark results:");
    eprintln!("  Programs:          {}", summary.programs());
    eprintln!("  Program size:      {}", config.program_size);
    eprintln!("  Halted:            {}", summary.halted);
    eprintln!("  Out of steps:      {}", summary.out_of_steps);
    eprintln!("  Bounds faults:     {}", summary.bounds_faults);
    eprintln!("  Bracket faults:    {}", summary.bracket_faults);
    eprintln!("  Total steps:       {}", summary.total_steps);
    eprintln!("  Output bytes:      {}", summary.total_output);
    eprintln!("  Elapsed:           {elapsed:.2?}");
    eprintln!("  Programs/sec:      {programs_per_sec:.1}");
    eprintln!("  Steps/sec:         {steps_per_sec:.0}");
    Ok(())
}
