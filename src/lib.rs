pub mod error;
pub mod tape;
pub mod brackets;
pub mod state;
pub mod step;
pub mod config;
pub mod run;
pub mod batch;
pub mod demo;
pub mod logging;

pub use config::RunConfig;
pub use error::ExecError;
pub use run::{Interpreter, RunReport, run_program, run_with_config};
