//! Load phase implementations
//!
//! The script runner persists and executes an operator-supplied load script;
//! the signal sources implement the manual and timed variants of the
//! load-completion checkpoint.

mod script_runner;
mod signal;

pub use script_runner::ShellScriptRunner;
pub use signal::{ConsoleSignal, TimeoutSignal};
