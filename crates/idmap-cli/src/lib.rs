//! idmap-cli library
//!
//! Command surface, dispatch and output formatting for the `idmap` binary.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod output;
pub mod run;

#[cfg(test)]
mod tests;

pub use cli::Cli;
pub use commands::Commands;
pub use error::{CliError, CliResult};
pub use output::{Output, OutputFormat};
pub use run::{dispatch, load_config};
