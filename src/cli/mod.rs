//! Command-line interface
//!
//! `commands` defines the clap surface, `runner` executes it.

mod commands;
mod runner;

pub use commands::{Cli, Commands};
pub use runner::Runner;
