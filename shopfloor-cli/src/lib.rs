//! Shopfloor command-line interface
//!
//! [`cli`] holds the clap definition; [`run`] opens the board, executes the
//! command through the operation processor and renders the result.

pub mod cli;
pub mod run;

pub use cli::{Cli, Commands, OutputFormat};
pub use run::{format_output, run};
