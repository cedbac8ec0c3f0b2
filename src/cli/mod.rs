pub mod args;
pub mod commands;

pub use args::{Cli, Commands, EventArgs, OutputFormat};
pub use commands::run;
