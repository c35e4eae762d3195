//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod codes;
pub mod config_cmd;
pub mod filters;
pub mod util;
pub mod views;

use crate::cli::Command;
use crate::config::Context;
use crate::error::CliError;

/// Dispatch a config-bound command to the appropriate handler.
pub fn dispatch(cmd: Command, ctx: &Context) -> Result<(), CliError> {
    match cmd {
        Command::Filters(args) => filters::handle(args, ctx),
        Command::Views(args) => views::handle(args, ctx),
        Command::Codes(args) => codes::handle(args, ctx),
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
