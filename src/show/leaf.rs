//! Leaf commands backed by a shell invocation.

use std::sync::Arc;

use clap::ArgMatches;

use crate::core::{closed_pipe_exit, Action, Executor, Invocation};

/// Turns parsed arguments into work for the executor.
pub type Handler = fn(&ArgMatches, &Executor) -> anyhow::Result<i32>;

/// A leaf whose arguments are parsed with clap and whose body runs through
/// the shared [`Executor`].
pub struct ShellCommand {
    cli: clap::Command,
    handler: Handler,
    executor: Arc<Executor>,
}

impl ShellCommand {
    /// Create a leaf from its argument definition and handler.
    pub fn new(cli: clap::Command, handler: Handler, executor: Arc<Executor>) -> Self {
        Self { cli, handler, executor }
    }

    /// Name of the command.
    pub fn name(&self) -> &str {
        self.cli.get_name()
    }

    /// One-line help from the argument definition.
    pub fn about(&self) -> String {
        self.cli.get_about().map(ToString::to_string).unwrap_or_default()
    }
}

impl Action for ShellCommand {
    fn execute(&self, invocation: &Invocation<'_>) -> anyhow::Result<i32> {
        // `?` is a help flag everywhere in this CLI, clap only knows -h/--help.
        let argv = invocation.args.iter().map(|arg| if arg == "?" { "--help" } else { arg.as_str() });

        let cli = self.cli.clone().no_binary_name(true).bin_name(invocation.command_line());
        match cli.try_get_matches_from(argv) {
            Ok(matches) => (self.handler)(&matches, &self.executor),
            Err(e) => Ok(parse_error_exit(&e, e.print())?),
        }
    }
}

/// Exit code after clap reported `error`, given how printing it went.
fn parse_error_exit(error: &clap::Error, printed: std::io::Result<()>) -> std::io::Result<i32> {
    Ok(closed_pipe_exit(printed)?.unwrap_or_else(|| error.exit_code()))
}
