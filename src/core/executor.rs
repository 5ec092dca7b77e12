//! Command execution module.
//!
//! Runs formatted command lines through a shell, captures their standard
//! output and copies it to the terminal. The child is waited for without a
//! timeout: a command that never exits blocks the invocation.

use std::io::{self, Write};
use std::path::Path;
use std::process::{Command as ProcessCommand, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use crossterm::style::Stylize;

/// Result of executing a command.
#[derive(Debug)]
pub struct ExecutionResult {
    /// Exit status of the command
    pub status: ExitStatus,

    /// Captured standard output
    pub stdout: Vec<u8>,

    /// Time taken to execute
    pub duration: Duration,
}

impl ExecutionResult {
    /// Check if the command succeeded (exit code 0).
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Exit code, with termination by signal reported as 1.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(1)
    }
}

/// Shell command runner shared by all leaf commands.
#[derive(Debug, Clone)]
pub struct Executor {
    /// Shell used as `<shell> -c <command>`
    pub shell: String,

    /// Print commands instead of running them
    pub dry_run: bool,
}

impl Default for Executor {
    fn default() -> Self {
        Self { shell: "sh".to_string(), dry_run: false }
    }
}

impl Executor {
    /// Create a new executor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shell.
    #[must_use]
    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Set dry-run mode.
    #[must_use]
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Run `command` with captured stdout. Stderr passes through.
    pub fn execute(&self, command: &str) -> anyhow::Result<ExecutionResult> {
        let start = Instant::now();
        tracing::debug!(shell = %self.shell, command, "Executing shell command");

        let output = ProcessCommand::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()?;

        Ok(ExecutionResult {
            status: output.status,
            stdout: output.stdout,
            duration: start.elapsed(),
        })
    }

    /// Echo `command`, run it and copy its output to stdout.
    pub fn run(&self, command: &str) -> anyhow::Result<i32> {
        self.run_to(command, true, &mut io::stdout())
    }

    /// Run `command` without the echo line.
    pub fn run_quiet(&self, command: &str) -> anyhow::Result<i32> {
        self.run_to(command, false, &mut io::stdout())
    }

    /// Run `command`, writing the optional echo line and its output to `out`.
    ///
    /// A closed output pipe ends the command cleanly with code 0. Otherwise
    /// the child's exit code is returned as is.
    pub fn run_to<W: Write>(&self, command: &str, echo: bool, out: &mut W) -> anyhow::Result<i32> {
        if echo || self.dry_run {
            let line = format!("{}{}\n", "Command: ".cyan(), command.green());
            if let Some(code) = write_or_exit(out, line.as_bytes())? {
                return Ok(code);
            }
        }

        if self.dry_run {
            return Ok(0);
        }

        let result = self.execute(command)?;
        tracing::debug!(code = result.code(), duration = ?result.duration, "Command finished");

        if let Some(code) = write_or_exit(out, &result.stdout)? {
            return Ok(code);
        }

        Ok(result.code())
    }

    /// Print a plain line of text between commands.
    ///
    /// Returns `Some(0)` when stdout is closed and the caller should stop.
    pub fn print_line(&self, line: &str) -> anyhow::Result<Option<i32>> {
        Ok(write_or_exit(&mut io::stdout(), format!("{line}\n").as_bytes())?)
    }

    /// Write `contents` to a temporary template file, run the command built
    /// from its path quietly and remove the file afterwards.
    pub fn run_with_template<F>(&self, prefix: &str, contents: &str, build: F) -> anyhow::Result<i32>
    where
        F: FnOnce(&Path) -> String,
    {
        let mut template = tempfile::Builder::new().prefix(prefix).suffix(".j2").tempfile()?;
        template.write_all(contents.as_bytes())?;
        template.flush()?;

        let command = build(template.path());
        self.run_quiet(&command)
    }
}

/// Result of writing to an output stream, with a closed pipe turned into
/// `Some(0)`, the exit code the caller should stop with.
///
/// Any other I/O error is passed through.
pub fn closed_pipe_exit(result: io::Result<()>) -> io::Result<Option<i32>> {
    match result {
        Ok(()) => Ok(None),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            tracing::debug!("Output pipe closed");
            Ok(Some(0))
        }
        Err(e) => Err(e),
    }
}

/// Write and flush, mapping a broken pipe to a clean exit code.
fn write_or_exit<W: Write>(out: &mut W, bytes: &[u8]) -> io::Result<Option<i32>> {
    closed_pipe_exit(out.write_all(bytes).and_then(|()| out.flush()))
}
