//! show - read-only inspection CLI for network switches.
//!
//! Global flags are handled here; everything after them is routed through
//! the command tree by the dispatcher.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use sonic_show::show::{self, ROOT_HELP};
use sonic_show::{AliasTable, Config, Dispatcher, Executor};

/// SONiC command line - 'show' command
#[derive(Parser)]
#[command(name = "show")]
#[command(author, version, about = ROOT_HELP, long_about = None)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print commands instead of running them
    #[arg(long)]
    dry_run: bool,

    /// Configuration file (aliases and shell)
    #[arg(long, env = "SHOW_CONFIG", value_name = "PATH")]
    config: Option<PathBuf>,

    /// Command path followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "COMMAND")]
    args: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Ignoring unreadable config, using defaults");
        Config::default()
    });
    let aliases = AliasTable::from_config(&config);
    tracing::debug!(aliases = aliases.len(), shell = %config.general.shell, "Loaded configuration");

    let executor = Executor::new().shell(config.general.shell.as_str()).dry_run(cli.dry_run);
    let registry = show::build_registry(Arc::new(executor))?;

    let code = Dispatcher::new(&registry, &aliases).dispatch(&cli.args);

    let _ = io::stdout().flush();
    std::process::exit(code);
}
