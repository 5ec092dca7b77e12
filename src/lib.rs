//! # sonic-show
//!
//! Read-only inspection CLI for network switches, built around a small
//! command router.
//!
//! Typed command names are resolved against a tree of groups and commands
//! in priority order: exact name, configured alias, unambiguous
//! abbreviation, and finally a group's default command, which receives
//! the unmatched word as its first argument.
//!
//! ## Quick Start
//!
//! ```bash
//! # Interface counters, spelled out or abbreviated
//! show interfaces counters
//! show int cou
//!
//! # The same BGP group is reachable from two places
//! show bgp summary
//! show ip bgp summary
//!
//! # Print commands instead of running them
//! show --dry-run route 10.0.0.0/8
//! ```
//!
//! Aliases live in the `[aliases]` section of `.show.toml` or
//! `~/.config/sonic-show/config.toml`:
//!
//! ```toml
//! [aliases]
//! neigh = "neighbors"
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::format_push_string)]

pub mod core;
pub mod show;

// Re-export commonly used types
pub use crate::core::{AliasTable, Config, Dispatcher, Executor, Registry};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
