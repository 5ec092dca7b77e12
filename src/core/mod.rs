//! Core routing types for show.
//!
//! This module contains the command registry, the alias table, the
//! resolver that picks a child for a typed token, the dispatcher that
//! walks an argument vector, and the executor leaf commands run through.

mod action;
mod alias;
mod config;
mod dispatcher;
mod error;
mod executor;
mod registry;
mod resolver;

pub use action::{Action, Invocation};
pub use alias::AliasTable;
pub use config::{Config, GeneralConfig, LOCAL_CONFIG_FILE};
pub use dispatcher::{
    render_usage_error, Dispatcher, Route, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE, HELP_TOKENS,
};
pub use error::{DispatchError, RegistryError, RegistryResult};
pub use executor::{closed_pipe_exit, ExecutionResult, Executor};
pub use registry::{CommandNode, GroupNode, MatchPolicy, Node, NodeId, Registry};
pub use resolver::{Resolution, Resolver};
