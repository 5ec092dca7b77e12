//! Routing error types.

use thiserror::Error;

use super::registry::NodeId;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Errors raised while building the command tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Node id does not belong to this registry.
    #[error("Unknown node id {0}")]
    UnknownNode(NodeId),

    /// Children can only be attached to groups.
    #[error("'{0}' is a command, not a group")]
    NotAGroup(String),

    /// A parent already holds a child under this name.
    #[error("Group '{group}' already has a child named '{name}'")]
    DuplicateChild { group: String, name: String },

    /// Command names must not be empty.
    #[error("Command names must not be empty")]
    EmptyName,
}

/// Dispatch-level usage errors.
///
/// These terminate the current invocation and are reported to the user
/// together with the usage line of the group where they occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// An abbreviation matched more than one child.
    #[error("Too many matches: {}", candidates.join(", "))]
    Ambiguous { path: Vec<String>, candidates: Vec<String> },

    /// Nothing matched and the group has no default child.
    #[error("No such command \"{name}\".")]
    NoSuchCommand { path: Vec<String>, name: String },

    /// A flag was given at group level.
    #[error("No such option: {option}")]
    NoSuchOption { path: Vec<String>, option: String },

    /// Default children point back at a group already visited for the same argument.
    #[error("Default command of '{}' loops back on itself", path.join(" "))]
    DefaultCycle { path: Vec<String> },
}

impl DispatchError {
    /// Command path of the group the error was raised at.
    pub fn path(&self) -> &[String] {
        match self {
            Self::Ambiguous { path, .. }
            | Self::NoSuchCommand { path, .. }
            | Self::NoSuchOption { path, .. }
            | Self::DefaultCycle { path } => path,
        }
    }
}
