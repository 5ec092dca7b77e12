//! Name resolution within a single group.
//!
//! A typed token is matched against a group's children in strict order:
//!
//! 1. exact (case-sensitive) child name
//! 2. alias whose canonical name is an exact child name
//! 3. unique case-insensitive prefix of a child name
//! 4. the group's default child, which receives the token as its first argument
//!
//! Steps 2 and 3 only apply to groups with [`MatchPolicy::Aliased`].

use super::alias::AliasTable;
use super::registry::{MatchPolicy, NodeId, Registry};

/// Outcome of resolving one token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The token names this child.
    Found(NodeId),

    /// Nothing matched; the default child takes the token as an argument.
    FoundDefault { node: NodeId, implicit_arg: String },

    /// The token abbreviates several children (sorted).
    TooManyMatches(Vec<String>),

    /// Nothing matched and there is no default child.
    NotFound,
}

/// Resolves tokens against an immutable registry and alias table.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    registry: &'a Registry,
    aliases: &'a AliasTable,
}

impl<'a> Resolver<'a> {
    /// Create a resolver.
    pub fn new(registry: &'a Registry, aliases: &'a AliasTable) -> Self {
        Self { registry, aliases }
    }

    /// The registry being resolved against.
    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    /// Resolve `token` among the children of `group`.
    ///
    /// Unknown ids and command nodes have no children and resolve to
    /// [`Resolution::NotFound`].
    pub fn resolve(&self, group: NodeId, token: &str) -> Resolution {
        let Ok(node) = self.registry.group(group) else {
            return Resolution::NotFound;
        };

        if let Some(child) = node.child(token) {
            tracing::debug!(group = %node.name, token, "Resolved exact command");
            return Resolution::Found(child);
        }

        if node.policy() == MatchPolicy::Aliased {
            if let Some(canonical) = self.aliases.lookup(token) {
                if let Some(child) = node.child(canonical) {
                    tracing::debug!(group = %node.name, token, canonical, "Resolved alias");
                    return Resolution::Found(child);
                }
                tracing::debug!(
                    group = %node.name,
                    token,
                    canonical,
                    "Alias target is not a command here, falling through"
                );
            }

            let needle = token.to_lowercase();
            let matches: Vec<(&str, NodeId)> = node
                .children()
                .iter()
                .filter(|(name, _)| name.to_lowercase().starts_with(&needle))
                .map(|(name, id)| (name.as_str(), *id))
                .collect();

            match matches.as_slice() {
                [] => {}
                [(name, id)] => {
                    tracing::debug!(group = %node.name, token, command = *name, "Resolved abbreviation");
                    return Resolution::Found(*id);
                }
                _ => {
                    let mut names: Vec<String> =
                        matches.iter().map(|(name, _)| (*name).to_string()).collect();
                    names.sort();
                    tracing::debug!(group = %node.name, token, ?names, "Ambiguous abbreviation");
                    return Resolution::TooManyMatches(names);
                }
            }
        }

        match node.default_child() {
            Some(default) => {
                tracing::debug!(group = %node.name, token, "Falling back to default command");
                Resolution::FoundDefault { node: default, implicit_arg: token.to_string() }
            }
            None => Resolution::NotFound,
        }
    }
}
