//! Command registry: the tree of groups and commands.
//!
//! Nodes live in an arena and are referred to by [`NodeId`]. A group's
//! children are `(name, NodeId)` pairs, so the same node can sit under
//! several parents, e.g. `show bgp` and `show ip bgp` reach one group.
//! The registry is append-only; nothing is ever detached.

use std::fmt;
use std::sync::Arc;

use super::action::Action;
use super::error::{RegistryError, RegistryResult};

/// Handle to a node in a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How much of the resolution strategy a group applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Exact name, then alias, then unambiguous abbreviation.
    #[default]
    Aliased,

    /// Exact names only.
    Exact,
}

/// A leaf node.
pub struct CommandNode {
    /// Identifier shown in help listings
    pub name: String,

    /// One-line help text
    pub help: String,

    action: Arc<dyn Action>,
}

impl CommandNode {
    /// The action run when this command is reached.
    pub fn action(&self) -> &dyn Action {
        self.action.as_ref()
    }
}

impl fmt::Debug for CommandNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandNode").field("name", &self.name).field("help", &self.help).finish()
    }
}

/// An internal routing node.
#[derive(Debug, Clone)]
pub struct GroupNode {
    /// Identifier shown in usage lines
    pub name: String,

    /// One-line help text
    pub help: String,

    /// Children in registration order
    children: Vec<(String, NodeId)>,

    /// Child invoked when nothing else matches
    default: Option<String>,

    /// Whether the default child runs when no arguments are left
    invoke_default_if_no_args: bool,

    /// Resolution strategy for this group
    policy: MatchPolicy,
}

impl GroupNode {
    fn new(name: String, help: String) -> Self {
        Self {
            name,
            help,
            children: Vec::new(),
            default: None,
            invoke_default_if_no_args: false,
            policy: MatchPolicy::default(),
        }
    }

    /// Children as `(name, id)` pairs in registration order.
    pub fn children(&self) -> &[(String, NodeId)] {
        &self.children
    }

    /// Exact, case-sensitive child lookup.
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.iter().find(|(n, _)| n == name).map(|(_, id)| *id)
    }

    /// Name of the default child, if one is configured.
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The default child, if configured and actually registered.
    pub fn default_child(&self) -> Option<NodeId> {
        self.default.as_deref().and_then(|name| self.child(name))
    }

    /// Whether an empty argument list runs the default child.
    pub fn invokes_default_without_args(&self) -> bool {
        self.invoke_default_if_no_args
    }

    /// Resolution strategy.
    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }
}

/// A node in the command tree.
#[derive(Debug)]
pub enum Node {
    Command(CommandNode),
    Group(GroupNode),
}

impl Node {
    /// Identifier of the node.
    pub fn name(&self) -> &str {
        match self {
            Self::Command(c) => &c.name,
            Self::Group(g) => &g.name,
        }
    }

    /// Help text of the node.
    pub fn help(&self) -> &str {
        match self {
            Self::Command(c) => &c.help,
            Self::Group(g) => &g.help,
        }
    }

    /// Borrow as a group.
    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            Self::Group(g) => Some(g),
            Self::Command(_) => None,
        }
    }

    /// Borrow as a command.
    pub fn as_command(&self) -> Option<&CommandNode> {
        match self {
            Self::Command(c) => Some(c),
            Self::Group(_) => None,
        }
    }
}

/// Arena of command tree nodes rooted at a single group.
#[derive(Debug)]
pub struct Registry {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Registry {
    /// Create a registry holding only the root group.
    pub fn new(root_name: impl Into<String>, root_help: impl Into<String>) -> Self {
        let root = Node::Group(GroupNode::new(root_name.into(), root_help.into()));
        Self { nodes: vec![root], root: NodeId(0) }
    }

    /// The root group.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get total number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a registry is created holding its root group. Kept as
    /// the counterpart of [`Registry::len`].
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Look up a node that must be a group.
    pub fn group(&self, id: NodeId) -> RegistryResult<&GroupNode> {
        let node = self.node(id).ok_or(RegistryError::UnknownNode(id))?;
        node.as_group().ok_or_else(|| RegistryError::NotAGroup(node.name().to_string()))
    }

    fn group_mut(&mut self, id: NodeId) -> RegistryResult<&mut GroupNode> {
        match self.nodes.get_mut(id.0) {
            Some(Node::Group(g)) => Ok(g),
            Some(Node::Command(c)) => Err(RegistryError::NotAGroup(c.name.clone())),
            None => Err(RegistryError::UnknownNode(id)),
        }
    }

    /// Create a group that is not yet attached anywhere.
    pub fn new_group(
        &mut self,
        name: impl Into<String>,
        help: impl Into<String>,
    ) -> RegistryResult<NodeId> {
        let name = non_empty(name.into())?;
        Ok(self.push(Node::Group(GroupNode::new(name, help.into()))))
    }

    /// Create a command that is not yet attached anywhere.
    pub fn new_command(
        &mut self,
        name: impl Into<String>,
        help: impl Into<String>,
        action: impl Action + 'static,
    ) -> RegistryResult<NodeId> {
        let name = non_empty(name.into())?;
        let node = CommandNode { name, help: help.into(), action: Arc::new(action) };
        Ok(self.push(Node::Command(node)))
    }

    /// Register an existing node under `parent` as `name`.
    ///
    /// A node may be attached to any number of parents.
    pub fn attach(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        child: NodeId,
    ) -> RegistryResult<()> {
        let name = non_empty(name.into())?;
        if self.node(child).is_none() {
            return Err(RegistryError::UnknownNode(child));
        }

        let group = self.group_mut(parent)?;
        if group.child(&name).is_some() {
            return Err(RegistryError::DuplicateChild { group: group.name.clone(), name });
        }

        tracing::trace!(group = %group.name, child = %name, "Registered child");
        group.children.push((name, child));
        Ok(())
    }

    /// Create a command and register it under `parent` by its own name.
    pub fn register_command(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        help: impl Into<String>,
        action: impl Action + 'static,
    ) -> RegistryResult<NodeId> {
        let name = name.into();
        // Validate the parent first so a failed registration leaves no orphan.
        self.group(parent)?;
        let id = self.new_command(name.clone(), help, action)?;
        self.attach(parent, name, id)?;
        Ok(id)
    }

    /// Create a group and register it under `parent` by its own name.
    pub fn register_group(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        help: impl Into<String>,
    ) -> RegistryResult<NodeId> {
        let name = name.into();
        self.group(parent)?;
        let id = self.new_group(name.clone(), help)?;
        self.attach(parent, name, id)?;
        Ok(id)
    }

    /// Child names of `group` in registration order.
    pub fn list_children(&self, group: NodeId) -> RegistryResult<Vec<&str>> {
        Ok(self.group(group)?.children.iter().map(|(name, _)| name.as_str()).collect())
    }

    /// Exact child lookup by name.
    pub fn child(&self, group: NodeId, name: &str) -> Option<NodeId> {
        self.group(group).ok().and_then(|g| g.child(name))
    }

    /// Configure the fallback child of `group`.
    ///
    /// The child does not have to be registered yet; a default naming a
    /// missing child behaves as if no default were set.
    pub fn set_default(
        &mut self,
        group: NodeId,
        child_name: impl Into<String>,
        invoke_on_no_args: bool,
    ) -> RegistryResult<()> {
        let group = self.group_mut(group)?;
        group.default = Some(non_empty(child_name.into())?);
        group.invoke_default_if_no_args = invoke_on_no_args;
        Ok(())
    }

    /// Set how `group` resolves typed names.
    pub fn set_policy(&mut self, group: NodeId, policy: MatchPolicy) -> RegistryResult<()> {
        self.group_mut(group)?.policy = policy;
        Ok(())
    }

    fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }
}

fn non_empty(name: String) -> RegistryResult<String> {
    if name.is_empty() {
        Err(RegistryError::EmptyName)
    } else {
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Invocation;

    fn noop(_: &Invocation<'_>) -> anyhow::Result<i32> {
        Ok(0)
    }

    #[test]
    fn test_registry_creation() {
        let registry = Registry::new("show", "Show commands");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.node(registry.root()).unwrap().name(), "show");
        assert!(registry.list_children(registry.root()).unwrap().is_empty());
    }

    #[test]
    fn test_children_keep_registration_order() {
        let mut registry = Registry::new("show", "");
        let root = registry.root();
        registry.register_command(root, "version", "", noop).unwrap();
        registry.register_command(root, "arp", "", noop).unwrap();
        registry.register_group(root, "lldp", "").unwrap();

        assert_eq!(registry.list_children(root).unwrap(), vec!["version", "arp", "lldp"]);
    }

    #[test]
    fn test_shared_group_under_two_parents() {
        let mut registry = Registry::new("show", "");
        let root = registry.root();
        let ip = registry.register_group(root, "ip", "").unwrap();
        let bgp = registry.new_group("bgp", "").unwrap();
        registry.attach(root, "bgp", bgp).unwrap();
        registry.attach(ip, "bgp", bgp).unwrap();

        assert_eq!(registry.child(root, "bgp"), Some(bgp));
        assert_eq!(registry.child(ip, "bgp"), Some(bgp));
    }

    #[test]
    fn test_duplicate_child_rejected() {
        let mut registry = Registry::new("show", "");
        let root = registry.root();
        registry.register_command(root, "ntp", "", noop).unwrap();

        let err = registry.register_command(root, "ntp", "", noop).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateChild { group: "show".to_string(), name: "ntp".to_string() }
        );
    }

    #[test]
    fn test_cannot_attach_under_command() {
        let mut registry = Registry::new("show", "");
        let root = registry.root();
        let uptime = registry.register_command(root, "uptime", "", noop).unwrap();

        let err = registry.register_command(uptime, "child", "", noop).unwrap_err();
        assert_eq!(err, RegistryError::NotAGroup("uptime".to_string()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_empty_name_rejected() {
        let mut registry = Registry::new("show", "");
        let root = registry.root();
        assert_eq!(registry.register_group(root, "", "").unwrap_err(), RegistryError::EmptyName);
    }

    #[test]
    fn test_set_default() {
        let mut registry = Registry::new("show", "");
        let root = registry.root();
        let lldp = registry.register_group(root, "lldp", "").unwrap();
        let neighbors = registry.register_command(lldp, "neighbors", "", noop).unwrap();
        registry.set_default(lldp, "neighbors", true).unwrap();

        let group = registry.group(lldp).unwrap();
        assert_eq!(group.default_name(), Some("neighbors"));
        assert_eq!(group.default_child(), Some(neighbors));
        assert!(group.invokes_default_without_args());
    }

    #[test]
    fn test_default_naming_missing_child() {
        let mut registry = Registry::new("show", "");
        let root = registry.root();
        registry.set_default(root, "ghost", false).unwrap();

        let group = registry.group(root).unwrap();
        assert_eq!(group.default_name(), Some("ghost"));
        assert_eq!(group.default_child(), None);
    }

    #[test]
    fn test_set_policy() {
        let mut registry = Registry::new("show", "");
        let root = registry.root();
        let ip = registry.register_group(root, "ip", "").unwrap();
        assert_eq!(registry.group(ip).unwrap().policy(), MatchPolicy::Aliased);

        registry.set_policy(ip, MatchPolicy::Exact).unwrap();
        assert_eq!(registry.group(ip).unwrap().policy(), MatchPolicy::Exact);
    }
}
