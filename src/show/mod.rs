//! The `show` command tree.
//!
//! Groups that can be reached from more than one place (`interfaces`,
//! `bgp`, `arp`, `route` are available both at the top level and under
//! `ip`) are created once and attached to each parent, so
//! `show bgp summary` and `show ip bgp summary` run the same command.

pub mod commands;
mod leaf;

use std::sync::Arc;

pub use leaf::{Handler, ShellCommand};

use crate::core::{Executor, MatchPolicy, NodeId, Registry, RegistryResult};
use commands::Leaf;

/// Name of the root group and of the binary.
pub const ROOT_NAME: &str = "show";

/// Help text of the root group.
pub const ROOT_HELP: &str = "SONiC command line - 'show' command";

struct TreeBuilder {
    registry: Registry,
    executor: Arc<Executor>,
}

impl TreeBuilder {
    fn new(executor: Arc<Executor>) -> Self {
        Self { registry: Registry::new(ROOT_NAME, ROOT_HELP), executor }
    }

    fn root(&self) -> NodeId {
        self.registry.root()
    }

    /// Create a leaf without attaching it.
    fn detached_leaf(&mut self, (cli, handler): Leaf) -> RegistryResult<(String, NodeId)> {
        let action = ShellCommand::new(cli, handler, Arc::clone(&self.executor));
        let name = action.name().to_string();
        let id = self.registry.new_command(name.clone(), action.about(), action)?;
        Ok((name, id))
    }

    fn leaf(&mut self, parent: NodeId, leaf: Leaf) -> RegistryResult<NodeId> {
        let (name, id) = self.detached_leaf(leaf)?;
        self.registry.attach(parent, name, id)?;
        Ok(id)
    }

    fn group(&mut self, parent: NodeId, name: &str, help: &str) -> RegistryResult<NodeId> {
        self.registry.register_group(parent, name, help)
    }

    /// Attach `node` under every parent in `parents`.
    fn share(&mut self, parents: &[NodeId], name: &str, node: NodeId) -> RegistryResult<()> {
        for parent in parents {
            self.registry.attach(*parent, name, node)?;
        }
        Ok(())
    }
}

/// Build the full `show` tree.
///
/// All leaves run their commands through `executor`.
pub fn build_registry(executor: Arc<Executor>) -> RegistryResult<Registry> {
    let mut tree = TreeBuilder::new(executor);
    let root = tree.root();

    // Plain group: exact names only.
    let ip = tree.group(root, "ip", "Show IP commands")?;
    tree.registry.set_policy(ip, MatchPolicy::Exact)?;

    let interfaces = tree.registry.new_group("interfaces", "Show details of the network interfaces")?;
    tree.share(&[root, ip], "interfaces", interfaces)?;
    tree.leaf(interfaces, commands::interfaces_summary())?;
    tree.leaf(interfaces, commands::interfaces_counters())?;
    tree.leaf(interfaces, commands::interfaces_portchannel())?;
    tree.leaf(interfaces, commands::interfaces_sfp())?;

    let lldp = tree.group(root, "lldp", "LLDP (Link Layer Discovery Protocol) information")?;
    tree.leaf(lldp, commands::lldp_neighbors())?;
    tree.leaf(lldp, commands::lldp_table())?;
    // `show lldp Ethernet0` lists the neighbors of Ethernet0; bare `show lldp` prints help.
    tree.registry.set_default(lldp, "neighbors", false)?;

    let bgp = tree.registry.new_group("bgp", "Show BGP (Border Gateway Protocol) information")?;
    tree.share(&[root, ip], "bgp", bgp)?;
    tree.leaf(bgp, commands::bgp_neighbor())?;
    tree.leaf(bgp, commands::bgp_summary())?;

    let platform = tree.group(root, "platform", "Show platform-specific hardware info")?;
    tree.leaf(platform, commands::platform_summary())?;
    tree.leaf(platform, commands::platform_syseeprom())?;

    tree.leaf(root, commands::logging())?;
    tree.leaf(root, commands::version())?;
    tree.leaf(root, commands::environment())?;

    let processes = tree.group(root, "processes", "Display process information")?;
    tree.registry.set_policy(processes, MatchPolicy::Exact)?;
    tree.leaf(processes, commands::processes_cpu())?;

    tree.leaf(root, commands::users())?;
    tree.leaf(root, commands::techsupport())?;

    let running =
        tree.group(root, "runningconfiguration", "Show current running configuration information")?;
    tree.leaf(running, commands::running_bgp())?;
    tree.leaf(running, commands::running_interfaces())?;
    tree.leaf(running, commands::running_snmp())?;
    tree.leaf(running, commands::running_ntp())?;

    let startup = tree.group(root, "startupconfiguration", "Show startup configuration information")?;
    tree.leaf(startup, commands::startup_bgp())?;

    let (name, arp) = tree.detached_leaf(commands::arp())?;
    tree.share(&[root, ip], &name, arp)?;
    let (name, route) = tree.detached_leaf(commands::route())?;
    tree.share(&[root, ip], &name, route)?;

    tree.leaf(root, commands::ntp())?;
    tree.leaf(root, commands::uptime())?;

    tracing::debug!(nodes = tree.registry.len(), "Built command tree");
    Ok(tree.registry)
}
