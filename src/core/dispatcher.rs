//! Argument-vector dispatch.
//!
//! Walks from the root group through nested groups, resolving one token per
//! level, until a command is reached. The command's action then receives
//! whatever arguments are left. Groups that run out of arguments show their
//! help unless they are configured to run their default child instead.

use std::io::{self, Write};

use super::action::Invocation;
use super::alias::AliasTable;
use super::error::DispatchError;
use super::executor::closed_pipe_exit;
use super::registry::{Node, NodeId, Registry};
use super::resolver::{Resolution, Resolver};

/// Exit code for success and for help output.
pub const EXIT_SUCCESS: i32 = 0;

/// Exit code when an action fails without producing its own code.
pub const EXIT_FAILURE: i32 = 1;

/// Exit code for dispatch-level usage errors.
pub const EXIT_USAGE: i32 = 2;

/// Tokens that request help at group level.
pub const HELP_TOKENS: &[&str] = &["-h", "--help", "?"];

/// Where an argument vector leads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Run this command with these arguments.
    Command { node: NodeId, path: Vec<String>, args: Vec<String> },

    /// Show help for this group.
    Help { group: NodeId, path: Vec<String> },
}

/// Per-invocation walk state.
struct ResolutionContext<'a> {
    args: &'a [String],
    index: usize,
    path: Vec<String>,
    current: NodeId,
    // Groups entered through default fallback since the last consumed token.
    entered: Vec<NodeId>,
}

impl<'a> ResolutionContext<'a> {
    fn new(root: NodeId, root_name: &str, args: &'a [String]) -> Self {
        Self { args, index: 0, path: vec![root_name.to_string()], current: root, entered: vec![root] }
    }

    fn token(&self) -> Option<&'a str> {
        self.args.get(self.index).map(String::as_str)
    }

    fn consume(&mut self) {
        self.index += 1;
        self.entered.clear();
    }
}

/// Routes argument vectors through a registry and runs the result.
#[derive(Debug)]
pub struct Dispatcher<'a> {
    resolver: Resolver<'a>,
}

impl<'a> Dispatcher<'a> {
    /// Create a dispatcher over an immutable registry and alias table.
    pub fn new(registry: &'a Registry, aliases: &'a AliasTable) -> Self {
        Self { resolver: Resolver::new(registry, aliases) }
    }

    fn registry(&self) -> &'a Registry {
        self.resolver.registry()
    }

    /// Work out where `args` lead without running anything.
    pub fn route(&self, args: &[String]) -> Result<Route, DispatchError> {
        let registry = self.registry();
        let root = registry.root();
        let root_name = registry.node(root).map_or("", Node::name);
        let mut ctx = ResolutionContext::new(root, root_name, args);

        loop {
            let Ok(group) = registry.group(ctx.current) else {
                let name = ctx.token().unwrap_or_default().to_string();
                return Err(DispatchError::NoSuchCommand { path: ctx.path, name });
            };

            let Some(token) = ctx.token() else {
                match group.default_child() {
                    Some(default) if group.invokes_default_without_args() => {
                        tracing::debug!(group = %group.name, "No arguments, running default");
                        if let Some(route) = self.descend(&mut ctx, default, true)? {
                            return Ok(route);
                        }
                        continue;
                    }
                    _ => return Ok(Route::Help { group: ctx.current, path: ctx.path }),
                }
            };

            if HELP_TOKENS.contains(&token) {
                return Ok(Route::Help { group: ctx.current, path: ctx.path });
            }
            if token.len() > 1 && token.starts_with('-') {
                return Err(DispatchError::NoSuchOption { path: ctx.path, option: token.to_string() });
            }

            let step = match self.resolver.resolve(ctx.current, token) {
                Resolution::Found(node) => {
                    ctx.consume();
                    self.descend(&mut ctx, node, false)?
                }
                // The token stays in place and becomes the default's first argument.
                Resolution::FoundDefault { node, .. } => self.descend(&mut ctx, node, true)?,
                Resolution::TooManyMatches(candidates) => {
                    return Err(DispatchError::Ambiguous { path: ctx.path, candidates });
                }
                Resolution::NotFound => {
                    return Err(DispatchError::NoSuchCommand {
                        path: ctx.path,
                        name: token.to_string(),
                    });
                }
            };

            if let Some(route) = step {
                return Ok(route);
            }
        }
    }

    /// Move into `node`. Returns a route once a command is reached.
    fn descend(
        &self,
        ctx: &mut ResolutionContext<'_>,
        node: NodeId,
        via_default: bool,
    ) -> Result<Option<Route>, DispatchError> {
        match self.registry().node(node) {
            Some(Node::Group(group)) => {
                if via_default && ctx.entered.contains(&node) {
                    return Err(DispatchError::DefaultCycle { path: ctx.path.clone() });
                }
                ctx.entered.push(node);
                ctx.path.push(group.name.clone());
                ctx.current = node;
                Ok(None)
            }
            Some(Node::Command(command)) => {
                let mut path = std::mem::take(&mut ctx.path);
                path.push(command.name.clone());
                Ok(Some(Route::Command { node, path, args: ctx.args[ctx.index..].to_vec() }))
            }
            None => Err(DispatchError::NoSuchCommand {
                path: ctx.path.clone(),
                name: node.to_string(),
            }),
        }
    }

    /// Route `args`, run the command and return the process exit code.
    ///
    /// Help goes to stdout, usage errors to stderr.
    pub fn dispatch(&self, args: &[String]) -> i32 {
        self.dispatch_to(args, &mut io::stdout(), &mut io::stderr())
    }

    /// Like [`Dispatcher::dispatch`] with explicit output streams for help
    /// and error reports. Actions still write wherever they write.
    ///
    /// A closed output pipe ends the invocation with 0. Other write
    /// failures on `out` exit with 1.
    pub fn dispatch_to<O: Write, E: Write>(&self, args: &[String], out: &mut O, err: &mut E) -> i32 {
        match self.route(args) {
            Ok(Route::Command { node, path, args }) => {
                let Some(command) = self.registry().node(node).and_then(Node::as_command) else {
                    return EXIT_FAILURE;
                };
                tracing::debug!(command = %path.join(" "), ?args, "Running command");

                match command.action().execute(&Invocation::new(&path, &args)) {
                    Ok(code) => code,
                    Err(e) => {
                        tracing::debug!(error = %e, "Command failed");
                        report(err, &format!("Error: {e:#}\n"), EXIT_FAILURE)
                    }
                }
            }
            Ok(Route::Help { group, path }) => {
                let help = self.render_help(group, &path);
                match closed_pipe_exit(out.write_all(help.as_bytes()).and_then(|()| out.flush())) {
                    Ok(closed) => closed.unwrap_or(EXIT_SUCCESS),
                    Err(e) => report(err, &format!("Error: {e}\n"), EXIT_FAILURE),
                }
            }
            Err(e) => report(err, &render_usage_error(&e), EXIT_USAGE),
        }
    }

    /// Help text for a group reached via `path`.
    pub fn render_help(&self, group: NodeId, path: &[String]) -> String {
        let registry = self.registry();
        let mut text = format!("{}\n", usage_line(path));

        let Ok(node) = registry.group(group) else {
            return text;
        };

        if !node.help.is_empty() {
            text.push_str(&format!("\n  {}\n", node.help));
        }
        text.push_str("\nOptions:\n  -?, -h, --help  Show this message and exit.\n");

        let children: Vec<(&str, &str)> = node
            .children()
            .iter()
            .filter_map(|(name, id)| registry.node(*id).map(|n| (name.as_str(), n.help())))
            .collect();
        if !children.is_empty() {
            let width = children.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
            text.push_str("\nCommands:\n");
            for (name, help) in children {
                let line = format!("  {name:<width$}  {help}");
                text.push_str(line.trim_end());
                text.push('\n');
            }
        }

        text
    }
}

/// Write `message` to the error stream and return `code`. Failures of the
/// error stream itself can only be logged.
fn report<E: Write>(err: &mut E, message: &str, code: i32) -> i32 {
    if let Err(e) = closed_pipe_exit(err.write_all(message.as_bytes()).and_then(|()| err.flush())) {
        tracing::warn!(error = %e, "Failed to write error report");
    }
    code
}

fn usage_line(path: &[String]) -> String {
    format!("Usage: {} [OPTIONS] COMMAND [ARGS]...", path.join(" "))
}

/// Usage error report in the form printed on stderr.
pub fn render_usage_error(error: &DispatchError) -> String {
    let path = error.path().join(" ");
    format!("{}\nTry \"{path} -h\" for help.\n\nError: {error}\n", usage_line(error.path()))
}
