//! The boundary between routing and the work a command performs.
//!
//! The dispatcher never looks at what an action prints. It hands over the
//! unconsumed arguments and takes back an exit code.

/// Everything an action learns about the invocation that reached it.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Names of the nodes walked from the root, root included.
    pub path: &'a [String],

    /// Arguments left after routing, verbatim and in order.
    pub args: &'a [String],
}

impl<'a> Invocation<'a> {
    /// Create an invocation.
    pub fn new(path: &'a [String], args: &'a [String]) -> Self {
        Self { path, args }
    }

    /// Command path joined for display, e.g. `show ip route`.
    pub fn command_line(&self) -> String {
        self.path.join(" ")
    }
}

/// A leaf command's behaviour.
///
/// The returned code becomes the process exit code unchanged.
pub trait Action: Send + Sync {
    /// Run the command.
    fn execute(&self, invocation: &Invocation<'_>) -> anyhow::Result<i32>;
}

impl<F> Action for F
where
    F: Fn(&Invocation<'_>) -> anyhow::Result<i32> + Send + Sync,
{
    fn execute(&self, invocation: &Invocation<'_>) -> anyhow::Result<i32> {
        self(invocation)
    }
}
