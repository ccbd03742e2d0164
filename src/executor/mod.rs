pub mod builtins;
pub mod process;
pub mod redirect;

#[cfg(test)]
pub(crate) mod tests;

pub use builtins::{BuiltinCommand, BuiltinContext, BuiltinManager, Dispatcher};
pub use process::ProcessExecutor;
pub use redirect::{RedirectResolver, ResolvedCommand};

use crate::error::ShellResult;

/// What the read loop does after a dispatch action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Runs resolved commands to completion.
pub trait Executor {
    /// Runs one command and returns its exit status.
    fn run(&mut self, cmd: &ResolvedCommand) -> ShellResult<i32>;
    /// Runs two commands concurrently with `lhs` stdout feeding `rhs` stdin.
    fn run_pipe(&mut self, lhs: &ResolvedCommand, rhs: &ResolvedCommand) -> ShellResult<()>;
}
