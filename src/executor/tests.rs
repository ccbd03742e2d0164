use crate::error::ShellResult;
use crate::executor::{Executor, ResolvedCommand};

/// Records what would have been spawned.
#[derive(Debug, Default)]
pub struct MockExecutor {
    pub runs: Vec<ResolvedCommand>,
    pub pipes: Vec<(ResolvedCommand, ResolvedCommand)>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn programs(&self) -> Vec<&str> {
        self.runs.iter().filter_map(ResolvedCommand::program).collect()
    }
}

impl Executor for MockExecutor {
    fn run(&mut self, cmd: &ResolvedCommand) -> ShellResult<i32> {
        self.runs.push(cmd.clone());
        Ok(0)
    }

    fn run_pipe(&mut self, lhs: &ResolvedCommand, rhs: &ResolvedCommand) -> ShellResult<()> {
        self.pipes.push((lhs.clone(), rhs.clone()));
        Ok(())
    }
}
