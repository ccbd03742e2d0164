use std::io;
use std::path::PathBuf;

use nix::errno::Errno;
use thiserror::Error;

pub type ShellResult<T> = Result<T, ShellError>;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("malformed command: missing file name after '{0}'")]
    MissingRedirectTarget(char),
    #[error("malformed command: empty command on one side of '|'")]
    EmptyPipeStage,
    #[error("too many tokens: {count} (limit {limit})")]
    TooManyTokens { count: usize, limit: usize },
    #[error("{0}: argument contains a NUL byte")]
    NulByte(String),
    #[error("pipe failed: {0}")]
    Pipe(Errno),
    #[error("fork failed: {0}")]
    Fork(Errno),
    #[error("wait failed: {0}")]
    Wait(Errno),
    #[error("No directory found: {}: {source}", path.display())]
    ChangeDir { path: PathBuf, source: io::Error },
    #[error("No source file found.")]
    NoSourceFile,
    #[error("Error changing file permissions: {}: {source}", path.display())]
    Permissions { path: PathBuf, source: io::Error },
    #[error("Error executing source command: {}: {source}", path.display())]
    SourceExec { path: PathBuf, source: Errno },
    #[error("no previous command")]
    NoPreviousCommand,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
