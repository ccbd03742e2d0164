use std::path::PathBuf;

use crate::error::{ShellError, ShellResult};
use crate::lexer::Token;

/// A command group with its redirections pulled out.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedCommand {
    pub argv: Vec<String>,
    pub stdin: Option<PathBuf>,
    pub stdout: Option<PathBuf>,
}

impl ResolvedCommand {
    pub fn new<S: Into<String>>(argv: impl IntoIterator<Item = S>) -> Self {
        ResolvedCommand {
            argv: argv.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn program(&self) -> Option<&str> {
        self.argv.first().map(String::as_str)
    }

    /// An empty argument vector runs nothing.
    pub fn is_noop(&self) -> bool {
        self.argv.is_empty()
    }
}

pub struct RedirectResolver;

impl RedirectResolver {
    /// Removes every `< file` and `> file` pair from a command group.
    ///
    /// When an operator appears more than once the last target wins. An
    /// operator that is not followed by a word is a malformed command.
    /// Any other operator token is passed through as its literal text.
    pub fn resolve(group: &[Token]) -> ShellResult<ResolvedCommand> {
        let mut resolved = ResolvedCommand::default();
        let mut iter = group.iter();

        while let Some(token) = iter.next() {
            match token {
                Token::RedirectIn => resolved.stdin = Some(Self::target(iter.next(), '<')?),
                Token::RedirectOut => resolved.stdout = Some(Self::target(iter.next(), '>')?),
                other => resolved.argv.push(other.as_str().to_string()),
            }
        }

        Ok(resolved)
    }

    fn target(next: Option<&Token>, op: char) -> ShellResult<PathBuf> {
        match next {
            Some(Token::Word(file)) => Ok(PathBuf::from(file)),
            _ => Err(ShellError::MissingRedirectTarget(op)),
        }
    }
}
