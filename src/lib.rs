pub mod config;
pub mod error;
pub mod executor;
pub mod history;
pub mod lexer;
pub mod logging;
pub mod prompt;
pub mod repl;
pub mod sequencer;

pub use repl::Shell;
