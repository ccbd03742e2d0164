use std::io::{self, BufRead};

use log::{debug, info};

use crate::config::Config;
use crate::error::ShellError;
use crate::executor::builtins::FAREWELL;
use crate::executor::{Dispatcher, Executor, Flow};
use crate::history::History;
use crate::lexer::{Lexer, Token};
use crate::prompt::ShellPrompt;
use crate::sequencer::sequence;

/// The read loop: prompt, read, tokenize, sequence, dispatch.
pub struct Shell<R, E: Executor> {
    config: Config,
    prompt: ShellPrompt<R>,
    dispatcher: Dispatcher<E>,
    history: History,
}

impl<R: BufRead, E: Executor> Shell<R, E> {
    pub fn new(config: Config, input: R, executor: E) -> Self {
        let prompt = ShellPrompt::new(input, config.prompt.clone(), config.max_input);
        Shell {
            config,
            prompt,
            dispatcher: Dispatcher::new(executor),
            history: History::new(),
        }
    }

    /// Runs until `exit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        println!("{}", self.config.welcome);

        loop {
            self.prompt.show_prompt()?;
            let Some(line) = self.prompt.read_line()? else {
                // EOF (e.g., Ctrl-D)
                println!();
                println!("{}", FAREWELL);
                info!("end of input");
                return Ok(());
            };

            if self.process_line(&line) == Flow::Stop {
                info!("exit requested");
                return Ok(());
            }
        }
    }

    /// Runs one input line and records it as the previous line.
    pub fn process_line(&mut self, line: &str) -> Flow {
        let tokens = Lexer::tokenize(line);
        debug!("tokens: {:?}", tokens);

        let flow = if tokens.len() > self.config.max_tokens {
            let err = ShellError::TooManyTokens {
                count: tokens.len(),
                limit: self.config.max_tokens,
            };
            eprintln!("mini-shell: {}", err);
            Flow::Continue
        } else {
            self.run_tokens(tokens.clone())
        };

        // `prev` on the next line sees this one, whatever happened to it
        self.history.record(tokens);
        flow
    }

    fn run_tokens(&mut self, tokens: Vec<Token>) -> Flow {
        for action in sequence(tokens) {
            if self.dispatcher.dispatch(&action, &self.history) == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Continue
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn dispatcher(&self) -> &Dispatcher<E> {
        &self.dispatcher
    }
}
