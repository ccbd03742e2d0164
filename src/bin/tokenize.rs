use std::io::{self, BufRead};
use std::process::ExitCode;

use argh::FromArgs;

use mini_shell::config::DEFAULT_MAX_INPUT;
use mini_shell::lexer::Lexer;
use mini_shell::prompt::clip_line;

/// Print the tokens of one shell line, one per line.
#[derive(FromArgs)]
struct Args {
    /// the line to tokenize; read from stdin when omitted
    #[argh(positional, greedy)]
    words: Vec<String>,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let line = if args.words.is_empty() {
        let mut buf = String::new();
        if let Err(e) = io::stdin().lock().read_line(&mut buf) {
            eprintln!("tokenize: {}", e);
            return ExitCode::FAILURE;
        }
        buf
    } else {
        args.words.join(" ")
    };

    for token in Lexer::tokenize(&clip_line(&line, DEFAULT_MAX_INPUT)) {
        println!("{}", token);
    }
    ExitCode::SUCCESS
}
