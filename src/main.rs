use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use log::LevelFilter;

use mini_shell::Shell;
use mini_shell::config::ConfigLoader;
use mini_shell::executor::ProcessExecutor;
use mini_shell::logging;

/// A small interactive shell with sequencing, one pipe and redirection.
#[derive(FromArgs)]
struct Args {
    /// config file to read instead of ~/.mini_shellrc
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// log level: off, error, warn, info, debug or trace
    #[argh(option)]
    log_level: Option<LevelFilter>,

    /// append log records to this file instead of stderr
    #[argh(option)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args: Args = argh::from_env();

    let mut config = match ConfigLoader::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("mini-shell: config: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(level) = args.log_level {
        config.log_level = level;
    }
    if args.log_file.is_some() {
        config.log_file = args.log_file;
    }

    if let Err(e) = logging::init(config.log_level, config.log_file.as_deref()) {
        eprintln!("mini-shell: logging disabled: {}", e);
    }

    let mut shell = Shell::new(config, io::stdin().lock(), ProcessExecutor);
    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("mini-shell: {}", e);
            ExitCode::FAILURE
        }
    }
}
