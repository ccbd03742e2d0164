use std::collections::HashMap;
use std::env;
use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use log::debug;

use super::process::exec_in_place;
use super::redirect::RedirectResolver;
use super::{Executor, Flow};
use crate::error::{ShellError, ShellResult};
use crate::history::History;
use crate::lexer::{Token, join};
use crate::sequencer::Dispatch;

pub const FAREWELL: &str = "Bye bye.";

const HELP_TEXT: &str = "\
---- LIST OF BUILT-IN FUNCTIONS ----
cd (Change Directory):
- cd [path]
- Change current directory to PATH specified in the argument
source:
- source filename [arguments]
- Read and execute commands from FILENAME and return.
prev:
- Executes the previous command line again,
- without becoming the new command line.
help:
- Shows this help message.";

/// State a builtin may read or act through.
pub struct BuiltinContext<'a> {
    pub history: &'a History,
    pub executor: &'a mut dyn Executor,
}

pub trait BuiltinCommand {
    fn name(&self) -> &'static str;
    fn run(&self, args: &[String], ctx: &mut BuiltinContext<'_>) -> ShellResult<Flow>;
}

pub struct BuiltinManager {
    commands: HashMap<String, Box<dyn BuiltinCommand>>,
}

impl Default for BuiltinManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BuiltinManager {
    pub fn new() -> Self {
        let mut mgr = BuiltinManager {
            commands: HashMap::new(),
        };
        mgr.register(Box::new(ExitCommand));
        mgr.register(Box::new(CdCommand));
        mgr.register(Box::new(SourceCommand));
        mgr.register(Box::new(PrevCommand));
        mgr.register(Box::new(HelpCommand));
        mgr
    }

    pub fn register(&mut self, cmd: Box<dyn BuiltinCommand>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn BuiltinCommand> {
        self.commands.get(name).map(|cmd| cmd.as_ref())
    }
}

/// Routes dispatch actions to builtins or to the executor.
pub struct Dispatcher<E: Executor> {
    executor: E,
    builtins: BuiltinManager,
}

impl<E: Executor> Dispatcher<E> {
    pub fn new(executor: E) -> Self {
        Dispatcher {
            executor,
            builtins: BuiltinManager::new(),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// Runs one action. Every failure is reported here and the loop goes
    /// on; only `exit` stops it.
    pub fn dispatch(&mut self, action: &Dispatch, history: &History) -> Flow {
        match self.try_dispatch(action, history) {
            Ok(flow) => flow,
            Err(e) => {
                eprintln!("mini-shell: {}", e);
                Flow::Continue
            }
        }
    }

    fn try_dispatch(&mut self, action: &Dispatch, history: &History) -> ShellResult<Flow> {
        debug!("dispatch {:?}", action);
        match action {
            Dispatch::Command(group) => self.dispatch_group(group, history),
            Dispatch::Pipe(lhs, rhs) => {
                let lhs = RedirectResolver::resolve(lhs)?;
                let rhs = RedirectResolver::resolve(rhs)?;
                self.executor.run_pipe(&lhs, &rhs)?;
                Ok(Flow::Continue)
            }
        }
    }

    fn dispatch_group(&mut self, group: &[Token], history: &History) -> ShellResult<Flow> {
        let Some(first) = group.first() else {
            return Ok(Flow::Continue);
        };

        if let Token::Word(name) = first {
            if let Some(builtin) = self.builtins.get(name) {
                let args: Vec<String> = group[1..].iter().map(|t| t.as_str().to_string()).collect();
                debug!("builtin {} {:?}", name, args);
                let mut ctx = BuiltinContext {
                    history,
                    executor: &mut self.executor,
                };
                return builtin.run(&args, &mut ctx);
            }
        }

        let cmd = RedirectResolver::resolve(group)?;
        self.executor.run(&cmd)?;
        Ok(Flow::Continue)
    }
}

pub struct ExitCommand;

impl BuiltinCommand for ExitCommand {
    fn name(&self) -> &'static str {
        "exit"
    }
    fn run(&self, _args: &[String], _ctx: &mut BuiltinContext<'_>) -> ShellResult<Flow> {
        println!("{}", FAREWELL);
        Ok(Flow::Stop)
    }
}

pub struct CdCommand;

impl BuiltinCommand for CdCommand {
    fn name(&self) -> &'static str {
        "cd"
    }
    fn run(&self, args: &[String], _ctx: &mut BuiltinContext<'_>) -> ShellResult<Flow> {
        let target = match args.first() {
            Some(path) => PathBuf::from(path),
            None => env::var_os("HOME")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/")),
        };
        if let Err(source) = env::set_current_dir(&target) {
            return Err(ShellError::ChangeDir { path: target, source });
        }
        Ok(Flow::Continue)
    }
}

pub struct SourceCommand;

impl BuiltinCommand for SourceCommand {
    fn name(&self) -> &'static str {
        "source"
    }
    fn run(&self, args: &[String], _ctx: &mut BuiltinContext<'_>) -> ShellResult<Flow> {
        let Some(file) = args.first() else {
            return Err(ShellError::NoSourceFile);
        };
        let path = Path::new(file);
        make_executable(path)?;

        // a bare name that exists here runs from here, not from PATH
        let mut argv = args.to_vec();
        if !file.contains('/') && path.is_file() {
            argv[0] = format!("./{}", file);
        }
        let never = exec_in_place(&argv)?;
        match never {}
    }
}

fn make_executable(path: &Path) -> ShellResult<()> {
    let wrap = |source: io::Error| ShellError::Permissions {
        path: path.to_path_buf(),
        source,
    };
    let mut perms = fs::metadata(path).map_err(wrap)?.permissions();
    perms.set_mode(perms.mode() | 0o111);
    fs::set_permissions(path, perms).map_err(wrap)
}

pub struct PrevCommand;

impl BuiltinCommand for PrevCommand {
    fn name(&self) -> &'static str {
        "prev"
    }
    fn run(&self, _args: &[String], ctx: &mut BuiltinContext<'_>) -> ShellResult<Flow> {
        let Some(tokens) = ctx.history.last() else {
            return Err(ShellError::NoPreviousCommand);
        };
        // replayed as one external command; builtins and separators are not reinterpreted
        debug!("prev: {}", join(tokens));
        let cmd = RedirectResolver::resolve(tokens)?;
        ctx.executor.run(&cmd)?;
        Ok(Flow::Continue)
    }
}

pub struct HelpCommand;

impl BuiltinCommand for HelpCommand {
    fn name(&self) -> &'static str {
        "help"
    }
    fn run(&self, _args: &[String], _ctx: &mut BuiltinContext<'_>) -> ShellResult<Flow> {
        println!("{}", HELP_TEXT);
        Ok(Flow::Continue)
    }
}
