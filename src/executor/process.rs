use std::convert::Infallible;
use std::ffi::{CStr, CString};
use std::io::{self, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use log::debug;
use nix::errno::Errno;
use nix::fcntl::{OFlag, open};
use nix::sys::signal::{SigHandler, Signal, signal};
use nix::sys::stat::Mode;
use nix::sys::wait::{WaitStatus, waitpid};
use nix::unistd::{ForkResult, Pid, close, dup2, execvp, fork, pipe};

use super::Executor;
use super::redirect::ResolvedCommand;
use crate::error::{ShellError, ShellResult};

/// Exit status of a child whose program could not be found.
pub const EXIT_NOT_FOUND: i32 = 127;
/// Exit status of a child whose program exists but could not be executed.
pub const EXIT_NOT_EXECUTABLE: i32 = 126;
/// Exit status of a child whose redirection file could not be opened.
pub const EXIT_REDIRECT_FAILED: i32 = 1;

/// Runs commands as forked children and waits for them.
#[derive(Debug, Default)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn run(&mut self, cmd: &ResolvedCommand) -> ShellResult<i32> {
        if cmd.is_noop() {
            return Ok(0);
        }
        let prepared = Prepared::new(cmd)?;
        io::stdout().flush()?;

        let pid = spawn(&prepared, &Wiring::default())?;
        let status = wait_for(pid)?;
        debug!("{} (pid {}) exited with {}", cmd.argv[0], pid, status);
        Ok(status)
    }

    fn run_pipe(&mut self, lhs: &ResolvedCommand, rhs: &ResolvedCommand) -> ShellResult<()> {
        if lhs.is_noop() || rhs.is_noop() {
            return Err(ShellError::EmptyPipeStage);
        }
        let lhs = Prepared::new(lhs)?;
        let rhs = Prepared::new(rhs)?;
        io::stdout().flush()?;

        let (read_end, write_end) = pipe().map_err(ShellError::Pipe)?;
        let ends = [read_end.as_raw_fd(), write_end.as_raw_fd()];

        let left = spawn(
            &lhs,
            &Wiring { stdin: None, stdout: Some(ends[1]), close: Some(ends) },
        )?;
        let right = spawn(
            &rhs,
            &Wiring { stdin: Some(ends[0]), stdout: None, close: Some(ends) },
        );

        // the reader only sees end-of-stream once every copy of the write end is gone
        drop(read_end);
        drop(write_end);

        let right = match right {
            Ok(pid) => pid,
            Err(e) => {
                let _ = wait_for(left);
                return Err(e);
            }
        };

        let left_status = wait_for(left);
        let right_status = wait_for(right);
        debug!(
            "pipe {} (pid {}) | {} (pid {}) exited with {:?} | {:?}",
            lhs.name(),
            left,
            rhs.name(),
            right,
            left_status,
            right_status
        );
        left_status?;
        right_status?;
        Ok(())
    }
}

/// Replaces the current process image with `argv[0]`, searching `PATH`.
///
/// Only returns when the replacement failed.
pub fn exec_in_place(argv: &[String]) -> ShellResult<Infallible> {
    let Some(program) = argv.first() else {
        return Err(ShellError::NoSourceFile);
    };
    let args = argv
        .iter()
        .map(|arg| cstring(arg))
        .collect::<ShellResult<Vec<_>>>()?;
    io::stdout().flush()?;
    restore_sigpipe();
    execvp(&args[0], &args).map_err(|errno| ShellError::SourceExec {
        path: PathBuf::from(program),
        source: errno,
    })
}

/// A command converted to C strings before forking, so the child does no
/// fallible conversion work.
struct Prepared {
    argv: Vec<CString>,
    stdin: Option<CString>,
    stdout: Option<CString>,
}

impl Prepared {
    fn new(cmd: &ResolvedCommand) -> ShellResult<Self> {
        Ok(Prepared {
            argv: cmd.argv.iter().map(|arg| cstring(arg)).collect::<ShellResult<_>>()?,
            stdin: cmd.stdin.as_deref().map(path_cstring).transpose()?,
            stdout: cmd.stdout.as_deref().map(path_cstring).transpose()?,
        })
    }

    fn name(&self) -> &str {
        self.argv[0].to_str().unwrap_or("?")
    }
}

/// Descriptor plumbing a child performs before its own redirections.
#[derive(Debug, Default)]
struct Wiring {
    stdin: Option<RawFd>,
    stdout: Option<RawFd>,
    close: Option<[RawFd; 2]>,
}

fn cstring(arg: &str) -> ShellResult<CString> {
    CString::new(arg).map_err(|_| ShellError::NulByte(arg.to_string()))
}

fn path_cstring(path: &Path) -> ShellResult<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| ShellError::NulByte(path.display().to_string()))
}

fn spawn(cmd: &Prepared, wiring: &Wiring) -> ShellResult<Pid> {
    // SAFETY: the child only rewires descriptors, then execs or calls _exit.
    match unsafe { fork() }.map_err(ShellError::Fork)? {
        ForkResult::Child => exec_child(cmd, wiring),
        ForkResult::Parent { child } => {
            debug!("spawned {} as pid {}", cmd.name(), child);
            Ok(child)
        }
    }
}

fn exec_child(cmd: &Prepared, wiring: &Wiring) -> ! {
    restore_sigpipe();
    if let Some(fd) = wiring.stdin {
        if let Err(errno) = dup2(fd, libc::STDIN_FILENO) {
            child_fail("dup2", errno, EXIT_REDIRECT_FAILED);
        }
    }
    if let Some(fd) = wiring.stdout {
        if let Err(errno) = dup2(fd, libc::STDOUT_FILENO) {
            child_fail("dup2", errno, EXIT_REDIRECT_FAILED);
        }
    }
    if let Some(ends) = wiring.close {
        for fd in ends {
            let _ = close(fd);
        }
    }

    if let Some(path) = &cmd.stdin {
        redirect(path, OFlag::O_RDONLY, libc::STDIN_FILENO, "Failed to open input file");
    }
    if let Some(path) = &cmd.stdout {
        redirect(
            path,
            OFlag::O_WRONLY | OFlag::O_CREAT | OFlag::O_TRUNC,
            libc::STDOUT_FILENO,
            "Failed to open output file",
        );
    }

    let Err(errno) = execvp(&cmd.argv[0], &cmd.argv);
    let code = if errno == Errno::ENOENT {
        EXIT_NOT_FOUND
    } else {
        EXIT_NOT_EXECUTABLE
    };
    child_fail(cmd.name(), errno, code)
}

fn redirect(path: &CStr, flags: OFlag, target: RawFd, what: &str) {
    let file = path.to_string_lossy();
    let fd = match open(path, flags, Mode::from_bits_truncate(0o644)) {
        Ok(fd) => fd,
        Err(errno) => child_fail(&format!("{} {}", what, file), errno, EXIT_REDIRECT_FAILED),
    };
    if fd == target {
        return;
    }
    if let Err(errno) = dup2(fd, target) {
        child_fail(&format!("{} {}", what, file), errno, EXIT_REDIRECT_FAILED);
    }
    let _ = close(fd);
}

/// The Rust runtime ignores SIGPIPE, and an ignored signal stays ignored
/// across exec; programs we start get the default disposition back.
fn restore_sigpipe() {
    // SAFETY: SIG_DFL installs no handler code.
    let _ = unsafe { signal(Signal::SIGPIPE, SigHandler::SigDfl) };
}

/// Reports a failure from inside a child and terminates it without running
/// the parent's exit handlers or flushing its copied buffers.
fn child_fail(what: &str, errno: Errno, code: i32) -> ! {
    let msg = format!("{}: {}\n", what, errno.desc());
    unsafe {
        libc::write(libc::STDERR_FILENO, msg.as_ptr().cast(), msg.len());
        libc::_exit(code)
    }
}

fn wait_for(pid: Pid) -> ShellResult<i32> {
    loop {
        match waitpid(pid, None) {
            Ok(WaitStatus::Exited(_, code)) => return Ok(code),
            Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(128 + signal as i32),
            Ok(_) | Err(Errno::EINTR) => continue,
            Err(errno) => return Err(ShellError::Wait(errno)),
        }
    }
}
