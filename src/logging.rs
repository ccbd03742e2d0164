use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

use log::{LevelFilter, SetLoggerError};
use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LogInitError {
    #[error("cannot open log file {}: {source}", path.display())]
    File { path: PathBuf, source: io::Error },
    #[error("logger already installed: {0}")]
    Logger(#[from] SetLoggerError),
}

/// Installs the global logger. With `LevelFilter::Off` nothing is installed
/// so the interactive output stays untouched.
pub fn init(level: LevelFilter, file: Option<&Path>) -> Result<(), LogInitError> {
    if level == LevelFilter::Off {
        return Ok(());
    }
    let config = simplelog::Config::default();
    match file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LogInitError::File {
                    path: path.to_path_buf(),
                    source,
                })?;
            WriteLogger::init(level, config, file)?;
        }
        None => TermLogger::init(level, config, TerminalMode::Stderr, ColorChoice::Auto)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_installs_nothing() {
        assert!(init(LevelFilter::Off, None).is_ok());
        assert!(init(LevelFilter::Off, Some(Path::new("/nonexistent/dir/log"))).is_ok());
    }

    #[test]
    fn test_unwritable_log_file_is_reported() {
        let err = init(LevelFilter::Debug, Some(Path::new("/nonexistent/dir/shell.log"))).unwrap_err();
        assert!(matches!(err, LogInitError::File { .. }));
    }
}
