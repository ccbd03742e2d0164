use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::LevelFilter;
use thiserror::Error;

pub const DEFAULT_PROMPT: &str = "shell $ ";
pub const DEFAULT_WELCOME: &str = "Welcome to mini-shell.";
/// Visible characters kept from one input line.
pub const DEFAULT_MAX_INPUT: usize = 255;
/// Tokens accepted from one input line.
pub const DEFAULT_MAX_TOKENS: usize = 159;
pub const CONFIG_FILE_NAME: &str = ".mini_shellrc";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub prompt: String,
    pub welcome: String,
    pub max_input: usize,
    pub max_tokens: usize,
    pub log_level: LevelFilter,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        ConfigLoader::default_config()
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    pub fn default_config() -> Config {
        Config {
            prompt: DEFAULT_PROMPT.to_string(),
            welcome: DEFAULT_WELCOME.to_string(),
            max_input: DEFAULT_MAX_INPUT,
            max_tokens: DEFAULT_MAX_TOKENS,
            log_level: LevelFilter::Off,
            log_file: None,
        }
    }

    /// `$HOME/.mini_shellrc`, when `HOME` is set.
    pub fn default_path() -> Option<PathBuf> {
        std::env::var_os("HOME").map(|home| Path::new(&home).join(CONFIG_FILE_NAME))
    }

    /// Loads `path` if given, otherwise the default file if it exists,
    /// otherwise the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::load_from_file(path),
                _ => Ok(Self::default_config()),
            },
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let src = fs::read_to_string(path)?;
        Self::load_from_str(&src)
    }

    pub fn load_from_str(src: &str) -> Result<Config, ConfigError> {
        let mut config = Self::default_config();

        for (lineno, line) in src.lines().enumerate() {
            let lineno = lineno + 1;
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, raw)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!("Line {}: No '=' found: {}", lineno, line)));
            };
            // prompt and welcome keep their spacing verbatim
            let value = raw.trim();

            match key.trim() {
                "prompt" => config.prompt = raw.to_string(),
                "welcome" => config.welcome = raw.to_string(),
                "max_input" => config.max_input = parse_limit(lineno, value)?,
                "max_tokens" => config.max_tokens = parse_limit(lineno, value)?,
                "log_level" => {
                    config.log_level = value.parse().map_err(|_| {
                        ConfigError::Parse(format!("Line {}: Invalid log level: {}", lineno, value))
                    })?;
                }
                "log_file" => {
                    config.log_file = if value.is_empty() {
                        None
                    } else {
                        Some(PathBuf::from(value))
                    };
                }
                other => {
                    return Err(ConfigError::Parse(format!("Line {}: Unknown key: {}", lineno, other)));
                }
            }
        }

        Ok(config)
    }
}

fn parse_limit(lineno: usize, value: &str) -> Result<usize, ConfigError> {
    match value.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Parse(format!(
            "Line {}: Expected a positive number: {}",
            lineno, value
        ))),
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
}
