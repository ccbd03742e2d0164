use std::io::{self, BufRead, Write};

use log::warn;

pub struct ShellPrompt<R> {
    input: R,
    prompt: String,
    max_len: usize,
}

impl<R: BufRead> ShellPrompt<R> {
    pub fn new(input: R, prompt: impl Into<String>, max_len: usize) -> Self {
        ShellPrompt {
            input,
            prompt: prompt.into(),
            max_len,
        }
    }

    pub fn show_prompt(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(self.prompt.as_bytes())?;
        stdout.flush()
    }

    /// Reads one line without its terminator; `None` at end of input.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        let bytes_read = self.input.read_until(b'\n', &mut buf)?;
        if bytes_read == 0 {
            // EOF (e.g., Ctrl-D)
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(clip_line(&line, self.max_len)))
    }
}

/// Strips the line terminator and keeps at most `max_len` characters.
pub fn clip_line(line: &str, max_len: usize) -> String {
    let line = line
        .strip_suffix('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .unwrap_or(line);
    match line.char_indices().nth(max_len) {
        Some((cut, _)) => {
            warn!("input longer than {} characters, truncated", max_len);
            line[..cut].to_string()
        }
        None => line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_until_eof() {
        let mut prompt = ShellPrompt::new(Cursor::new("ls -l\r\npwd\nlast"), "$ ", 255);
        assert_eq!(prompt.read_line().unwrap().as_deref(), Some("ls -l"));
        assert_eq!(prompt.read_line().unwrap().as_deref(), Some("pwd"));
        assert_eq!(prompt.read_line().unwrap().as_deref(), Some("last"));
        assert_eq!(prompt.read_line().unwrap(), None);
    }

    #[test]
    fn test_empty_line_is_not_eof() {
        let mut prompt = ShellPrompt::new(Cursor::new("\n"), "$ ", 255);
        assert_eq!(prompt.read_line().unwrap().as_deref(), Some(""));
        assert_eq!(prompt.read_line().unwrap(), None);
    }

    #[test]
    fn test_long_line_is_truncated() {
        let long = "x".repeat(300);
        let mut prompt = ShellPrompt::new(Cursor::new(long), "$ ", 255);
        assert_eq!(prompt.read_line().unwrap().map(|l| l.len()), Some(255));
    }

    #[test]
    fn test_truncation_counts_characters() {
        assert_eq!(clip_line("héllo wörld\n", 4), "héll");
        assert_eq!(clip_line("abc", 3), "abc");
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let mut prompt = ShellPrompt::new(Cursor::new(b"ec\xffho\n".to_vec()), "$ ", 255);
        assert_eq!(prompt.read_line().unwrap().as_deref(), Some("ec\u{fffd}ho"));
    }
}
