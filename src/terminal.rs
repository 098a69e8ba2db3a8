//! Line-oriented console shared by every exercise.
//!
//! Programs never touch stdin/stdout directly. They talk to a [`Terminal`], which
//! is backed by `rustyline` when running interactively and by [`MemTerminal`]
//! in tests.

use anyhow::{Result, anyhow};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::cell::RefCell;
use std::fmt::Display;
use std::io::{BufRead, Cursor, Write};
use std::rc::Rc;
use tracing::warn;

/// Read/write half of an interactive session.
pub trait Terminal {
    /// Show `prompt` and read one line, without its line terminator.
    ///
    /// Returns `Ok(None)` once input is exhausted (end of file or Ctrl-C).
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Print `text` followed by a newline.
    fn write_line(&mut self, text: &str) -> Result<()>;
}

/// Interactive terminal on top of a `rustyline` editor.
pub struct EditorTerminal {
    editor: DefaultEditor,
}

impl EditorTerminal {
    pub fn new() -> Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
        })
    }
}

impl Terminal for EditorTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str())?;
                }
                Ok(Some(line))
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", text)?;
        stdout.flush()?;
        Ok(())
    }
}

/// Memory-backed terminal.
///
/// Input is served line by line from a buffer. Prompts and written lines are
/// appended to a shared output buffer, so a caller can inspect the transcript
/// after the session ends.
pub struct MemTerminal {
    input: Cursor<Vec<u8>>,
    output: Rc<RefCell<Vec<u8>>>,
}

impl MemTerminal {
    /// Create a terminal that will read from the provided buffer.
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        Self {
            input: Cursor::new(input.into()),
            output: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Convenience: one entry per input line.
    pub fn from_lines(lines: &[&str]) -> Self {
        let mut buf = String::new();
        for line in lines {
            buf.push_str(line);
            buf.push('\n');
        }
        Self::new(buf)
    }

    /// Return a handle to the transcript buffer.
    pub fn handle(&self) -> Rc<RefCell<Vec<u8>>> {
        self.output.clone()
    }

    /// Everything prompted and written so far, lossily decoded.
    pub fn transcript(&self) -> String {
        String::from_utf8_lossy(&self.output.borrow()).into_owned()
    }
}

impl Terminal for MemTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.output
            .borrow_mut()
            .extend_from_slice(prompt.as_bytes());

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        let mut out = self.output.borrow_mut();
        out.extend_from_slice(text.as_bytes());
        out.push(b'\n');
        Ok(())
    }
}

/// Read a line that a program cannot continue without.
pub fn require_line(terminal: &mut dyn Terminal, prompt: &str) -> Result<String> {
    terminal
        .read_line(prompt)?
        .ok_or_else(|| anyhow!("input closed"))
}

/// Prompt until `parse` accepts the trimmed input.
///
/// Each rejection is shown to the user as the error's `Display` text before
/// prompting again.
pub fn read_valid<T, E, F>(terminal: &mut dyn Terminal, prompt: &str, mut parse: F) -> Result<T>
where
    E: Display,
    F: FnMut(&str) -> std::result::Result<T, E>,
{
    loop {
        let line = require_line(terminal, prompt)?;
        match parse(line.trim()) {
            Ok(value) => return Ok(value),
            Err(err) => {
                warn!(input = line.trim(), "rejected input: {}", err);
                terminal.write_line(&err.to_string())?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mem_terminal_reads_lines_and_records_prompts() {
        let mut term = MemTerminal::new("first\r\nsecond\n");

        assert_eq!(term.read_line("> ").unwrap(), Some("first".to_string()));
        assert_eq!(term.read_line("> ").unwrap(), Some("second".to_string()));
        assert_eq!(term.read_line("> ").unwrap(), None);

        term.write_line("done").unwrap();
        assert_eq!(term.transcript(), "> > > done\n");
    }

    #[test]
    fn test_last_line_without_newline_is_returned() {
        let mut term = MemTerminal::new("tail");
        assert_eq!(term.read_line("").unwrap(), Some("tail".to_string()));
        assert_eq!(term.read_line("").unwrap(), None);
    }

    #[test]
    fn test_read_valid_reprompts_until_accepted() {
        let mut term = MemTerminal::from_lines(&["abc", "  7 "]);
        let handle = term.handle();

        let value: i32 = read_valid(&mut term, "n? ", |s| {
            s.parse::<i32>().map_err(|_| "not a number")
        })
        .unwrap();

        assert_eq!(value, 7);
        let out = String::from_utf8(handle.borrow().clone()).unwrap();
        assert_eq!(out, "n? not a number\nn? ");
    }

    #[test]
    fn test_require_line_errors_when_input_closed() {
        let mut term = MemTerminal::new(Vec::new());
        let err = require_line(&mut term, "? ").unwrap_err();
        assert_eq!(err.to_string(), "input closed");
    }
}
