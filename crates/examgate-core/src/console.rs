//! The console boundary.
//!
//! The session only ever reads whole lines and writes text, so the same loop
//! runs against a real terminal or a scripted transcript.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Line-oriented input paired with text output.
pub trait Console {
    /// Read one line without its line terminator. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>>;

    /// Write text as-is; no newline is appended.
    fn write(&mut self, text: &str) -> io::Result<()>;
}

fn strip_line_ending(line: &mut Vec<u8>) {
    if line.last() == Some(&b'\n') {
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
    }
}

/// A console over any buffered reader and writer.
pub struct StdConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> StdConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Console for StdConsole<R, W> {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = Vec::new();
        if self.input.read_until(b'\n', &mut line)? == 0 {
            return Ok(None);
        }
        strip_line_ending(&mut line);
        // Invalid UTF-8 is replaced, not rejected; it just won't match anything.
        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes())?;
        // Prompts have no trailing newline and must show before the next read.
        self.output.flush()
    }
}

/// A console that replays fixed input lines and records everything written.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    input: VecDeque<String>,
    transcript: String,
    reads: usize,
}

impl ScriptedConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            input: lines.into_iter().map(Into::into).collect(),
            transcript: String::new(),
            reads: 0,
        }
    }

    /// Everything written so far.
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// Number of lines consumed.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Lines not yet consumed.
    pub fn remaining(&self) -> usize {
        self.input.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let line = self.input.pop_front();
        if line.is_some() {
            self.reads += 1;
        }
        Ok(line)
    }

    fn write(&mut self, text: &str) -> io::Result<()> {
        self.transcript.push_str(text);
        Ok(())
    }
}
