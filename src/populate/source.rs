use crate::core::{DaoError, Result};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Blocking line-oriented input.
pub trait LineSource {
    /// Shows `prompt` and reads one line without its terminator; `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Prompts on a writer and reads lines from a reader, normally stdout and stdin.
pub struct ConsoleSource<R, W> {
    reader: R,
    writer: W,
}

impl ConsoleSource<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsoleSource<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl<R: BufRead, W: Write> LineSource for ConsoleSource<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.writer, "{}", prompt)
            .and_then(|_| self.writer.flush())
            .map_err(|e| DaoError::InputError(format!("Failed to write prompt: {}", e)))?;

        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|e| DaoError::InputError(format!("Failed to read input: {}", e)))?;
        if read == 0 {
            return Ok(None);
        }

        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

/// Pre-recorded answers; remembers every prompt it was shown.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    lines: VecDeque<String>,
    prompts: Vec<String>,
}

impl ScriptedSource {
    pub fn new<I, T>(lines: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
