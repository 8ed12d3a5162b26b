//! Line-oriented console abstraction
//!
//! The prompt loops and the session talk to a [`Console`] rather than to
//! stdin/stdout directly, so a whole session can be driven from a script.

use bikeshare_core::error::Result;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

/// Reads user answers and writes result text
pub trait Console {
    /// Show `prompt` and read one line of input
    ///
    /// Returns `Ok(None)` once the input is closed.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Write `text` followed by a newline
    fn write_line(&mut self, text: &str) -> Result<()>;
}

/// Console backed by the process's stdin and stdout
pub struct StdConsole {
    stdin: io::StdinLock<'static>,
    stdout: io::Stdout,
}

impl StdConsole {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin().lock(),
            stdout: io::stdout(),
        }
    }
}

impl Default for StdConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        writeln!(self.stdout, "{prompt}")?;
        self.stdout.flush()?;

        let mut line = String::new();
        if self.stdin.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        writeln!(self.stdout, "{text}")?;
        Ok(())
    }
}

/// In-memory console that replays a fixed list of answers
///
/// Everything written, prompts included, is kept as a transcript.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    /// Every prompt and line written so far
    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// The transcript joined into one string
    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }

    /// Answers not consumed yet
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.transcript.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }

    fn write_line(&mut self, text: &str) -> Result<()> {
        self.transcript.push(text.to_string());
        Ok(())
    }
}
