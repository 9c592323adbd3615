use std::fs::File;
use std::io::{self, BufRead, BufReader, IsTerminal, Write};

use rustyline::config::Behavior;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};

use crate::config::ShellConfig;
use crate::error::ShellError;
use crate::process::signal::InterruptibleRead;

/// Result of asking for the next line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete line without its trailing newline.
    Line(String),
    /// SIGINT (or Ctrl-C) arrived while waiting; whatever was typed is gone.
    Interrupted,
    Eof,
}

/// Where input lines come from.
pub enum LineSource {
    /// Interactive session on a terminal, with line editing.
    Editor(Box<DefaultEditor>),
    /// Interactive session on a pipe or other non-terminal stdin.
    Stdin,
    /// Commands read from a script file; no prompt.
    Batch(BufReader<File>),
}

impl LineSource {
    pub fn open(config: &ShellConfig) -> Result<Self, ShellError> {
        if let Some(path) = &config.script {
            let file = File::open(path).map_err(|source| ShellError::InputFile {
                path: path.display().to_string(),
                source,
            })?;
            return Ok(LineSource::Batch(BufReader::new(file)));
        }

        if io::stdin().is_terminal() {
            // draw the prompt on the terminal itself, keeping stdout for commands
            let editor_config = Config::builder()
                .behavior(Behavior::PreferTerm)
                .auto_add_history(true)
                .build();
            let editor = DefaultEditor::with_config(editor_config)?;
            return Ok(LineSource::Editor(Box::new(editor)));
        }

        Ok(LineSource::Stdin)
    }

    pub fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self {
            LineSource::Editor(editor) => {
                let _interruptible = InterruptibleRead::begin()?;
                match editor.readline(prompt) {
                    Ok(line) => Ok(ReadOutcome::Line(line)),
                    Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
                    Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
                    Err(e) => Err(e.into()),
                }
            }
            LineSource::Stdin => {
                let mut stderr = io::stderr();
                write!(stderr, "{}", prompt)?;
                stderr.flush()?;
                let _interruptible = InterruptibleRead::begin()?;
                read_interruptible(&mut io::stdin().lock())
            }
            LineSource::Batch(reader) => {
                let mut buf = Vec::new();
                if reader.read_until(b'\n', &mut buf)? == 0 {
                    return Ok(ReadOutcome::Eof);
                }
                Ok(ReadOutcome::Line(into_line(buf)))
            }
        }
    }
}

fn into_line(mut buf: Vec<u8>) -> String {
    if buf.last() == Some(&b'\n') {
        buf.pop();
    }
    String::from_utf8_lossy(&buf).into_owned()
}

/// Read one line, giving up as soon as a read fails with EINTR.
///
/// `BufRead::read_line` retries interrupted reads, which would swallow
/// Ctrl-C, so the buffer is driven by hand.
fn read_interruptible<R: BufRead>(reader: &mut R) -> Result<ReadOutcome, ShellError> {
    let mut line = Vec::new();
    loop {
        let available = match reader.fill_buf() {
            Ok(buf) => buf,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                return Ok(ReadOutcome::Interrupted)
            }
            Err(e) => return Err(e.into()),
        };

        if available.is_empty() {
            if line.is_empty() {
                return Ok(ReadOutcome::Eof);
            }
            return Ok(ReadOutcome::Line(into_line(line)));
        }

        match available.iter().position(|&b| b == b'\n') {
            Some(end) => {
                line.extend_from_slice(&available[..=end]);
                reader.consume(end + 1);
                return Ok(ReadOutcome::Line(into_line(line)));
            }
            None => {
                let len = available.len();
                line.extend_from_slice(available);
                reader.consume(len);
            }
        }
    }
}
