//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with scripted implementations.

use std::collections::VecDeque;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::domain::Answer;

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Append content to a file, creating it if needed.
    ///
    /// The whole content is written under an exclusive lock so concurrent
    /// writers cannot interleave their lines.
    fn append(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()>;
}

/// Line-oriented user interaction.
pub trait LineReader: Send + Sync {
    /// Show `prompt` and read one line, without the trailing newline.
    ///
    /// End of input is reported as `io::ErrorKind::UnexpectedEof`.
    fn read_line(&self, prompt: &str) -> io::Result<String>;

    /// Show a message that needs no reply.
    fn notice(&self, message: &str);
}

/// Source of yes/no answers for the decision tree.
pub trait AnswerSource {
    fn ask_yes_no(&self, question: &str) -> io::Result<Answer>;
}

pub const YES_NO_HINT: &str = "Please answer with 'yes' or 'no' (or 'y'/'n').";

/// Every line reader answers questions by re-prompting until it reads a
/// recognizable yes/no.
impl<T: LineReader + ?Sized> AnswerSource for T {
    fn ask_yes_no(&self, question: &str) -> io::Result<Answer> {
        let prompt = format!("{question} (yes/no): ");
        loop {
            let line = self.read_line(&prompt)?;
            if let Some(answer) = Answer::parse(&line) {
                return Ok(answer);
            }
            self.notice(YES_NO_HINT);
        }
    }
}

/// Wall clock abstraction.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn append(&self, path: &Path, content: &str) -> io::Result<()> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        write_locked(file, content)
    }

    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

#[cfg(unix)]
fn write_locked(file: File, content: &str) -> io::Result<()> {
    use nix::fcntl::{Flock, FlockArg};

    // blocks until other writers release the file; unlocked on drop
    let mut locked =
        Flock::lock(file, FlockArg::LockExclusive).map_err(|(_, errno)| io::Error::from(errno))?;
    locked.write_all(content.as_bytes())?;
    locked.flush()
}

#[cfg(not(unix))]
fn write_locked(mut file: File, content: &str) -> io::Result<()> {
    file.write_all(content.as_bytes())?;
    file.flush()
}

/// Interactive console: prompts on stdout, reads stdin.
#[derive(Debug, Default)]
pub struct ConsoleReader;

impl LineReader for ConsoleReader {
    fn read_line(&self, prompt: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{prompt}")?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn notice(&self, message: &str) {
        println!("{message}");
    }
}

/// Pre-recorded input, consumed line by line.
///
/// Used for non-interactive runs (`--answers yes,no,...`) and in tests.
/// Everything shown to the "user" is kept in a transcript.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    lines: Mutex<VecDeque<String>>,
    transcript: Mutex<Vec<String>>,
}

impl ScriptedReader {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: Mutex::new(lines.into_iter().map(Into::into).collect()),
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Prompts and notices shown so far, in order.
    pub fn transcript(&self) -> Vec<String> {
        self.transcript
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }

    /// Lines not consumed yet.
    pub fn remaining(&self) -> usize {
        self.lines.lock().map(|l| l.len()).unwrap_or_default()
    }

    fn record(&self, text: &str) {
        if let Ok(mut transcript) = self.transcript.lock() {
            transcript.push(text.to_string());
        }
    }
}

impl LineReader for ScriptedReader {
    fn read_line(&self, prompt: &str) -> io::Result<String> {
        self.record(prompt);
        let mut lines = self
            .lines
            .lock()
            .map_err(|_| io::Error::other("scripted input poisoned"))?;
        lines.pop_front().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no scripted input left for: {prompt}"),
            )
        })
    }

    fn notice(&self, message: &str) {
        self.record(message);
    }
}

/// System clock.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
