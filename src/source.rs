//! Event source reader.
//!
//! Reads `event:<NAME>` lines from the gesture reader's stdout. Any other line
//! is dropped without a diagnostic.

use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};

use crate::config::CommandSpec;
use crate::error::{DispatchError, DispatchResult};
use crate::log;

const EVENT_TAG: &str = "event";

/// Opaque gesture event name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event(String);

impl Event {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Extract the event name from one protocol line, if it carries one.
pub fn parse_line(line: &str) -> Option<Event> {
    let (tag, rest) = line.split_once(':')?;
    if tag == EVENT_TAG {
        Some(Event::new(rest.trim()))
    } else {
        None
    }
}

pub struct EventSource<R> {
    reader: R,
    buf: Vec<u8>,
    /// Held for the process lifetime, never waited on
    _child: Option<Child>,
}

impl EventSource<BufReader<ChildStdout>> {
    /// Spawn the reader process with a piped stdout
    pub fn spawn(spec: &CommandSpec) -> DispatchResult<Self> {
        let spawn_err = |source| DispatchError::Spawn {
            command: spec.display(),
            source,
        };

        let mut child = Command::new(&spec.command)
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        let stdout = child.stdout.take().ok_or_else(|| {
            spawn_err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "no stdout"))
        })?;

        log::log(&format!("event source pid {:?}: {}", child.id(), spec.display()));

        Ok(Self {
            reader: BufReader::new(stdout),
            buf: Vec::new(),
            _child: Some(child),
        })
    }
}

impl<R: AsyncBufRead + Unpin> EventSource<R> {
    #[cfg(test)]
    pub fn from_reader(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            _child: None,
        }
    }

    /// Block until the next event line arrives.
    ///
    /// Returns `DispatchError::EndOfStream` once the stream is exhausted.
    pub async fn wait_event(&mut self) -> DispatchResult<Event> {
        loop {
            self.buf.clear();
            let n = self.reader.read_until(b'\n', &mut self.buf).await?;
            if n == 0 {
                return Err(DispatchError::EndOfStream);
            }

            let line = String::from_utf8_lossy(&self.buf);
            log::log_incoming(&line);

            if let Some(event) = parse_line(&line) {
                return Ok(event);
            }
        }
    }
}
