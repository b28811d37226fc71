//! Read-dispatch loop.
//!
//! One event is read, looked up and replayed before the next read. Unmapped
//! events are reported on the diagnostic writer and skipped.

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncWrite};

use crate::error::DispatchError;
use crate::log;
use crate::sink::ActionSink;
use crate::source::{Event, EventSource};
use crate::table::{ActionTable, Lookup};

/// What happened to a single event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Performed,
    /// Mapped to no action
    Ignored,
    Unhandled,
}

pub struct Dispatcher<R, W, D> {
    source: EventSource<R>,
    sink: ActionSink<W>,
    table: ActionTable,
    report: D,
}

impl<R, W, D> Dispatcher<R, W, D>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    D: Write,
{
    pub fn new(source: EventSource<R>, sink: ActionSink<W>, table: ActionTable, report: D) -> Self {
        Self {
            source,
            sink,
            table,
            report,
        }
    }

    pub async fn dispatch(&mut self, event: &Event) -> Outcome {
        match self.table.lookup(event.as_str()) {
            Lookup::Action(action) => {
                log::log_dispatch(event.as_str(), &action.to_string());
                self.sink.perform(action).await;
                Outcome::Performed
            }
            Lookup::NoAction => {
                log::log_dispatch(event.as_str(), "none");
                Outcome::Ignored
            }
            Lookup::Unmapped => {
                log::log_dispatch(event.as_str(), "unhandled");
                if let Err(e) = writeln!(self.report, "unhandled event {}", event.as_str())
                    .and_then(|_| self.report.flush())
                {
                    log::log(&format!("Diagnostic write failed: {}", e));
                }
                Outcome::Unhandled
            }
        }
    }

    /// Dispatch events until the source ends. Only returns with the error
    /// that stopped it, `DispatchError::EndOfStream` on a clean close.
    pub async fn run(&mut self) -> DispatchError {
        loop {
            match self.source.wait_event().await {
                Ok(event) => {
                    self.dispatch(&event).await;
                }
                Err(e) => {
                    log::log(&format!("Dispatch loop stopped: {}", e));
                    return e;
                }
            }
        }
    }

    #[cfg(test)]
    fn parts(&self) -> (&ActionSink<W>, &D) {
        (&self.sink, &self.report)
    }
}
