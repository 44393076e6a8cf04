//! Output stream plumbing.
//!
//! Producers on any task hold an [`OutputSink`] and send [`ConsoleEvent`]s
//! through an unbounded channel. Only the UI task owns the [`OutputBuffer`]
//! and applies those events to it, one event at a time.

use std::collections::VecDeque;

use tokio::sync::mpsc;
use tracing::debug;

use super::connection::ConnectionId;

/// Something that must end up in the output pane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    /// A complete, human-readable line produced locally.
    Notice(String),
    /// Raw text read from a connection.
    Received {
        connection: ConnectionId,
        text: String,
    },
    /// A connection reader has terminated.
    Disconnected {
        connection: ConnectionId,
        target: String,
        cause: String,
    },
}

impl ConsoleEvent {
    pub fn disconnect_notice(target: &str, cause: &str) -> String {
        format!("Disconnected from {:?}: {}", target, cause)
    }
}

/// Cloneable, thread-safe append handle for the output pane.
#[derive(Debug, Clone)]
pub struct OutputSink {
    sender: mpsc::UnboundedSender<ConsoleEvent>,
}

/// Create the sink and the receiving end drained by the UI task.
pub fn output_channel() -> (OutputSink, mpsc::UnboundedReceiver<ConsoleEvent>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (OutputSink { sender }, receiver)
}

impl OutputSink {
    pub fn notice(&self, text: impl Into<String>) -> bool {
        self.send(ConsoleEvent::Notice(text.into()))
    }

    pub fn received(&self, connection: ConnectionId, text: String) -> bool {
        self.send(ConsoleEvent::Received { connection, text })
    }

    pub fn disconnected(&self, connection: ConnectionId, target: &str, cause: impl Into<String>) -> bool {
        self.send(ConsoleEvent::Disconnected {
            connection,
            target: target.to_string(),
            cause: cause.into(),
        })
    }

    /// Returns false once the UI side has gone away.
    fn send(&self, event: ConsoleEvent) -> bool {
        match self.sender.send(event) {
            Ok(()) => true,
            Err(e) => {
                debug!("Output pane closed, dropping event: {:?}", e.0);
                false
            }
        }
    }
}

/// Append-only text buffer behind the output pane.
///
/// The last line is always "open": raw text keeps extending it until a
/// newline arrives. Old lines are discarded past `limit`.
#[derive(Debug, Clone)]
pub struct OutputBuffer {
    lines: VecDeque<String>,
    limit: usize,
}

impl OutputBuffer {
    pub fn new(limit: usize) -> Self {
        let mut lines = VecDeque::new();
        lines.push_back(String::new());
        Self {
            lines,
            limit: limit.max(1),
        }
    }

    /// Append raw text, continuing the open line.
    pub fn push_str(&mut self, text: &str) {
        for c in text.chars() {
            match c {
                '\n' => self.lines.push_back(String::new()),
                '\r' => {}
                c => {
                    if let Some(open) = self.lines.back_mut() {
                        open.push(c);
                    }
                }
            }
        }
        self.trim();
    }

    /// Append a notice as a line of its own.
    pub fn push_line(&mut self, text: &str) {
        if self.lines.back().is_some_and(|open| !open.is_empty()) {
            self.lines.push_back(String::new());
        }
        self.push_str(text);
        self.lines.push_back(String::new());
        self.trim();
    }

    pub fn apply(&mut self, event: &ConsoleEvent) {
        match event {
            ConsoleEvent::Notice(text) => self.push_line(text),
            ConsoleEvent::Received { text, .. } => self.push_str(text),
            ConsoleEvent::Disconnected { target, cause, .. } => {
                self.push_line(&ConsoleEvent::disconnect_notice(target, cause))
            }
        }
    }

    /// Lines for display; a trailing empty open line is omitted.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        let shown = match self.lines.back() {
            Some(open) if open.is_empty() => self.lines.len() - 1,
            _ => self.lines.len(),
        };
        self.lines.iter().take(shown).map(String::as_str)
    }

    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    pub fn is_empty(&self) -> bool {
        self.line_count() == 0
    }

    /// Everything currently buffered, newlines included.
    pub fn contents(&self) -> String {
        self.lines.iter().map(String::as_str).collect::<Vec<_>>().join("\n")
    }

    fn trim(&mut self) {
        while self.lines.len() > self.limit + 1 {
            self.lines.pop_front();
        }
    }
}

impl Default for OutputBuffer {
    fn default() -> Self {
        Self::new(1000)
    }
}
