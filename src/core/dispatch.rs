//! Routing of submitted input lines.

use std::sync::Arc;

use tracing::{debug, warn};

use super::connection::ConnectionSlot;
use super::output::OutputSink;
use super::scripting::ScriptBridge;

/// Leading character marking a line as a script command.
pub const SENTINEL: char = '/';

/// Classification of a trimmed, non-empty input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputLine<'a> {
    /// Sentinel stripped, to be evaluated.
    Script(&'a str),
    /// To be written to the current connection.
    Payload(&'a str),
}

impl<'a> InputLine<'a> {
    /// Trim and classify; blank lines yield `None`.
    pub fn classify(raw: &'a str) -> Option<Self> {
        let line = raw.trim();
        if line.is_empty() {
            return None;
        }
        Some(match line.strip_prefix(SENTINEL) {
            Some(expression) => Self::Script(expression),
            None => Self::Payload(line),
        })
    }
}

/// What a submitted line turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    Ignored,
    Evaluated,
    EvaluationFailed,
    Sent,
    SendFailed,
    Undeliverable,
}

/// Consumes submitted lines on the UI task.
///
/// Every notice goes through the output sink so it lands in the same order as
/// output produced by scripts during evaluation.
#[derive(Debug)]
pub struct LineDispatcher {
    slot: Arc<ConnectionSlot>,
    scripting: ScriptBridge,
    sink: OutputSink,
    local_echo: bool,
}

impl LineDispatcher {
    pub fn new(slot: Arc<ConnectionSlot>, scripting: ScriptBridge, sink: OutputSink) -> Self {
        Self {
            slot,
            scripting,
            sink,
            local_echo: false,
        }
    }

    pub fn with_local_echo(mut self, local_echo: bool) -> Self {
        self.local_echo = local_echo;
        self
    }

    pub fn scripting(&self) -> &ScriptBridge {
        &self.scripting
    }

    pub async fn submit(&self, raw: &str) -> Dispatch {
        let outcome = match InputLine::classify(raw) {
            None => Dispatch::Ignored,
            Some(InputLine::Script(expression)) => self.evaluate(expression).await,
            Some(InputLine::Payload(line)) => self.send(line).await,
        };
        debug!("Dispatched {:?} as {:?}", raw, outcome);
        outcome
    }

    async fn evaluate(&self, expression: &str) -> Dispatch {
        match self.scripting.evaluate(expression).await {
            Ok(rendered) => {
                self.sink.notice(rendered);
                Dispatch::Evaluated
            }
            Err(e) => {
                self.sink
                    .notice(format!("Error executing {:?}: {}", expression, e.cause()));
                Dispatch::EvaluationFailed
            }
        }
    }

    async fn send(&self, line: &str) -> Dispatch {
        let Some(connection) = self.slot.get() else {
            self.sink.notice(format!("Nowhere to send {:?}", line));
            return Dispatch::Undeliverable;
        };

        match connection.send_line(line).await {
            Ok(()) => {
                if self.local_echo {
                    self.sink.notice(format!("> {}", line));
                }
                Dispatch::Sent
            }
            Err(e) => {
                warn!("Write to {} failed: {}", connection.target(), e);
                self.sink.notice(format!(
                    "Failed to send to {:?}: {}",
                    connection.target(),
                    e.cause()
                ));
                Dispatch::SendFailed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_classify() {
        assert_eq!(InputLine::classify("  /connect('a:1') "), Some(InputLine::Script("connect('a:1')")));
        assert_eq!(InputLine::classify("hello world\n"), Some(InputLine::Payload("hello world")));
        assert_eq!(InputLine::classify("/"), Some(InputLine::Script("")));
        assert_eq!(InputLine::classify(" \t "), None);
        assert_eq!(InputLine::classify(""), None);
    }

    #[test]
    fn test_sentinel_only_counts_at_start() {
        assert_eq!(InputLine::classify("a/b"), Some(InputLine::Payload("a/b")));
    }

    proptest! {
        #[test]
        fn prop_payload_never_starts_with_sentinel(raw in "\\PC{0,40}") {
            match InputLine::classify(&raw) {
                Some(InputLine::Payload(line)) => {
                    prop_assert!(!line.starts_with(SENTINEL));
                    prop_assert_eq!(line, line.trim());
                    prop_assert!(!line.is_empty());
                }
                Some(InputLine::Script(_)) => prop_assert!(raw.trim().starts_with(SENTINEL)),
                None => prop_assert!(raw.trim().is_empty()),
            }
        }
    }
}
