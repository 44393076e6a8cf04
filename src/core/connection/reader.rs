use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{Connection, ConnectionRead};
use crate::core::output::OutputSink;

pub const DEFAULT_READ_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    Idle,
    Reading,
    Closed,
    Errored,
}

/// Drains one connection into the output pane until it closes or fails.
///
/// Terminal states are final; reconnecting takes a fresh `connect`.
pub struct ConnectionReader {
    connection: Arc<Connection>,
    reader: ConnectionRead,
    sink: OutputSink,
    buffer_size: usize,
    state: ReaderState,
}

impl ConnectionReader {
    pub fn new(connection: Arc<Connection>, reader: ConnectionRead, sink: OutputSink) -> Self {
        Self {
            connection,
            reader,
            sink,
            buffer_size: DEFAULT_READ_BUFFER_SIZE,
            state: ReaderState::Idle,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.max(1);
        self
    }

    pub fn state(&self) -> ReaderState {
        self.state
    }

    pub fn spawn(self) -> JoinHandle<ReaderState> {
        tokio::spawn(self.run())
    }

    pub async fn run(self) -> ReaderState {
        let Self {
            connection,
            mut reader,
            sink,
            buffer_size,
            ..
        } = self;
        let id = connection.id();
        let mut buffer = vec![0u8; buffer_size];
        let mut decoder = Utf8Carry::default();

        debug!("Reader for connection {} ({}) started", id, connection.target());

        let (state, cause) = loop {
            let outcome = tokio::select! {
                biased;
                _ = connection.closed() => None,
                result = reader.read(&mut buffer) => Some(result),
            };

            match outcome {
                None => break (ReaderState::Closed, "connection closed".to_string()),
                Some(Ok(0)) => break (ReaderState::Closed, "connection closed by peer".to_string()),
                Some(Ok(n)) => {
                    let text = decoder.decode(&buffer[..n]);
                    if !text.is_empty() && !sink.received(id, text) {
                        break (ReaderState::Closed, "output closed".to_string());
                    }
                }
                Some(Err(e)) => {
                    warn!("Read from {} failed: {}", connection.target(), e);
                    break (ReaderState::Errored, e.to_string());
                }
            }
        };

        let rest = decoder.finish();
        if !rest.is_empty() {
            sink.received(id, rest);
        }
        sink.disconnected(id, connection.target(), cause.as_str());
        info!("Reader for {} finished: {}", connection.target(), cause);
        state
    }
}

/// Decodes a byte stream as UTF-8 across chunk boundaries.
#[derive(Debug, Default)]
struct Utf8Carry {
    pending: Vec<u8>,
}

impl Utf8Carry {
    fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::new();

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                        // Incomplete sequence at the end, wait for more bytes
                        None => {
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}
