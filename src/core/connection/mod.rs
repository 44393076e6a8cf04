//! Outbound connections.
//!
//! A [`Connection`] is the shared write side of one byte stream. Its read
//! side is handed to exactly one [`ConnectionReader`], which keeps its own
//! `Arc` to the connection so swapping the [`ConnectionSlot`] never orphans
//! it mid-read.

pub mod connector;
pub mod reader;
pub mod slot;

pub use connector::Connector;
pub use reader::{ConnectionReader, ReaderState};
pub use slot::ConnectionSlot;

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::error::{NetConError, NetConResult};

pub type ConnectionId = u64;

/// Read half handed to the connection's reader.
pub type ConnectionRead = Box<dyn AsyncRead + Send + Unpin>;

type ConnectionWrite = Box<dyn AsyncWrite + Send + Unpin>;

static NEXT_CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

pub struct Connection {
    id: ConnectionId,
    target: String,
    writer: Mutex<Option<ConnectionWrite>>,
    closed: AtomicBool,
    cancel: CancellationToken,
}

impl Connection {
    /// Wrap an established stream, returning the shared handle and the read half.
    pub fn new<S>(target: impl Into<String>, stream: S) -> (Arc<Self>, ConnectionRead)
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (read_half, write_half) = tokio::io::split(stream);
        let connection = Arc::new(Self {
            id: NEXT_CONNECTION_ID.fetch_add(1, Ordering::Relaxed),
            target: target.into(),
            writer: Mutex::new(Some(Box::new(write_half))),
            closed: AtomicBool::new(false),
            cancel: CancellationToken::new(),
        });
        (connection, Box::new(read_half))
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// The target as the user typed it.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Write `line` followed by a newline.
    ///
    /// A write stalled on a peer that stops reading is abandoned as soon as
    /// the connection is closed.
    pub async fn send_line(&self, line: &str) -> NetConResult<()> {
        if self.is_closed() {
            return Err(self.closed_error());
        }

        let mut payload = Vec::with_capacity(line.len() + 1);
        payload.extend_from_slice(line.as_bytes());
        payload.push(b'\n');

        let write = async {
            let mut guard = self.writer.lock().await;
            let writer = guard.as_mut().ok_or_else(|| self.closed_error())?;
            writer.write_all(&payload).await?;
            writer.flush().await?;
            Ok::<_, NetConError>(())
        };

        let sent = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(self.closed_error()),
            result = write => result,
        };
        if sent.is_err() && self.is_closed() {
            // close() could not take the writer while this send held it
            self.release_writer();
        }
        sent?;

        debug!("Sent {} bytes to {}", payload.len(), self.target);
        Ok(())
    }

    /// Close the connection. Only the first call returns true.
    ///
    /// The reader is woken through the cancellation token; the socket itself
    /// is released once the last handle is dropped.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.cancel.cancel();
        // A writer busy in send_line releases its half once it sees the token
        self.release_writer();
        info!("Closed connection {} to {}", self.id, self.target);
        true
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Resolves once [`close`](Self::close) has been called.
    pub async fn closed(&self) {
        self.cancel.cancelled().await
    }

    fn release_writer(&self) {
        if let Ok(mut writer) = self.writer.try_lock() {
            writer.take();
        }
    }

    fn closed_error(&self) -> NetConError {
        NetConError::ConnectionClosed {
            target: self.target.clone(),
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}
