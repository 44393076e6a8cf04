use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;

use super::connection::ConnectionSlot;
use super::output::{ConsoleEvent, OutputBuffer};

/// UI-task side of the output stream.
///
/// Drains events sent by readers, the dispatcher and scripts, applies them to
/// the output buffer and releases connections whose reader has finished.
#[derive(Debug)]
pub struct Console {
    output: OutputBuffer,
    events: UnboundedReceiver<ConsoleEvent>,
    slot: Arc<ConnectionSlot>,
}

impl Console {
    pub fn new(events: UnboundedReceiver<ConsoleEvent>, slot: Arc<ConnectionSlot>, scrollback: usize) -> Self {
        Self {
            output: OutputBuffer::new(scrollback),
            events,
            slot,
        }
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    /// Apply every event queued so far; returns how many were applied.
    pub fn drain(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply(&event);
            applied += 1;
        }
        applied
    }

    pub fn apply(&mut self, event: &ConsoleEvent) {
        if let ConsoleEvent::Disconnected { connection, .. } = event {
            if self.slot.release(*connection) {
                debug!("Released connection {} after disconnect", connection);
            }
        }
        self.output.apply(event);
    }

    /// Target of the current connection, for the pane title.
    pub fn current_target(&self) -> Option<String> {
        self.slot.get().map(|connection| connection.target().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::connection::Connection;
    use crate::core::output::output_channel;

    #[test]
    fn test_disconnect_releases_current_connection() {
        let slot = Arc::new(ConnectionSlot::new());
        let (sink, receiver) = output_channel();
        let mut console = Console::new(receiver, Arc::clone(&slot), 100);

        let (connection, _read) = Connection::new("peer:9", tokio::io::duplex(8).0);
        slot.install(Arc::clone(&connection));
        assert_eq!(console.current_target().as_deref(), Some("peer:9"));

        sink.received(connection.id(), "bye\n".to_string());
        sink.disconnected(connection.id(), "peer:9", "connection closed by peer");
        assert_eq!(console.drain(), 2);

        assert!(slot.is_empty());
        assert!(console.current_target().is_none());
        assert_eq!(
            console.output().lines().collect::<Vec<_>>(),
            vec!["bye", "Disconnected from \"peer:9\": connection closed by peer"]
        );
    }

    #[test]
    fn test_stale_disconnect_keeps_successor() {
        let slot = Arc::new(ConnectionSlot::new());
        let (sink, receiver) = output_channel();
        let mut console = Console::new(receiver, Arc::clone(&slot), 100);

        let (old, _) = Connection::new("old:1", tokio::io::duplex(8).0);
        let (new, _) = Connection::new("new:1", tokio::io::duplex(8).0);
        slot.install(Arc::clone(&old));
        slot.install(Arc::clone(&new));

        sink.disconnected(old.id(), "old:1", "connection closed");
        console.drain();

        assert!(Arc::ptr_eq(&slot.get().unwrap(), &new));
        assert!(!new.is_closed());
    }
}
