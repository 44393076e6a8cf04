use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use super::{Connection, ConnectionId};

/// Holder of the single current outbound connection.
///
/// Replacement is last-writer-wins. A superseded connection is closed after
/// the lock is released, which wakes its reader with a clean "closed" result.
#[derive(Debug, Default)]
pub struct ConnectionSlot {
    current: Mutex<Option<Arc<Connection>>>,
}

impl ConnectionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `connection` current, closing and returning the one it replaces.
    pub fn install(&self, connection: Arc<Connection>) -> Option<Arc<Connection>> {
        let previous = self.lock().replace(Arc::clone(&connection));

        match previous {
            Some(ref previous) if Arc::ptr_eq(previous, &connection) => {}
            Some(ref previous) => {
                debug!(
                    "Connection {} to {} superseded by {}",
                    previous.id(),
                    previous.target(),
                    connection.id()
                );
                previous.close();
            }
            None => {}
        }
        previous
    }

    /// The current connection, if any. Never blocks on I/O.
    pub fn get(&self) -> Option<Arc<Connection>> {
        self.lock().clone()
    }

    /// Remove and close the current connection.
    pub fn clear(&self) -> Option<Arc<Connection>> {
        let previous = self.lock().take();
        if let Some(ref previous) = previous {
            previous.close();
        }
        previous
    }

    /// Clear the slot only if `id` is still the current connection.
    pub fn release(&self, id: ConnectionId) -> bool {
        let released = {
            let mut current = self.lock();
            match current.as_ref() {
                Some(connection) if connection.id() == id => current.take(),
                _ => None,
            }
        };

        match released {
            Some(connection) => {
                connection.close();
                true
            }
            None => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_none()
    }

    // The guarded value is a plain Option, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, Option<Arc<Connection>>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
