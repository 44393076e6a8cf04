use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{info, warn};

use super::reader::DEFAULT_READ_BUFFER_SIZE;
use super::{Connection, ConnectionReader, ConnectionSlot};
use crate::core::output::OutputSink;
use crate::domain::config::{HostAlias, NetConConfig};
use crate::domain::error::{NetConError, NetConResult};

/// Dials targets and installs the result as the current connection.
///
/// No lock is held while dialing, so readers of already-open connections
/// keep making progress.
#[derive(Debug, Clone)]
pub struct Connector {
    slot: Arc<ConnectionSlot>,
    sink: OutputSink,
    hosts: Vec<HostAlias>,
    timeout: Duration,
    read_buffer_size: usize,
}

impl Connector {
    pub fn new(slot: Arc<ConnectionSlot>, sink: OutputSink) -> Self {
        Self {
            slot,
            sink,
            hosts: Vec::new(),
            timeout: Duration::from_secs(5),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }

    pub fn from_config(slot: Arc<ConnectionSlot>, sink: OutputSink, config: &NetConConfig) -> Self {
        Self {
            hosts: config.hosts.clone(),
            timeout: config.global.connect_timeout(),
            read_buffer_size: config.global.read_buffer_size,
            ..Self::new(slot, sink)
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn slot(&self) -> &Arc<ConnectionSlot> {
        &self.slot
    }

    /// Map a host alias to its address; anything else is dialed as given.
    pub fn resolve_alias<'a>(&'a self, target: &'a str) -> &'a str {
        self.hosts
            .iter()
            .find(|host| host.name == target)
            .map_or(target, |host| host.address.as_str())
    }

    /// Dial `target`, install the connection and start its reader.
    ///
    /// On failure the slot is left untouched.
    pub async fn connect(&self, target: &str) -> NetConResult<Arc<Connection>> {
        if target.trim().is_empty() {
            return Err(NetConError::InvalidInput("missing target address".to_string()));
        }
        let address = self.resolve_alias(target);
        let stream = dial(target, address, self.timeout).await?;
        info!("TCP connection established to {} ({})", target, address);
        Ok(self.attach(target, stream))
    }

    /// Install an already-open stream and spawn its reader.
    pub fn attach<S>(&self, target: &str, stream: S) -> Arc<Connection>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (connection, read_half) = Connection::new(target, stream);
        self.slot.install(Arc::clone(&connection));
        ConnectionReader::new(Arc::clone(&connection), read_half, self.sink.clone())
            .with_buffer_size(self.read_buffer_size)
            .spawn();
        connection
    }

    /// Close and forget the current connection.
    pub fn disconnect(&self) -> Option<Arc<Connection>> {
        self.slot.clear()
    }
}

async fn dial(target: &str, address: &str, timeout: Duration) -> NetConResult<TcpStream> {
    let addrs: Vec<SocketAddr> = tokio::net::lookup_host(address)
        .await
        .map_err(|e| NetConError::Resolve {
            target: target.to_string(),
            message: e.to_string(),
        })?
        .collect();

    if addrs.is_empty() {
        return Err(NetConError::Resolve {
            target: target.to_string(),
            message: "no addresses found".to_string(),
        });
    }

    let stream = tokio::time::timeout(timeout, TcpStream::connect(addrs.as_slice()))
        .await
        .map_err(|_| NetConError::Timeout {
            target: target.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })?
        .map_err(|source| NetConError::Dial {
            target: target.to_string(),
            source,
        })?;

    if let Err(e) = stream.set_nodelay(true) {
        warn!("Failed to set TCP_NODELAY: {}", e);
    }

    Ok(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::output::output_channel;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_installs_and_sends() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 5];
            socket.read_exact(&mut buf).await.unwrap();
            buf
        });

        let slot = Arc::new(ConnectionSlot::new());
        let (sink, _receiver) = output_channel();
        let connector = Connector::new(Arc::clone(&slot), sink);

        let connection = connector.connect(&addr.to_string()).await.unwrap();
        assert!(Arc::ptr_eq(&slot.get().unwrap(), &connection));

        connection.send_line("ping").await.unwrap();
        assert_eq!(&server.await.unwrap(), b"ping\n");
    }

    #[tokio::test]
    async fn test_unresolvable_target_leaves_slot_alone() {
        let slot = Arc::new(ConnectionSlot::new());
        let (sink, _receiver) = output_channel();
        let connector = Connector::new(Arc::clone(&slot), sink);

        let err = connector.connect("no-port-here").await.unwrap_err();
        assert!(matches!(err, NetConError::Resolve { ref target, .. } if target == "no-port-here"));
        assert!(slot.is_empty());
    }

    #[tokio::test]
    async fn test_blank_target_is_rejected_before_dialing() {
        let slot = Arc::new(ConnectionSlot::new());
        let (sink, _receiver) = output_channel();
        let connector = Connector::new(Arc::clone(&slot), sink);

        for blank in ["", "  "] {
            let err = connector.connect(blank).await.unwrap_err();
            assert!(matches!(err, NetConError::InvalidInput(_)), "{:?}", err);
            assert_eq!(err.cause(), "missing target address");
        }
        assert!(slot.is_empty());
    }

    #[tokio::test]
    async fn test_refused_dial_keeps_existing_connection() {
        // Grab a free port, then close the listener so the dial is refused
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let slot = Arc::new(ConnectionSlot::new());
        let (sink, _receiver) = output_channel();
        let connector = Connector::new(Arc::clone(&slot), sink);
        let (local, _remote) = tokio::io::duplex(16);
        let existing = connector.attach("existing:1", local);

        assert!(connector.connect(&addr.to_string()).await.is_err());
        assert!(Arc::ptr_eq(&slot.get().unwrap(), &existing));
        assert!(!existing.is_closed());
    }

    #[test]
    fn test_alias_resolution() {
        let mut config = NetConConfig::default();
        config.hosts.push(HostAlias {
            name: "echo".to_string(),
            address: "127.0.0.1:7".to_string(),
            description: String::new(),
        });
        let (sink, _receiver) = output_channel();
        let connector = Connector::from_config(Arc::new(ConnectionSlot::new()), sink, &config);

        assert_eq!(connector.resolve_alias("echo"), "127.0.0.1:7");
        assert_eq!(connector.resolve_alias("10.0.0.1:23"), "10.0.0.1:23");
    }
}
