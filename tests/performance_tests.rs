use std::sync::Arc;
use std::time::{Duration, Instant};
use netcon::core::{output_channel, Connection, ConnectionSlot, ConsoleEvent, OutputBuffer};
use netcon::core::connection::ConnectionReader;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

/// Performance and stress tests
#[cfg(test)]
mod performance_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_installs_leave_one_open_connection() {
        let slot = Arc::new(ConnectionSlot::new());

        let handles: Vec<_> = (0..8)
            .map(|task| {
                let slot = Arc::clone(&slot);
                tokio::spawn(async move {
                    let mut installed = Vec::new();
                    for n in 0..50 {
                        let (connection, _read) =
                            Connection::new(format!("task{}:{}", task, n), tokio::io::duplex(8).0);
                        slot.install(Arc::clone(&connection));
                        installed.push(connection);
                    }
                    installed
                })
            })
            .collect();

        let mut all = Vec::new();
        for handle in handles {
            all.extend(handle.await.expect("Task panicked"));
        }

        let current = slot.get().expect("one connection stays current");
        let open: Vec<_> = all.iter().filter(|connection| !connection.is_closed()).collect();
        assert_eq!(open.len(), 1);
        assert!(Arc::ptr_eq(open[0], &current));
    }

    #[tokio::test]
    async fn test_reader_throughput_preserves_order() {
        let (sink, mut events) = output_channel();
        let (local, mut remote) = tokio::io::duplex(4096);
        let (connection, read) = Connection::new("bulk:1", local);
        let reader = ConnectionReader::new(Arc::clone(&connection), read, sink).spawn();

        let expected: String = (0..20_000).map(|n| format!("line {}\n", n)).collect();
        let payload = expected.clone();
        let start = Instant::now();
        tokio::spawn(async move {
            remote.write_all(payload.as_bytes()).await.unwrap();
        });

        let mut received = String::new();
        let mut disconnects = 0;
        timeout(Duration::from_secs(10), async {
            while let Some(event) = events.recv().await {
                match event {
                    ConsoleEvent::Received { text, .. } => received.push_str(&text),
                    ConsoleEvent::Disconnected { .. } => {
                        disconnects += 1;
                        break;
                    }
                    ConsoleEvent::Notice(_) => {}
                }
            }
        })
        .await
        .expect("reader did not finish");

        assert_eq!(received, expected);
        assert_eq!(disconnects, 1);
        assert!(reader.await.is_ok());
        assert!(start.elapsed() < Duration::from_secs(10));
    }

    #[test]
    fn test_output_buffer_stays_bounded() {
        let mut buffer = OutputBuffer::new(500);

        let start = Instant::now();
        for n in 0..100_000 {
            buffer.push_str(&format!("chunk {}\n", n));
        }
        let elapsed = start.elapsed();

        assert!(buffer.line_count() <= 501);
        assert_eq!(buffer.lines().last(), Some("chunk 99999"));
        assert!(elapsed < Duration::from_secs(5), "Output buffering too slow: {:?}", elapsed);
    }
}
