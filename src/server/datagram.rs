//! Datagram Server
//!
//! Runs the request loop over one UDP socket. Each inbound datagram is one
//! request line; each reply goes back as one datagram to the sender.
//!
//! ## Request Lifecycle
//!
//! ```text
//! recv_from ──> decode (lossy UTF-8) ──> trim ──> CommandHandler::execute
//!                                                         │
//!                        send_to <── serialize <──────────┘
//! ```
//!
//! Datagrams are read one at a time. A failed receive or send is logged and
//! counted, and the loop moves on to the next datagram; nothing is retried.
//! Payloads longer than [`MAX_DATAGRAM_SIZE`] are truncated by the socket
//! before they reach the parser.

use crate::commands::CommandHandler;
use crate::MAX_DATAGRAM_SIZE;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tracing::{debug, info, trace, warn};

/// Statistics for the request loop
#[derive(Debug, Default)]
pub struct ServerStats {
    /// Datagrams read from the socket
    pub datagrams_received: AtomicU64,
    /// Replies written to the socket
    pub replies_sent: AtomicU64,
    /// Empty requests dropped without a reply
    pub requests_dropped: AtomicU64,
    /// Failed receives
    pub receive_errors: AtomicU64,
    /// Failed sends
    pub send_errors: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ServerStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn datagram_received(&self, bytes: usize) {
        self.datagrams_received.fetch_add(1, Ordering::Relaxed);
        self.bytes_read.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn reply_sent(&self, bytes: usize) {
        self.replies_sent.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn request_dropped(&self) {
        self.requests_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn receive_failed(&self) {
        self.receive_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn send_failed(&self) {
        self.send_errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Errors that can occur while setting up the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The socket could not be bound
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error on the bound socket
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Serves requests arriving on a UDP socket.
#[derive(Debug)]
pub struct DatagramServer {
    /// The bound socket
    socket: UdpSocket,

    /// The command handler (owns a handle to the store)
    handler: CommandHandler,

    /// Request loop statistics (shared)
    stats: Arc<ServerStats>,
}

impl DatagramServer {
    /// Binds a UDP socket on `addr` and wraps it in a server.
    ///
    /// # Arguments
    ///
    /// * `addr` - Address to bind, e.g. `0.0.0.0:8080`
    /// * `handler` - The command handler for executing requests
    /// * `stats` - Shared request loop statistics
    pub async fn bind(
        addr: &str,
        handler: CommandHandler,
        stats: Arc<ServerStats>,
    ) -> Result<Self, ServerError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.to_string(),
                source,
            })?;

        Ok(Self::from_socket(socket, handler, stats))
    }

    /// Wraps an already bound socket.
    pub fn from_socket(
        socket: UdpSocket,
        handler: CommandHandler,
        stats: Arc<ServerStats>,
    ) -> Self {
        Self {
            socket,
            handler,
            stats,
        }
    }

    /// Returns the address the socket is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.socket.local_addr()?)
    }

    /// Runs the request loop. Never returns; stop it by dropping the future.
    pub async fn run(self) {
        match self.socket.local_addr() {
            Ok(addr) => info!(addr = %addr, "Listening for datagrams"),
            Err(e) => warn!(error = %e, "Listening on unknown address"),
        }

        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        loop {
            self.serve_one(&mut buf).await;
        }
    }

    /// Receives one datagram and answers it.
    async fn serve_one(&self, buf: &mut [u8]) {
        let (n, peer) = match self.socket.recv_from(buf).await {
            Ok(received) => received,
            Err(e) => {
                self.stats.receive_failed();
                warn!(error = %e, "Failed to receive datagram");
                return;
            }
        };
        self.stats.datagram_received(n);
        trace!(client = %peer, bytes = n, "Read datagram");

        let request = String::from_utf8_lossy(&buf[..n]);
        let line = request.trim();

        let Some(response) = self.handler.execute(line) else {
            self.stats.request_dropped();
            trace!(client = %peer, "Dropped empty request");
            return;
        };
        debug!(client = %peer, request = %line, response = %response, "Handled request");

        let payload = response.serialize();
        match self.socket.send_to(&payload, peer).await {
            Ok(sent) => {
                self.stats.reply_sent(sent);
                trace!(client = %peer, bytes = sent, "Sent reply");
            }
            Err(e) => {
                self.stats.send_failed();
                warn!(client = %peer, error = %e, "Failed to send reply");
            }
        }
    }
}

/// Binds a server on `addr` and runs it until the future is dropped.
///
/// Only returns if binding fails.
pub async fn serve(
    addr: &str,
    handler: CommandHandler,
    stats: Arc<ServerStats>,
) -> Result<(), ServerError> {
    let server = DatagramServer::bind(addr, handler, stats).await?;
    server.run().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageEngine;
    use std::time::Duration;
    use tokio::time::timeout;
    use tokio_test::assert_ok;

    async fn create_test_server() -> (SocketAddr, Arc<StorageEngine>, Arc<ServerStats>) {
        let storage = Arc::new(StorageEngine::new());
        let stats = Arc::new(ServerStats::new());
        let handler = CommandHandler::new(Arc::clone(&storage));

        let server = DatagramServer::bind("127.0.0.1:0", handler, Arc::clone(&stats))
            .await
            .unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        (addr, storage, stats)
    }

    async fn connect(server: SocketAddr) -> UdpSocket {
        let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        client.connect(server).await.unwrap();
        client
    }

    async fn request(client: &UdpSocket, line: &str) -> String {
        assert_ok!(client.send(line.as_bytes()).await);

        let mut buf = [0u8; 2048];
        let n = timeout(Duration::from_secs(2), client.recv(&mut buf))
            .await
            .expect("timed out waiting for reply")
            .unwrap();
        String::from_utf8(buf[..n].to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_ping_pong() {
        let (addr, _, _) = create_test_server().await;
        let client = connect(addr).await;

        assert_eq!(request(&client, "PING").await, "PONG");
    }

    #[tokio::test]
    async fn test_set_get() {
        let (addr, storage, _) = create_test_server().await;
        let client = connect(addr).await;

        assert_eq!(request(&client, "SET name Ariz\n").await, "OK");
        assert_eq!(request(&client, "GET name").await, "Ariz");
        assert_eq!(storage.get("name"), Some("Ariz".to_string()));
    }

    #[tokio::test]
    async fn test_errors_keep_server_running() {
        let (addr, _, _) = create_test_server().await;
        let client = connect(addr).await;

        assert_eq!(
            request(&client, "FROB x").await,
            "(error) ERR unknown command"
        );
        assert_eq!(
            request(&client, "SET onlykey").await,
            "(error) ERR wrong number of arguments for 'SET' command"
        );
        assert_eq!(request(&client, "GET missing").await, "(nil)");
        assert_eq!(request(&client, "PING").await, "PONG");
    }

    #[tokio::test]
    async fn test_empty_request_gets_no_reply() {
        let (addr, _, stats) = create_test_server().await;
        let client = connect(addr).await;

        assert_ok!(client.send(b"   \r\n").await);

        // The next reply belongs to PING, not to the blank request
        assert_eq!(request(&client, "PING").await, "PONG");

        // Give the server time to record the send
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(stats.requests_dropped.load(Ordering::Relaxed), 1);
        assert_eq!(stats.datagrams_received.load(Ordering::Relaxed), 2);
        assert_eq!(stats.replies_sent.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn test_oversized_datagram_is_truncated() {
        let (addr, _, _) = create_test_server().await;
        let client = connect(addr).await;

        let line = format!("SET big {}", "x".repeat(2 * MAX_DATAGRAM_SIZE));
        assert_eq!(request(&client, &line).await, "OK");

        let stored = request(&client, "GET big").await;
        assert_eq!(stored.len(), MAX_DATAGRAM_SIZE - "SET big ".len());
    }

    #[tokio::test]
    async fn test_multiple_clients() {
        let (addr, storage, stats) = create_test_server().await;

        let mut tasks = Vec::new();
        for i in 0..8 {
            tasks.push(tokio::spawn(async move {
                let client = connect(addr).await;
                let reply = request(&client, &format!("SET key{} value{}", i, i)).await;
                assert_eq!(reply, "OK");
                request(&client, &format!("GET key{}", i)).await
            }));
        }

        for (i, task) in tasks.into_iter().enumerate() {
            assert_eq!(task.await.unwrap(), format!("value{}", i));
        }

        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(storage.len(), 8);
        assert_eq!(stats.replies_sent.load(Ordering::Relaxed), 16);
        assert!(stats.bytes_read.load(Ordering::Relaxed) > 0);
        assert!(stats.bytes_written.load(Ordering::Relaxed) > 0);
    }

    #[tokio::test]
    async fn test_bind_error() {
        let taken = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = taken.local_addr().unwrap().to_string();

        let handler = CommandHandler::new(Arc::new(StorageEngine::new()));
        let err = DatagramServer::bind(&addr, handler, Arc::new(ServerStats::new()))
            .await
            .unwrap_err();

        assert!(matches!(err, ServerError::Bind { .. }));
        assert!(err.to_string().contains(&addr));
    }
}
