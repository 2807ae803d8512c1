use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Size of the single read taken from each responding host.
pub const READ_BUFFER_SIZE: usize = 1024;

/// How one probe ended.
#[derive(Debug)]
pub enum ProbeOutcome {
    Success(Vec<u8>),
    /// Connect or read exceeded the probe timeout.
    Timeout,
    /// Refused, unreachable, reset and friends.
    ConnectionError(io::Error),
    /// Connected, but the peer closed without sending anything.
    NoData,
}

#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome;
}

/// Connects over TCP and takes one bounded read of whatever the server
/// volunteers. SSH servers send their identification line unprompted, so
/// nothing is written.
#[derive(Debug, Clone)]
pub struct TcpProber {
    port: u16,
    timeout: Duration,
}

impl TcpProber {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        let socket = SocketAddr::from((addr, self.port));

        // The stream is dropped, and the socket closed, on every return below.
        let mut stream = match timeout(self.timeout, TcpStream::connect(socket)).await {
            Ok(Ok(stream)) => stream,
            Ok(Err(e)) => return ProbeOutcome::ConnectionError(e),
            Err(_) => return ProbeOutcome::Timeout,
        };

        let mut buffer = vec![0u8; READ_BUFFER_SIZE];
        match timeout(self.timeout, stream.read(&mut buffer)).await {
            Ok(Ok(0)) => ProbeOutcome::NoData,
            Ok(Ok(bytes_read)) => {
                buffer.truncate(bytes_read);
                ProbeOutcome::Success(buffer)
            }
            Ok(Err(e)) => ProbeOutcome::ConnectionError(e),
            Err(_) => ProbeOutcome::Timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    const LOCALHOST: Ipv4Addr = Ipv4Addr::LOCALHOST;

    async fn listener() -> (TcpListener, u16) {
        let listener = TcpListener::bind((LOCALHOST, 0)).await.unwrap();
        let port = listener.local_addr().unwrap().port();
        (listener, port)
    }

    #[tokio::test]
    async fn test_reads_banner() {
        let (listener, port) = listener().await;
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"SSH-2.0-TestServer\r\n").await.unwrap();
        });

        let prober = TcpProber::new(port, Duration::from_millis(1000));
        match prober.probe(LOCALHOST).await {
            ProbeOutcome::Success(bytes) => assert_eq!(bytes, b"SSH-2.0-TestServer\r\n"),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_read_is_capped_at_buffer_size() {
        let (listener, port) = listener().await;
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let _ = socket.write_all(&[b'x'; 4096]).await;
        });

        let prober = TcpProber::new(port, Duration::from_millis(1000));
        match prober.probe(LOCALHOST).await {
            ProbeOutcome::Success(bytes) => assert!(!bytes.is_empty() && bytes.len() <= READ_BUFFER_SIZE),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let (listener, port) = listener().await;
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_millis(500)).await;
            drop(socket);
        });

        let prober = TcpProber::new(port, Duration::from_millis(50));
        assert!(matches!(prober.probe(LOCALHOST).await, ProbeOutcome::Timeout));
        server.abort();
    }

    #[tokio::test]
    async fn test_immediate_close_is_no_data() {
        let (listener, port) = listener().await;
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            drop(socket);
        });

        let prober = TcpProber::new(port, Duration::from_millis(1000));
        assert!(matches!(prober.probe(LOCALHOST).await, ProbeOutcome::NoData));
    }

    #[tokio::test]
    async fn test_closed_port_is_connection_error() {
        let (listener, port) = listener().await;
        drop(listener);

        let prober = TcpProber::new(port, Duration::from_millis(1000));
        match prober.probe(LOCALHOST).await {
            ProbeOutcome::ConnectionError(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionRefused),
            other => panic!("expected connection error, got {other:?}"),
        }
    }
}
