use std::io;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sshscope::scanner::{ProbeOutcome, Prober, ScanConfig, Scanner};
use sshscope::ScanError;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

fn padded_banner(version: &str) -> Vec<u8> {
    let mut raw = format!("{version}\r\n").into_bytes();
    raw.resize(300, b'#');
    raw
}

/// Serves `payload` to every connection on 127.0.0.1 only, so other
/// loopback addresses on the same port refuse.
async fn spawn_responder(payload: Vec<u8>) -> u16 {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let payload = payload.clone();
            tokio::spawn(async move {
                let _ = socket.write_all(&payload).await;
            });
        }
    });
    port
}

#[tokio::test]
async fn test_loopback_sweep_finds_responder() {
    let port = spawn_responder(padded_banner("SSH-2.0-TestServer")).await;
    let scanner = Scanner::new(
        ScanConfig::default()
            .port(port)
            .timeout(Duration::from_millis(500)),
    );

    let report = scanner.scan("127.0.0.0/30").await.unwrap();

    assert_eq!(report.summary.attempted, 2);
    assert_eq!(report.results.len(), 1);
    let host = &report.results[0];
    assert_eq!(host.address, Ipv4Addr::new(127, 0, 0, 1));
    assert_eq!(host.protocol_version, "SSH-2.0-TestServer");
    assert_eq!(host.kex_method_blob.len(), 108);
}

#[tokio::test]
async fn test_loopback_sweep_skips_garbage() {
    let port = spawn_responder(vec![b'z'; 200]).await;
    let scanner = Scanner::new(
        ScanConfig::default()
            .port(port)
            .timeout(Duration::from_millis(500)),
    );

    let report = scanner.scan("127.0.0.1/32").await.unwrap();

    assert!(report.results.is_empty());
    assert_eq!(report.summary.responded, 1);
    assert_eq!(report.summary.malformed, 1);
}

#[tokio::test]
async fn test_silent_listener_is_absent() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let scanner = Scanner::new(
        ScanConfig::default()
            .port(port)
            .timeout(Duration::from_millis(100)),
    );
    let report = scanner.scan("127.0.0.1/32").await.unwrap();

    assert!(report.results.is_empty());
    assert_eq!(report.summary.timeouts + report.summary.no_data, 1);
    server.abort();
}

/// Stands in for 192.0.2.0/30: `.1` runs sshd, `.2` refuses.
struct DocumentationNet;

#[async_trait]
impl Prober for DocumentationNet {
    async fn probe(&self, addr: Ipv4Addr) -> ProbeOutcome {
        if addr == Ipv4Addr::new(192, 0, 2, 1) {
            ProbeOutcome::Success(padded_banner("SSH-2.0-OpenSSH_8.9"))
        } else {
            ProbeOutcome::ConnectionError(io::Error::from(io::ErrorKind::ConnectionRefused))
        }
    }
}

#[tokio::test]
async fn test_documentation_range_end_to_end() {
    let scanner = Scanner::new(ScanConfig::default()).with_prober(Arc::new(DocumentationNet));

    let report = scanner.scan("192.0.2.0/30").await.unwrap();

    assert_eq!(report.results.len(), 1);
    assert_eq!(report.results[0].address, Ipv4Addr::new(192, 0, 2, 1));
    assert_eq!(report.results[0].protocol_version, "SSH-2.0-OpenSSH_8.9");
    assert_eq!(report.summary.connection_errors, 1);
}

#[tokio::test]
async fn test_host_bits_are_fatal() {
    let scanner = Scanner::new(ScanConfig::default()).with_prober(Arc::new(DocumentationNet));
    let err = scanner.scan("192.0.2.1/30").await.unwrap_err();
    assert!(matches!(err, ScanError::InvalidRange { .. }));
}
