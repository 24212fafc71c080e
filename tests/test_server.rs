//! Tests against a real loopback listener.

mod common;

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use common::{assert_closed, pattern, read_response, write_file};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use vodserver::config::Config;
use vodserver::server::listener;

async fn start_server(root: &Path, max_connections: Option<usize>) -> SocketAddr {
    let mut cfg = Config::default();
    cfg.server.port = 0;
    cfg.server.max_connections = max_connections;
    cfg.content.root = root.to_path_buf();

    let listener = listener::bind(&cfg.server).await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(listener::serve(listener, cfg.serve_config(), max_connections));
    addr
}

async fn get(addr: SocketAddr, request: &str) -> common::RawResponse {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request.as_bytes()).await.unwrap();
    let resp = read_response(&mut stream).await;
    assert_closed(&mut stream).await;
    resp
}

#[tokio::test]
async fn test_binds_loopback_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let addr = start_server(dir.path(), None).await;

    assert!(addr.ip().is_loopback());
}

#[tokio::test]
async fn test_identical_requests_differ_only_in_date() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "index.html", b"<html><body>hi</body></html>");
    let addr = start_server(dir.path(), None).await;

    let first = get(addr, "GET /index.html HTTP/1.1\r\n\r\n").await;
    let second = get(addr, "GET /index.html HTTP/1.1\r\n\r\n").await;

    let without_date = |resp: &common::RawResponse| {
        resp.headers
            .iter()
            .filter(|(k, _)| k != "Date")
            .cloned()
            .collect::<Vec<_>>()
    };

    assert_eq!(first.status(), 200);
    assert_eq!(first.header("Content-Type"), Some("text/html"));
    assert_eq!(first.status_line, second.status_line);
    assert_eq!(without_date(&first), without_date(&second));
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_twenty_mib_movie_first_chunk() {
    let dir = tempfile::tempdir().unwrap();
    let movie = pattern(20 * 1024 * 1024);
    write_file(dir.path(), "movie.mp4", &movie);
    let addr = start_server(dir.path(), None).await;

    let resp = get(addr, "GET /movie.mp4 HTTP/1.1\r\n\r\n").await;

    assert_eq!(resp.status(), 206);
    assert_eq!(resp.header("Content-Range"), Some("bytes 0-5242880/20971520"));
    assert_eq!(resp.header("Content-Length"), Some("5242880"));
    assert_eq!(resp.body.len(), 5_242_880);
    assert_eq!(resp.body, &movie[..5_242_880]);
}

#[tokio::test]
async fn test_connections_are_independent() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"aaaa");
    write_file(dir.path(), "b.css", b"body{}");
    let addr = start_server(dir.path(), None).await;

    // Idle client does not hold up others
    let _idle = TcpStream::connect(addr).await.unwrap();

    let (a, b) = tokio::join!(
        get(addr, "GET /a.txt HTTP/1.1\r\n\r\n"),
        get(addr, "GET /b.css HTTP/1.1\r\n\r\n"),
    );

    assert_eq!(a.body, b"aaaa");
    assert_eq!(b.header("Content-Type"), Some("text/css"));
}

#[tokio::test]
async fn test_max_connections_queues_extra_clients() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "a.txt", b"aaaa");
    let addr = start_server(dir.path(), Some(1)).await;

    let mut first = TcpStream::connect(addr).await.unwrap();
    first
        .write_all(b"GET /a.txt HTTP/1.1\r\nConnection: keep-alive\r\n\r\n")
        .await
        .unwrap();
    assert_eq!(read_response(&mut first).await.status(), 200);

    let mut second = TcpStream::connect(addr).await.unwrap();
    second
        .write_all(b"GET /a.txt HTTP/1.1\r\n\r\n")
        .await
        .unwrap();

    // `first` still holds the only slot
    let pending = tokio::time::timeout(Duration::from_millis(200), read_response(&mut second)).await;
    assert!(pending.is_err());

    drop(first);
    let resp = tokio::time::timeout(Duration::from_secs(5), read_response(&mut second))
        .await
        .unwrap();
    assert_eq!(resp.body, b"aaaa");
}
