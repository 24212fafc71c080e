//! Helpers shared by the socket-level tests.
#![allow(dead_code)]

use std::path::Path;

use tokio::io::{AsyncRead, AsyncReadExt};

/// A response as seen on the wire.
#[derive(Debug)]
pub struct RawResponse {
    pub status_line: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn status(&self) -> u16 {
        self.status_line
            .split_whitespace()
            .nth(1)
            .and_then(|s| s.parse().ok())
            .unwrap()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Reads exactly one response, using Content-Length to frame the body.
pub async fn read_response<R: AsyncRead + Unpin>(reader: &mut R) -> RawResponse {
    let mut head = Vec::new();
    let mut byte = [0u8; 1];
    while !head.ends_with(b"\r\n\r\n") {
        reader.read_exact(&mut byte).await.unwrap();
        head.push(byte[0]);
    }

    let head = String::from_utf8(head).unwrap();
    let mut lines = head.trim_end().split("\r\n");
    let status_line = lines.next().unwrap().to_string();
    let headers: Vec<(String, String)> = lines
        .map(|line| {
            let (k, v) = line.split_once(": ").unwrap();
            (k.to_string(), v.to_string())
        })
        .collect();

    let len: usize = headers
        .iter()
        .find(|(k, _)| k == "Content-Length")
        .map(|(_, v)| v.parse().unwrap())
        .unwrap_or(0);

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await.unwrap();

    RawResponse {
        status_line,
        headers,
        body,
    }
}

/// Asserts the peer closed the connection.
pub async fn assert_closed<R: AsyncRead + Unpin>(reader: &mut R) {
    let mut buf = [0u8; 1];
    let n = reader.read(&mut buf).await.unwrap_or(0);
    assert_eq!(n, 0, "connection should be closed");
}

/// Deterministic, non-repeating-ish file contents.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

pub fn write_file(root: &Path, rel: &str, contents: &[u8]) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, contents).unwrap();
}
