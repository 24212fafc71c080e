use crate::http::request::{Method, Request};
use std::collections::HashMap;
use thiserror::Error;

/// Largest request head accepted before giving up on finding `\r\n\r\n`.
pub const MAX_HEAD_BYTES: usize = 64 * 1024;

/// Largest request body the connection will wait for and discard.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed request line")]
    InvalidRequest,
    #[error("unknown request method")]
    InvalidMethod,
    #[error("malformed header line")]
    InvalidHeader,
    #[error("invalid Content-Length")]
    InvalidContentLength,
    #[error("request head too large")]
    HeadersTooLarge,
    #[error("request body too large")]
    BodyTooLarge,
    #[error("incomplete request")]
    Incomplete,
}

/// Parses one request from the front of `buf`.
///
/// Returns the request and the number of bytes it occupied, or
/// `ParseError::Incomplete` when more bytes are needed. A body announced by
/// `Content-Length` is skipped over, not kept.
pub fn parse_http_request(buf: &[u8]) -> Result<(Request, usize), ParseError> {
    let Some(headers_end) = find_headers_end(buf) else {
        if buf.len() > MAX_HEAD_BYTES {
            return Err(ParseError::HeadersTooLarge);
        }
        return Err(ParseError::Incomplete);
    };
    let header_bytes = &buf[..headers_end];
    let body_bytes = &buf[headers_end + 4..];

    let headers_str = std::str::from_utf8(header_bytes).map_err(|_| ParseError::InvalidRequest)?;

    let mut lines = headers_str.split("\r\n");

    // Request line
    let request_line = lines.next().ok_or(ParseError::InvalidRequest)?;
    let mut parts = request_line.split_whitespace();

    let method_str = parts.next().ok_or(ParseError::InvalidRequest)?;
    let path = parts.next().ok_or(ParseError::InvalidRequest)?;
    let version = parts.next().ok_or(ParseError::InvalidRequest)?;

    if !path.starts_with('/') || !version.starts_with("HTTP/") {
        return Err(ParseError::InvalidRequest);
    }

    let method = Method::from_str(method_str).ok_or(ParseError::InvalidMethod)?;

    // Headers
    let mut headers = HashMap::new();

    for line in lines {
        if line.is_empty() {
            continue;
        }

        let (key, value) = line.split_once(':').ok_or(ParseError::InvalidHeader)?;

        headers.insert(key.trim().to_string(), value.trim().to_string());
    }

    // Body
    let content_length = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("Content-Length"))
        .map(|(_, v)| v.parse::<usize>().map_err(|_| ParseError::InvalidContentLength))
        .transpose()?
        .unwrap_or(0);

    if content_length > MAX_BODY_BYTES {
        return Err(ParseError::BodyTooLarge);
    }

    if body_bytes.len() < content_length {
        return Err(ParseError::Incomplete);
    }

    let request = Request {
        method,
        path: path.to_string(),
        version: version.to_string(),
        headers,
    };

    let total_consumed = headers_end + 4 + content_length;
    Ok((request, total_consumed))
}

fn find_headers_end(buf: &[u8]) -> Option<usize> {
    buf.windows(4).position(|w| w == b"\r\n\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_get() {
        let req = b"GET /sample.txt HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let (parsed, consumed) = parse_http_request(req).unwrap();

        assert_eq!(parsed.path, "/sample.txt");
        assert_eq!(parsed.headers.get("Host").unwrap(), "example.com");
        assert_eq!(consumed, req.len());
    }

    #[test]
    fn leaves_next_request_in_buffer() {
        let req = b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n";

        let (first, consumed) = parse_http_request(req).unwrap();
        assert_eq!(first.path, "/a");

        let (second, _) = parse_http_request(&req[consumed..]).unwrap();
        assert_eq!(second.path, "/b");
    }

    #[test]
    fn oversized_head_is_rejected() {
        let mut req = b"GET /a HTTP/1.1\r\nX-Pad: ".to_vec();
        req.resize(MAX_HEAD_BYTES + 1, b'a');

        assert_eq!(parse_http_request(&req).unwrap_err(), ParseError::HeadersTooLarge);
    }

    #[test]
    fn oversized_body_is_rejected_before_it_arrives() {
        let req = format!(
            "GET /a HTTP/1.1\r\nContent-Length: {}\r\n\r\n",
            MAX_BODY_BYTES + 1
        );

        assert_eq!(
            parse_http_request(req.as_bytes()).unwrap_err(),
            ParseError::BodyTooLarge
        );
    }

    #[test]
    fn body_at_the_limit_is_skipped() {
        let mut req = format!("GET /a HTTP/1.1\r\nContent-Length: {MAX_BODY_BYTES}\r\n\r\n").into_bytes();
        let head_len = req.len();
        assert_eq!(parse_http_request(&req).unwrap_err(), ParseError::Incomplete);

        req.resize(head_len + MAX_BODY_BYTES, b'x');
        let (_, consumed) = parse_http_request(&req).unwrap();
        assert_eq!(consumed, req.len());
    }
}
