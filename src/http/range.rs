//! Byte-range handling.
//!
//! Only the single-range form `bytes=<start>-[<end>]` is understood. Large
//! files are delivered one chunk per request: the window always starts where
//! the client asked and never spans more than the configured chunk size, so a
//! client pulls the rest of the file by advancing its `Range` start.

/// A `Range: bytes=<start>-[<end>]` request, values taken as sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    /// Parsed but not used for sizing the served window.
    pub end: Option<u64>,
}

/// What part of a file a response carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// The whole file, served as 200.
    Full { size: u64 },
    /// `[start, end)` of a file of `total` bytes, served as 206.
    Partial { start: u64, end: u64, total: u64 },
    /// The requested start lies at or beyond the end of the file.
    Unsatisfiable { total: u64 },
}

impl Window {
    /// Exact number of body bytes for this window.
    pub fn content_length(&self) -> u64 {
        match *self {
            Window::Full { size } => size,
            Window::Partial { start, end, .. } => end - start,
            Window::Unsatisfiable { .. } => 0,
        }
    }

    /// `Content-Range` value. The end offset is exclusive.
    pub fn content_range(&self) -> Option<String> {
        match *self {
            Window::Full { .. } => None,
            Window::Partial { start, end, total } => Some(format!("bytes {start}-{end}/{total}")),
            Window::Unsatisfiable { total } => Some(format!("bytes */{total}")),
        }
    }
}

/// Parses a `Range` header value.
///
/// Returns `None` for anything other than `bytes=<digits>-[<digits>]`; the
/// caller then behaves as if no range had been sent.
///
/// ```
/// use vodserver::http::range::{parse_range_header, ByteRange};
///
/// assert_eq!(
///     parse_range_header("bytes=100-"),
///     Some(ByteRange { start: 100, end: None })
/// );
/// assert_eq!(parse_range_header("bytes=-500"), None);
/// ```
pub fn parse_range_header(value: &str) -> Option<ByteRange> {
    let spec = value.trim_start().strip_prefix("bytes=")?;

    let (start_str, rest) = split_digits(spec);
    let start = start_str.parse::<u64>().ok()?;

    let rest = rest.strip_prefix('-')?;
    let (end_str, _) = split_digits(rest);
    let end = if end_str.is_empty() {
        None
    } else {
        Some(end_str.parse::<u64>().ok()?)
    };

    Some(ByteRange { start, end })
}

fn split_digits(s: &str) -> (&str, &str) {
    let idx = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(idx)
}

/// Decides which bytes of a `size`-byte file to send.
///
/// Files up to `chunk_size` are always sent whole. Larger files are always
/// sent as one chunk starting at the requested offset (0 without a range).
pub fn plan_window(size: u64, range: Option<ByteRange>, chunk_size: u64) -> Window {
    if size <= chunk_size {
        return Window::Full { size };
    }

    let start = range.map_or(0, |r| r.start);
    if start >= size {
        return Window::Unsatisfiable { total: size };
    }

    Window::Partial {
        start,
        end: start.saturating_add(chunk_size).min(size),
        total: size,
    }
}
