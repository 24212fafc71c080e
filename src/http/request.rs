use std::collections::HashMap;

use crate::http::range::{parse_range_header, ByteRange};

/// HTTP request methods.
///
/// Only GET is served. The others are recognized so the connection can answer
/// them with 405 Method Not Allowed instead of treating them as garbage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Retrieve a resource
    GET,
    /// POST - Create or submit data
    POST,
    /// PUT - Replace a resource
    PUT,
    /// DELETE - Delete a resource
    DELETE,
    /// HEAD - Like GET but without the response body
    HEAD,
    /// OPTIONS - Describe communication options
    OPTIONS,
    /// PATCH - Partial modification of a resource
    PATCH,
}

/// A parsed HTTP request.
///
/// Built fresh for every request read off the socket and dropped once the
/// matching response has been written.
#[derive(Debug, Clone)]
pub struct Request {
    /// The HTTP method (GET, POST, etc.)
    pub method: Method,
    /// The raw request target, exactly as received (e.g., "/movies/a.mp4")
    pub path: String,
    /// HTTP version (typically "HTTP/1.1")
    pub version: String,
    /// Request headers, keys in the case they were received
    pub headers: HashMap<String, String>,
}

/// Builder for constructing Request objects, always as HTTP/1.1.
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    headers: HashMap<String, String>,
}

impl Method {
    /// Parses an HTTP method from a string.
    ///
    /// Matching is case-sensitive, as on the wire.
    ///
    /// # Example
    ///
    /// ```
    /// # use vodserver::http::request::Method;
    /// assert_eq!(Method::from_str("GET"), Some(Method::GET));
    /// assert_eq!(Method::from_str("get"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "GET" => Some(Method::GET),
            "POST" => Some(Method::POST),
            "PUT" => Some(Method::PUT),
            "DELETE" => Some(Method::DELETE),
            "HEAD" => Some(Method::HEAD),
            "OPTIONS" => Some(Method::OPTIONS),
            "PATCH" => Some(Method::PATCH),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self {
            method: None,
            path: None,
            headers: HashMap::new(),
        }
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> Result<Request, &'static str> {
        Ok(Request {
            method: self.method.ok_or("method missing")?,
            path: self.path.ok_or("path missing")?,
            version: "HTTP/1.1".to_string(),
            headers: self.headers,
        })
    }
}

impl Request {
    /// Retrieves a header value by name, ignoring ASCII case.
    ///
    /// An exact match wins over a case-insensitive one.
    pub fn header(&self, key: &str) -> Option<&str> {
        if let Some(v) = self.headers.get(key) {
            return Some(v.as_str());
        }
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the client asked for the connection to stay open.
    ///
    /// Only an explicit `Connection: keep-alive` (first token, any case) counts.
    /// A missing header means close, regardless of the HTTP version.
    pub fn keep_alive(&self) -> bool {
        self.header("Connection")
            .and_then(|v| v.split_whitespace().next())
            .map(|token| token.eq_ignore_ascii_case("keep-alive"))
            .unwrap_or(false)
    }

    /// The byte range requested through the `Range` header, if it is usable.
    pub fn range(&self) -> Option<ByteRange> {
        self.header("Range").and_then(parse_range_header)
    }

    /// The request target relative to the content root.
    ///
    /// Strips a single leading `/`. No percent-decoding and no `..` handling.
    pub fn target(&self) -> &str {
        self.path.strip_prefix('/').unwrap_or(&self.path)
    }
}
