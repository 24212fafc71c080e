//! vodserver - static content server for large media files
//!
//! Serves files from a content root over a small HTTP/1.1 subset, handing
//! large files out one chunk per request via `206 Partial Content`.

pub mod config;
pub mod http;
pub mod server;
pub mod static_files;
