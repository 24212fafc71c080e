//! HTTP protocol implementation.
//!
//! A deliberately small HTTP/1.1 subset: GET requests, one `Range` sub-range
//! and `Connection: keep-alive`.
//!
//! # Architecture
//!
//! - **`connection`**: The per-client request/response state machine
//! - **`parser`**: Parses incoming HTTP requests from byte buffers
//! - **`request`**: HTTP request representation and header accessors
//! - **`range`**: `Range` header parsing and chunk window planning
//! - **`mime`**: Content-Type detection from file extensions
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes responses and streams file bodies to the client
//!
//! # Connection State Machine
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received (peer EOF → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Resolve file, pick window, build response
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send head, then body in bounded bursts
//!        └──────┬───────────┘
//!               │ Response sent
//!               ├─ 200/206 + keep-alive → Reading (same connection)
//!               └─ otherwise → Closed
//! ```
//!
//! # Example
//!
//! ```ignore
//! use vodserver::config::ServeConfig;
//! use vodserver::http::connection::Connection;
//! use std::sync::Arc;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let config = Arc::new(ServeConfig::for_root("content"));
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let config = config.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, config);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod connection;
pub mod mime;
pub mod parser;
pub mod range;
pub mod request;
pub mod response;
pub mod writer;
