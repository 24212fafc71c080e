use std::sync::Arc;
use std::time::SystemTime;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::time::timeout;

use crate::config::ServeConfig;
use crate::http::parser::{parse_http_request, ParseError};
use crate::http::request::{Method, Request};
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::static_files::responder::{self, Responder};
use crate::static_files::{PathResolver, ResolveError};

const READ_CHUNK: usize = 4096;

/// One client connection and its request/response loop.
///
/// Requests are answered strictly one at a time: the next request is not
/// parsed until the previous response has been fully written.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    state: ConnectionState,
    config: Arc<ServeConfig>,
    resolver: PathResolver,
    responder: Responder,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(Response, bool), // bool = keep_alive?
    Closed,
}

enum ReadOutcome {
    Request(Request),
    Malformed(ParseError),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, config: Arc<ServeConfig>) -> Self {
        let resolver = PathResolver::new(
            config.root.clone(),
            config.forbidden_segment.clone(),
            config.contain_paths,
        );
        let responder = Responder::new(config.chunk_size);

        Self {
            stream,
            buffer: BytesMut::with_capacity(READ_CHUNK),
            state: ConnectionState::Reading,
            config,
            resolver,
            responder,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        ReadOutcome::Request(req) => ConnectionState::Processing(req),
                        ReadOutcome::Malformed(e) => {
                            tracing::debug!(error = %e, "Malformed request");
                            ConnectionState::Writing(responder::bad_request(SystemTime::now()), false)
                        }
                        ReadOutcome::Closed => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let (response, keep_alive) = self.handle_request(&req).await;

                    tracing::info!(
                        method = req.method.as_str(),
                        path = %req.path,
                        version = %req.version,
                        status = response.status.as_u16(),
                        bytes = response.body.len(),
                        keep_alive,
                        "Request handled"
                    );

                    self.state = ConnectionState::Writing(response, keep_alive);
                }

                ConnectionState::Writing(response, keep_alive) => {
                    let mut writer = ResponseWriter::new(&response, self.config.read_buffer_size);
                    let written = writer.write_to_stream(&mut self.stream).await;

                    tracing::debug!(
                        status = response.status.as_u16(),
                        bytes = writer.body_written(),
                        complete = written.is_ok(),
                        "Response written"
                    );
                    written?;

                    if keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            // Try parsing whatever we already have
            match parse_http_request(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(ReadOutcome::Request(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => return Ok(ReadOutcome::Malformed(e)),
            }

            self.buffer.reserve(READ_CHUNK);
            let read = self.stream.read_buf(&mut self.buffer);
            let n = match self.config.request_timeout {
                Some(limit) => match timeout(limit, read).await {
                    Ok(res) => res?,
                    Err(_) => {
                        tracing::debug!(timeout = ?limit, "Idle connection timed out");
                        return Ok(ReadOutcome::Closed);
                    }
                },
                None => read.await?,
            };

            if n == 0 {
                if !self.buffer.is_empty() {
                    tracing::debug!(pending = self.buffer.len(), "Peer closed mid-request");
                }
                return Ok(ReadOutcome::Closed);
            }
        }
    }

    /// Produces the response for `req` and whether to keep the connection.
    async fn handle_request(&self, req: &Request) -> (Response, bool) {
        let now = SystemTime::now();

        if req.method != Method::GET {
            return (responder::method_not_allowed(now), false);
        }

        // 403 and 404 always end the connection, keep-alive or not.
        let file = match self.resolver.resolve(req.target()).await {
            Ok(file) => file,
            Err(ResolveError::NotFound) => return (responder::not_found(now), false),
            Err(ResolveError::Forbidden) => return (responder::forbidden(now), false),
            Err(ResolveError::Io(e)) => {
                tracing::warn!(path = %req.path, error = %e, "Failed to stat file");
                return (responder::internal_error(now), false);
            }
        };

        let response = self.responder.file_response(&file, req, now);
        let keep_alive = response.status.is_success() && req.keep_alive();
        (response, keep_alive)
    }
}
