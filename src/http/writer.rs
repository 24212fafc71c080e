use std::io::SeekFrom;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{Body, Response};

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes the status line and headers, including the blank line.
pub fn serialize_head(resp: &Response) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256);

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    for (k, v) in &resp.headers {
        buf.extend_from_slice(k.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(v.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response, streaming file bodies in bounded bursts.
pub struct ResponseWriter<'a> {
    response: &'a Response,
    buffer_size: usize,
    written: u64,
}

impl<'a> ResponseWriter<'a> {
    pub fn new(response: &'a Response, buffer_size: usize) -> Self {
        Self {
            response,
            buffer_size: buffer_size.max(1),
            written: 0,
        }
    }

    /// Body bytes written so far.
    pub fn body_written(&self) -> u64 {
        self.written
    }

    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let response = self.response;
        stream.write_all(&serialize_head(response)).await?;

        match &response.body {
            Body::Static(bytes) => {
                stream.write_all(bytes).await?;
                self.written = bytes.len() as u64;
            }
            Body::File { path, start, end } => {
                let mut file = File::open(path).await?;
                file.seek(SeekFrom::Start(*start)).await?;
                self.copy_file(&mut file, end.saturating_sub(*start), stream)
                    .await?;
            }
        }

        stream.flush().await?;
        Ok(())
    }

    async fn copy_file<W>(&mut self, file: &mut File, len: u64, stream: &mut W) -> anyhow::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let mut chunk = vec![0u8; self.buffer_size.min(len as usize).max(1)];

        while self.written < len {
            let want = chunk.len().min((len - self.written) as usize);
            let n = file.read(&mut chunk[..want]).await?;

            // Content-Length was already sent; a short file cannot be papered over.
            if n == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    format!("file ended after {} of {} bytes", self.written, len),
                )
                .into());
            }

            stream.write_all(&chunk[..n]).await?;
            self.written += n as u64;
        }

        Ok(())
    }
}
