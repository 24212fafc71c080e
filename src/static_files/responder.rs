//! Builds responses for resolved files and for the fixed error pages.

use std::time::SystemTime;

use crate::http::mime::content_type_for;
use crate::http::range::{plan_window, Window};
use crate::http::request::Request;
use crate::http::response::{http_date, Body, Response, ResponseBuilder, StatusCode};
use crate::static_files::resolver::FileResource;

pub const FORBIDDEN_PAGE: &str = "<html>\n<head><title>403 Forbidden</title></head>\n<body>\n<h1>403 Forbidden</h1>\n<p>You don't have permission to access the requested URL on this server.</p>\n</body>\n</html>\n";

pub const NOT_FOUND_PAGE: &str = "<html>\n<head><title>404 Not Found</title></head>\n<body>\n<h1>404 Not Found</h1>\n<p>The requested URL was not found on this server.</p>\n</body>\n</html>\n";

#[derive(Debug, Clone, Copy)]
pub struct Responder {
    chunk_size: u64,
}

impl Responder {
    pub fn new(chunk_size: u64) -> Self {
        Self { chunk_size }
    }

    /// Response for a file that resolved successfully.
    ///
    /// Files above the chunk size always get a 206 carrying at most one chunk,
    /// whether or not the client sent a `Range` header.
    pub fn file_response(&self, file: &FileResource, req: &Request, now: SystemTime) -> Response {
        let content_type = content_type_for(&file.extension);
        let window = plan_window(file.size, req.range(), self.chunk_size);

        match window {
            Window::Full { size } => ResponseBuilder::new(StatusCode::Ok)
                .header("Content-Length", size.to_string())
                .header("Content-Type", content_type)
                .header("Date", http_date(now))
                .header("Last-Modified", http_date(file.modified))
                .body(Body::File {
                    path: file.path.clone(),
                    start: 0,
                    end: size,
                })
                .build(),

            Window::Partial { start, end, .. } => {
                let connection = if req.keep_alive() { "keep-alive" } else { "close" };
                ResponseBuilder::new(StatusCode::PartialContent)
                    .header("Connection", connection)
                    .header("Accept-Ranges", "bytes")
                    .header("Content-Length", window.content_length().to_string())
                    .header("Content-Type", content_type)
                    .header("Content-Range", window.content_range().unwrap_or_default())
                    .header("Date", http_date(now))
                    .header("Last-Modified", http_date(file.modified))
                    .body(Body::File {
                        path: file.path.clone(),
                        start,
                        end,
                    })
                    .build()
            }

            Window::Unsatisfiable { .. } => ResponseBuilder::new(StatusCode::RangeNotSatisfiable)
                .header("Connection", "close")
                .header("Accept-Ranges", "bytes")
                .header("Content-Range", window.content_range().unwrap_or_default())
                .header("Date", http_date(now))
                .build(),
        }
    }
}

pub fn forbidden(now: SystemTime) -> Response {
    fixed_page(StatusCode::Forbidden, "Keep-Alive", FORBIDDEN_PAGE, now)
}

pub fn not_found(now: SystemTime) -> Response {
    fixed_page(StatusCode::NotFound, "Keep-Alive", NOT_FOUND_PAGE, now)
}

pub fn bad_request(now: SystemTime) -> Response {
    status_page(StatusCode::BadRequest, now)
}

pub fn method_not_allowed(now: SystemTime) -> Response {
    let mut resp = status_page(StatusCode::MethodNotAllowed, now);
    resp.headers.push(("Allow".to_string(), "GET".to_string()));
    resp
}

pub fn internal_error(now: SystemTime) -> Response {
    status_page(StatusCode::InternalServerError, now)
}

fn status_page(status: StatusCode, now: SystemTime) -> Response {
    let title = format!("{} {}", status.as_u16(), status.reason_phrase());
    let page = format!(
        "<html>\n<head><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n</body>\n</html>\n"
    );
    fixed_page(status, "close", &page, now)
}

// 403/404 announce Keep-Alive even though the connection is closed afterwards.
fn fixed_page(status: StatusCode, connection: &str, page: &str, now: SystemTime) -> Response {
    ResponseBuilder::new(status)
        .header("Connection", connection)
        .header("Content-Length", page.len().to_string())
        .header("Content-Type", "text/html")
        .header("Date", http_date(now))
        .body(Body::Static(page.as_bytes().to_vec()))
        .build()
}
