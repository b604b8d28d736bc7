//! HTTP responses.

use std::path::{Component, Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use tiny_http::{Header, Method, Request, Response, StatusCode};

use crate::compose::RenderedPage;
use crate::search::{SearchProvider, SearchResult};
use crate::utils::mime::{self, types};

/// Search hits returned per query.
const SEARCH_LIMIT: usize = 10;

/// A response before it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl Reply {
    pub fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    pub fn page(page: RenderedPage) -> Self {
        Self::new(page.status(), types::HTML, page.into_html())
    }

    pub fn unavailable() -> Self {
        Self::new(503, types::PLAIN, "503 Service Unavailable")
    }

    pub fn not_found() -> Self {
        Self::new(404, types::PLAIN, "404 Not Found")
    }
}

#[derive(Serialize)]
struct SearchResponse<'a> {
    query: &'a str,
    results: Vec<SearchResult>,
}

/// JSON search results for `query`.
pub fn search(provider: &dyn SearchProvider, query: &str) -> Reply {
    let results = provider.search(query, SEARCH_LIMIT);
    match serde_json::to_vec(&SearchResponse { query, results }) {
        Ok(body) => Reply::new(200, types::JSON, body),
        Err(_) => Reply::new(500, types::PLAIN, "500 Internal Server Error"),
    }
}

/// File under `root` a request path names, if it exists.
///
/// Paths that climb out of `root` never match.
pub fn static_file(root: &Path, path: &str) -> Option<PathBuf> {
    let relative = Path::new(path.trim_start_matches('/'));
    if relative.as_os_str().is_empty()
        || relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    let file = root.join(relative);
    file.is_file().then_some(file)
}

/// Reply with the contents of `path`.
pub fn file(path: &Path) -> Result<Reply> {
    let body = std::fs::read(path)?;
    Ok(Reply::new(200, mime::from_path(path), body))
}

pub fn send(request: Request, reply: Reply) -> Result<()> {
    let header = make_header("Content-Type", reply.content_type);

    if is_head_request(&request) {
        let response = Response::empty(StatusCode(reply.status)).with_header(header);
        request.respond(response)?;
        return Ok(());
    }

    let response = Response::from_data(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header);
    request.respond(response)?;
    Ok(())
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn make_header(key: &'static str, value: &'static str) -> Header {
    // Both sides are static ASCII.
    Header::from_bytes(key, value).unwrap_or_else(|()| unreachable!("invalid header {key}"))
}
