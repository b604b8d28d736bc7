//! Page server.
//!
//! Renders pages on request straight from the record maps, so a record
//! written while the server runs is served on the next request.
//!
//! | Path                  | Response                                     |
//! |-----------------------|----------------------------------------------|
//! | `/api/search?q=`      | JSON search hits (when `site.search` is on)  |
//! | existing output file  | the file                                     |
//! | anything else         | rendered page, loading page or not-found     |

mod lifecycle;
mod response;

use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Request, Server};

use crate::cli::common::Session;
use crate::compose::SEARCH_ENDPOINT;
use crate::config::SiteConfig;
use crate::core::{PageRequest, is_serving, is_shutdown, register_server};
use crate::embed::LoadingPage;
use crate::{debug, log};

use response::Reply;

/// Bind, warm up the renderers and serve until Ctrl+C.
pub fn serve_site(config: Arc<SiteConfig>) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));
    log!("serve"; "http://{}", addr);

    let session = Arc::new(Session::new(Arc::clone(&config))?);
    let warm_up = lifecycle::spawn_warm_up(Arc::clone(&session));

    run_request_loop(&server, &session, config.serve.worker_count())?;

    if warm_up.is_finished() {
        let _ = warm_up.join();
    }
    Ok(())
}

fn run_request_loop(server: &Server, session: &Arc<Session>, workers: usize) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let session = Arc::clone(session);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &session) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

fn handle_request(request: Request, session: &Session) -> Result<()> {
    let reply = route(request.url(), session);
    debug!("serve"; "{} {} {}", request.method(), request.url(), reply.status);
    response::send(request, reply)
}

/// Reply for a request target.
fn route(url: &str, session: &Session) -> Reply {
    if is_shutdown() {
        return Reply::unavailable();
    }

    let request = PageRequest::parse(url);
    let config = session.config();

    if request.path == SEARCH_ENDPOINT {
        return match session.search() {
            Some(provider) => response::search(provider, request.param("q").unwrap_or_default()),
            None => Reply::not_found(),
        };
    }

    if let Some(path) = response::static_file(&config.build.output, &request.path) {
        return response::file(&path).unwrap_or_else(|e| {
            log!("serve"; "failed to read {}: {}", path.display(), e);
            Reply::not_found()
        });
    }

    if !is_serving() {
        let html = LoadingPage {
            title: &config.site.info.name,
            lang: &config.site.info.language,
        }
        .render();
        return Reply::new(503, crate::utils::mime::types::HTML, html);
    }

    let page_id = session.resolve(&request);
    Reply::page(session.render(page_id, request.is_lite()))
}
