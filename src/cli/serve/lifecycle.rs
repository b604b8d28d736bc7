//! Server lifecycle management.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use anyhow::{Result, anyhow};
use tiny_http::Server;

use crate::cli::common::Session;
use crate::core::set_serving;
use crate::utils::plural::plural_count;
use crate::log;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Prepare capabilities in the background, then flip to serving.
///
/// Requests that arrive earlier get the loading page.
pub fn spawn_warm_up(session: Arc<Session>) -> JoinHandle<()> {
    thread::spawn(move || {
        let report = session.warm_up();
        for (kind, error) in &report.failed {
            log!("serve"; "{} renderer unavailable: {}", kind, error);
        }
        log!("serve"; "{} loaded", plural_count(report.loaded.len(), "renderer"));
        set_serving();
    })
}
