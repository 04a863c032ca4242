//! `serve` command: answer HTTP requests from the built site.
//!
//! ```text
//! request → method check → decode_url → clean_path → Router::handle → response
//! ```
//!
//! `/healthcheck` is answered before routing. Only `GET` and `HEAD` are
//! accepted.

mod lifecycle;
mod response;

use crate::{
    config::cfg,
    core::is_shutdown,
    debug, log,
    router::{HandlerError, Reply, Router},
    utils::{
        mime,
        path::route::{clean_path, decode_url},
    },
};
use anyhow::{Context, Result};
use std::{sync::Arc, time::Instant};
use tiny_http::{Method, Request, Server};

/// Path answered with `200 .` without touching the site.
pub const HEALTHCHECK_PATH: &str = "/healthcheck";

/// Worker threads handling requests.
const WORKER_THREADS: usize = 4;

/// Serve the built site until Ctrl+C.
pub fn serve_manuals() -> Result<()> {
    let config = cfg();
    let fallback = config.fallback_language()?;
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    log!("serve"; "http://{} (fallback language {})", addr, fallback);

    let router = Arc::new(Router::new(&config.build.output, fallback));

    run_request_loop(&server, router)
}

fn run_request_loop(server: &Server, router: Arc<Router>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKER_THREADS)
        .thread_name(|i| format!("serve-{i}"))
        .build()
        .context("Failed to create request thread pool")?;

    for request in server.incoming_requests() {
        if is_shutdown() {
            break;
        }
        let router = Arc::clone(&router);
        pool.spawn(move || handle_request(request, &router));
    }
    Ok(())
}

/// Route one request and write the response, logging the outcome.
fn handle_request(request: Request, router: &Router) {
    let started = Instant::now();
    let method = request.method().clone();
    let url = request.url().to_string();
    let accept = header_value(&request, "Accept-Language").unwrap_or_default();

    let sent = match dispatch(&method, &url, &accept, router) {
        Ok(reply) => {
            if let Reply::Redirect(target) = &reply {
                debug!("serve"; "{} redirects to {}", url, target);
            }
            response::respond(request, reply)
        }
        Err(error) => {
            if error.status >= 500 {
                log!("error"; "{} {}: {}", method, url, error_chain(&error));
            } else if let Some(source) = &error.source {
                debug!("serve"; "{} {}: {}", method, url, source);
            }
            response::respond_error(request, &error)
        }
    };

    match sent {
        Ok(status) => log!(
            "serve";
            "{} {} → {} ({:.1}ms)",
            method,
            url,
            status,
            started.elapsed().as_secs_f64() * 1000.0
        ),
        Err(e) => log!("serve"; "{} {}: failed to respond: {:#}", method, url, e),
    }
}

/// Decide the reply for a request without doing any I/O on the socket.
fn dispatch(
    method: &Method,
    url: &str,
    accept: &str,
    router: &Router,
) -> Result<Reply, HandlerError> {
    if !matches!(method, Method::Get | Method::Head) {
        return Err(HandlerError::new(405));
    }

    let path = decode_url(url);
    if path == HEALTHCHECK_PATH {
        return Ok(Reply::Bytes {
            body: b".".to_vec(),
            content_type: mime::types::PLAIN,
        });
    }

    router.handle(&clean_path(&path), accept)
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.to_string())
}

/// Flatten a handler error and its sources into one log line.
fn error_chain(error: &HandlerError) -> String {
    let mut message = error.to_string();
    let mut current = std::error::Error::source(error);
    while let Some(source) = current {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source.source();
    }
    message
}
