//! HTTP response writers.

use crate::router::{HandlerError, Reply};
use crate::utils::mime;
use anyhow::{Result, anyhow};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use std::{fs, path::Path};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Bytes escaped in a `Location` header; `/` stays as the path separator.
const LOCATION: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Send a router reply. Returns the status code sent.
pub fn respond(request: Request, reply: Reply) -> Result<u16> {
    match reply {
        Reply::Redirect(target) => respond_redirect(request, &target),
        Reply::File(path) => respond_file(request, &path),
        Reply::Bytes { body, content_type } => send_body(request, 200, content_type, body),
    }
}

/// Send the reason phrase of a failed request as its body.
pub fn respond_error(request: Request, error: &HandlerError) -> Result<u16> {
    let body = crate::router::status_text(error.status).into_bytes();
    send_body(request, error.status, mime::types::PLAIN, body)
}

fn respond_redirect(request: Request, target: &str) -> Result<u16> {
    let location = utf8_percent_encode(target, LOCATION).to_string();
    let response = Response::empty(StatusCode(302))
        .with_header(make_header("Location", &location)?);
    request.respond(response)?;
    Ok(302)
}

fn respond_file(request: Request, path: &Path) -> Result<u16> {
    let content_type = mime::from_path(path);

    if is_head_request(&request) {
        return send_head(request, 200, content_type);
    }

    let file = fs::File::open(path)?;
    let response =
        Response::from_file(file).with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(200)
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(request: Request, status: u16, content_type: &str) -> Result<u16> {
    let response =
        Response::empty(StatusCode(status)).with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(status)
}

fn send_body(request: Request, status: u16, content_type: &str, body: Vec<u8>) -> Result<u16> {
    if is_head_request(&request) {
        return send_head(request, status, content_type);
    }

    let response = Response::from_data(body)
        .with_status_code(StatusCode(status))
        .with_header(make_header("Content-Type", content_type)?);
    request.respond(response)?;
    Ok(status)
}

fn make_header(key: &str, value: &str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}
