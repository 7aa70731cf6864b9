//! Upstream connection and request forwarding
//!
//! This module handles connecting to the upstream server and forwarding
//! HTTP requests/responses: one dial per request, no retry, no caching.

use anyhow::{Context, Result, bail};
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::http::request::{Method, Request};
use crate::http::response::StatusCode;
use crate::service::action::{Action, Handler, Reply};

/// Default buffer size for reading the upstream response
const BUFFER_SIZE: usize = 8192;

/// Upper bound on upstream response headers
const MAX_HEADER_BYTES: usize = 64 * 1024;

/// Handles proxying requests to the upstream server
pub struct ProxyHandler {
    /// Upstream address, normalized to "host:port"
    upstream_addr: String,
}

impl ProxyHandler {
    /// Create a new proxy handler for a fixed upstream.
    ///
    /// Accepts a bare "host:port" pair or an http(s) URL.
    pub fn new(upstream: &str) -> Result<Self> {
        let upstream_addr = upstream_authority(upstream)?;
        Ok(Self { upstream_addr })
    }

    pub fn upstream_addr(&self) -> &str {
        &self.upstream_addr
    }

    /// Forward a GET request to the upstream and relay the raw response.
    ///
    /// Every upstream failure (dial, write, response parse) becomes a
    /// 502 reply; a single attempt is made per client request.
    async fn forward(&self, upstream: &str, req: &Request) -> Reply {
        let mut stream = match TcpStream::connect(upstream).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Failed to connect to upstream {upstream}: {e}");
                return Reply::reject(StatusCode::BadGateway);
            }
        };

        debug!(
            upstream,
            method = %req.method,
            path = %req.path,
            "Forwarding request to upstream"
        );

        let request_bytes = serialize_request(req);
        if let Err(e) = stream.write_all(&request_bytes).await {
            warn!("Failed to forward request to {upstream}: {e}");
            return Reply::reject(StatusCode::BadGateway);
        }

        match read_raw_response(&mut stream).await {
            Ok((status, raw)) => {
                info!(
                    upstream,
                    status,
                    path = %req.path,
                    "Relaying upstream response"
                );
                Reply::Raw(raw)
            }
            Err(e) => {
                warn!("Failed to read response from {upstream}: {e}");
                Reply::reject(StatusCode::BadGateway)
            }
        }
    }
}

impl Handler for ProxyHandler {
    fn classify(&self, req: &Request) -> Action {
        match &req.method {
            Method::GET => Action::Forward {
                upstream: self.upstream_addr.clone(),
            },
            _ => Action::Reject {
                status: StatusCode::NotImplemented,
            },
        }
    }

    async fn execute(&self, action: Action, req: &Request) -> Reply {
        match action {
            Action::Forward { upstream } => self.forward(&upstream, req).await,
            Action::Reject { status } => Reply::reject(status),
            // This service neither serves nor stores files
            Action::Serve { .. } | Action::Upload { .. } => {
                Reply::reject(StatusCode::NotImplemented)
            }
        }
    }
}

/// Serializes a parsed request back to wire form, unchanged: method, path,
/// version, headers in original order, body.
pub fn serialize_request(req: &Request) -> Vec<u8> {
    let mut buffer = Vec::new();

    let path = if req.path.is_empty() { "/" } else { &req.path };
    buffer.extend_from_slice(format!("{} {} {}\r\n", req.method.as_str(), path, req.version).as_bytes());

    for (key, value) in req.headers.iter() {
        buffer.extend_from_slice(format!("{key}: {value}\r\n").as_bytes());
    }

    // End of headers
    buffer.extend_from_slice(b"\r\n");

    if !req.body.is_empty() {
        buffer.extend_from_slice(&req.body);
    }

    buffer
}

/// Normalizes an upstream address to "host:port".
pub fn upstream_authority(addr: &str) -> Result<String> {
    if addr.is_empty() {
        bail!("upstream address is empty");
    }
    if !addr.contains("://") {
        return Ok(addr.to_string());
    }

    let url = url::Url::parse(addr).context("invalid upstream URL")?;
    let host = url.host_str().context("upstream URL missing host")?;
    let port = url.port().unwrap_or(match url.scheme() {
        "https" => 443,
        _ => 80,
    });
    Ok(format!("{host}:{port}"))
}

/// Reads one HTTP response off the upstream socket as raw bytes.
///
/// Headers are read up to the blank line, then the body by Content-Length;
/// without one, everything until the upstream closes is the body.
async fn read_raw_response(stream: &mut TcpStream) -> Result<(u16, Vec<u8>)> {
    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);

    // Read response headers
    let headers_end = loop {
        if let Some(pos) = buffer.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }

        // Prevent unbounded header growth
        if buffer.len() > MAX_HEADER_BYTES {
            bail!("response headers too large");
        }

        let n = stream.read_buf(&mut buffer).await?;
        if n == 0 {
            bail!("connection closed before complete response received");
        }
    };

    let (status, content_length) = parse_response_head(&buffer[..headers_end])?;

    match content_length {
        Some(length) => {
            let total = headers_end + length;
            while buffer.len() < total {
                let n = stream.read_buf(&mut buffer).await?;
                if n == 0 {
                    bail!("connection closed before complete body received");
                }
            }
            buffer.truncate(total);
        }
        None => {
            // No Content-Length: the body runs until the upstream closes
            loop {
                let n = stream.read_buf(&mut buffer).await?;
                if n == 0 {
                    break;
                }
            }
        }
    }

    Ok((status, buffer.to_vec()))
}

/// Validates the status line and finds the Content-Length, if any.
fn parse_response_head(head: &[u8]) -> Result<(u16, Option<usize>)> {
    let text = std::str::from_utf8(head).context("invalid UTF-8 in response headers")?;
    let mut lines = text.lines();

    let status_line = lines.next().context("empty response")?;
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().context("empty status line")?;
    if !version.starts_with("HTTP/") {
        bail!("invalid status line: {status_line}");
    }
    let status: u16 = parts
        .next()
        .context("missing status code")?
        .parse()
        .context("invalid status code")?;

    let mut content_length = None;
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = Some(value.trim().parse().context("invalid Content-Length")?);
            }
        }
    }

    Ok((status, content_length))
}
