use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::http::parser::{ParseError, parse_http_request};
use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};
use crate::http::writer::ResponseWriter;
use crate::service::action::{Handler, Reply};

/// Upper bound on buffered request bytes: the upload cap plus headroom for
/// the request line and headers. A request that outgrows this without
/// parsing completely is treated as malformed.
const MAX_REQUEST_BYTES: usize = 10 * 1024 * 1024 + 64 * 1024;

pub struct Connection<H> {
    stream: TcpStream,
    buffer: Vec<u8>,
    state: ConnectionState,
    handler: Arc<H>,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter),
    Closed,
}

enum ReadOutcome {
    Complete(Request),
    Malformed,
    Disconnected,
}

impl<H: Handler> Connection<H> {
    pub fn new(stream: TcpStream, handler: Arc<H>) -> Self {
        Self {
            stream,
            buffer: Vec::with_capacity(4096),
            state: ConnectionState::Reading,
            handler,
        }
    }

    /// Drives one request through parse, dispatch and response write.
    ///
    /// The connection always closes afterwards; there is no keep-alive.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    match self.read_request().await? {
                        ReadOutcome::Complete(req) => {
                            self.state = ConnectionState::Processing(req);
                        }
                        ReadOutcome::Malformed => {
                            // Protocol error: answer 400 without dispatching
                            let response = Response::reject(StatusCode::BadRequest);
                            self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                        }
                        ReadOutcome::Disconnected => {
                            self.state = ConnectionState::Closed;
                        }
                    }
                }

                ConnectionState::Processing(req) => {
                    let action = self.handler.classify(req);
                    let reply = self.handler.execute(action, req).await;

                    let writer = match reply {
                        Reply::Message(response) => ResponseWriter::new(&response),
                        Reply::Raw(bytes) => ResponseWriter::raw(bytes),
                    };
                    self.state = ConnectionState::Writing(writer);
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // One request per connection, always
                    self.state = ConnectionState::Closed;
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
                    self.buffer.drain(..consumed);
                    return Ok(ReadOutcome::Complete(request));
                }

                Err(ParseError::Incomplete) => {
                    if self.buffer.len() > MAX_REQUEST_BYTES {
                        tracing::warn!("Request exceeds {MAX_REQUEST_BYTES} bytes, rejecting");
                        return Ok(ReadOutcome::Malformed);
                    }
                    // Need more data → fall through to read
                }

                Err(e) => {
                    tracing::debug!("HTTP parse error: {e}");
                    return Ok(ReadOutcome::Malformed);
                }
            }

            let mut chunk = [0u8; 4096];
            let n = self.stream.read(&mut chunk).await?;

            if n == 0 {
                if self.buffer.is_empty() {
                    return Ok(ReadOutcome::Disconnected);
                }
                // Client hung up mid-request
                return Ok(ReadOutcome::Malformed);
            }

            self.buffer.extend_from_slice(&chunk[..n]);
        }
    }
}
