use std::future::Future;

use crate::http::request::Request;
use crate::http::response::{Response, StatusCode};

/// The single behavior selected for a request.
///
/// Selected once per request, executed once, never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Relay the request to the upstream and relay its response back.
    Forward { upstream: String },
    /// Read a file from the local store and return it.
    Serve { path: String },
    /// Decode the body as a multipart upload and persist it.
    Upload {
        field: &'static str,
        max_bytes: usize,
    },
    /// Emit a status-coded plaintext error.
    Reject { status: StatusCode },
}

/// What an executed action hands back to the connection.
#[derive(Debug)]
pub enum Reply {
    /// A response assembled by this server.
    Message(Response),
    /// Bytes relayed verbatim; the connection must not re-frame them.
    Raw(Vec<u8>),
}

impl Reply {
    pub fn reject(status: StatusCode) -> Self {
        Reply::Message(Response::reject(status))
    }
}

/// The seam between the connection state machine and a service.
///
/// `execute` must answer every `Action` variant; a service handed an
/// action it does not implement replies 501.
pub trait Handler {
    fn classify(&self, req: &Request) -> Action;

    fn execute(&self, action: Action, req: &Request) -> impl Future<Output = Reply> + Send;
}
