//! The file service: serve stored files, accept multipart uploads.

use tracing::{debug, error, info, warn};

use crate::http::mime;
use crate::http::multipart;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode};
use crate::service::action::{Action, Handler, Reply};
use crate::store::{FileStore, StoreError};

/// Served when the request path is empty.
pub const INDEX_FILE: &str = "index.html";

/// Reserved name served with a fixed content-type, allow-list bypassed.
const FAVICON_FILE: &str = "favicon.ico";
const FAVICON_CONTENT_TYPE: &str = "image/x-icon";

/// Multipart form field uploads must arrive under.
pub const UPLOAD_FIELD: &str = "file";

/// Maximum accepted upload body.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub struct FileService {
    store: FileStore,
}

impl FileService {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }

    async fn serve(&self, path: &str) -> Response {
        if path == FAVICON_FILE {
            return match self.store.read_unchecked(FAVICON_FILE).await {
                Ok(data) => ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", FAVICON_CONTENT_TYPE)
                    .body(data)
                    .build(),
                Err(e) => {
                    warn!("Failed to read {FAVICON_FILE}: {e}");
                    Response::reject(StatusCode::NotFound)
                }
            };
        }

        match self.store.read(path).await {
            Ok(data) => {
                let content_type = mime::content_type(mime::extension(path).unwrap_or(""));
                ResponseBuilder::new(StatusCode::Ok)
                    .header("Content-Type", content_type)
                    .body(data)
                    .build()
            }
            Err(StoreError::UnsupportedType) => Response::reject(StatusCode::BadRequest),
            Err(e) => {
                debug!("Read failed for {path}: {e}");
                Response::reject(StatusCode::NotFound)
            }
        }
    }

    async fn accept_upload(&self, req: &Request, field: &str, max_bytes: usize) -> Response {
        let file = match multipart::extract_file(req, field, max_bytes) {
            Ok(file) => file,
            Err(e) => {
                warn!("Rejecting upload: {e}");
                return Response::reject(StatusCode::BadRequest);
            }
        };

        info!("Received file: {} ({} bytes)", file.filename, file.data.len());

        match self.store.write(&file.filename, &file.data).await {
            Ok(()) => Response::ok("File uploaded successfully"),
            Err(StoreError::UnsupportedType) => Response::reject(StatusCode::BadRequest),
            Err(e) => {
                error!("Failed to store {}: {e}", file.filename);
                Response::reject(StatusCode::InternalServerError)
            }
        }
    }
}

impl Handler for FileService {
    fn classify(&self, req: &Request) -> Action {
        match &req.method {
            Method::GET => {
                let path = req.path.trim_start_matches('/');
                // The query string plays no part in file lookup
                let path = match path.split_once('?') {
                    Some((path, _)) => path,
                    None => path,
                };

                if path.is_empty() {
                    Action::Serve {
                        path: INDEX_FILE.to_string(),
                    }
                } else {
                    Action::Serve {
                        path: path.to_string(),
                    }
                }
            }
            Method::POST => Action::Upload {
                field: UPLOAD_FIELD,
                max_bytes: MAX_UPLOAD_BYTES,
            },
            _ => Action::Reject {
                status: StatusCode::NotImplemented,
            },
        }
    }

    async fn execute(&self, action: Action, req: &Request) -> Reply {
        match action {
            Action::Serve { path } => Reply::Message(self.serve(&path).await),
            Action::Upload { field, max_bytes } => {
                Reply::Message(self.accept_upload(req, field, max_bytes).await)
            }
            Action::Reject { status } => Reply::reject(status),
            // This service does not forward
            Action::Forward { .. } => Reply::reject(StatusCode::NotImplemented),
        }
    }
}
