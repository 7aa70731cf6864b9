//! HTTP protocol implementation.
//!
//! This module implements the HTTP/1.1 layer both services share: one
//! request per connection, one response, then close.
//!
//! # Architecture
//!
//! - **`connection`**: The main connection handler implementing the request-response state machine
//! - **`parser`**: Parses incoming HTTP requests from byte buffers
//! - **`headers`**: Ordered, case-insensitive header multimap
//! - **`request`**: HTTP request representation and parsing utilities
//! - **`response`**: HTTP response representation with builder pattern
//! - **`writer`**: Serializes and writes HTTP responses to the client
//! - **`multipart`**: `multipart/form-data` decoding for uploads
//! - **`mime`**: MIME type detection based on file extensions
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Wait for incoming request data
//!        └──────┬──────┘
//!               │ Request received (or malformed → 400)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Classify, run one action
//!        └──────┬───────────┘
//!               │ Response ready
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response to client
//!        └──────┬───────────┘
//!               │ Response sent
//!               └─ Close (always; no keep-alive)
//! ```

pub mod connection;
pub mod headers;
pub mod mime;
pub mod multipart;
pub mod parser;
pub mod request;
pub mod response;
pub mod writer;
