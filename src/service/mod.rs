//! Request classification and the per-service actions.
//!
//! A `Handler` turns each parsed request into exactly one `Action`, then
//! executes it into the reply the connection writes back.

pub mod action;
pub mod files;

pub use action::{Action, Handler, Reply};
pub use files::FileService;
