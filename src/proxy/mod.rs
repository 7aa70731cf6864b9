//! Forwarding proxy functionality
//!
//! This module implements GET-only request forwarding to a single fixed
//! upstream, relaying the upstream's response verbatim.

pub mod upstream;

pub use upstream::ProxyHandler;
