//! # grid-client
//!
//! Turns an assembled [`ClientConfig`](config::ClientConfig) into the
//! process-wide data-grid client.
//!
//! This library provides:
//! - **Client factory** resolving members through the configured discovery
//!   provider (or the static member list) and retrying up to the configured
//!   connection-attempt limit.
//! - **Client handle** shared by the rest of the application.
//! - **Client registry**, a single-assignment owner guaranteeing at most one
//!   client per registry even with concurrent initializers.
//!
//! The factory itself holds no global state; exclusivity is the registry's
//! job, and the registry lives wherever the application composes its parts.
#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]
#![allow(clippy::cognitive_complexity)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod client;
pub mod error;
pub mod registry;

#[cfg(test)]
mod test_util;

pub use client::{ClientFactory, GridClient};
pub use error::{ClientError, ClientResult};
pub use registry::ClientRegistry;
