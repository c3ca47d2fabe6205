//! # config
//!
//! Builds the [`ClientConfig`] a data-grid client is created from.
//!
//! The base configuration is either the library defaults or a document in the
//! grid's native `<hazelcast-client>` XML schema. Unless the operator opts out
//! through [`ClientProperties::skip_default_configuration`], [`ConfigBuilder`]
//! overlays the settings required for discovery-based clustering on top of it.
#![warn(
    missing_debug_implementations,
    missing_docs,
    rust_2018_idioms,
    non_snake_case,
    non_upper_case_globals
)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod builder;
pub mod client;
pub mod error;
pub mod properties;
pub mod xml;

pub use builder::{CONNECTION_ATTEMPT_LIMIT, ConfigBuilder};
pub use client::{ClientConfig, DiscoveryConfig, NetworkConfig};
pub use error::ConfigParseError;
pub use properties::ClientProperties;

// re-export so consumers can name the provider type through this crate
pub use discovery::DiscoveryProvider;
