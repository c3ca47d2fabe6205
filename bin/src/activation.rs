//! Decides whether this process creates a data-grid client at all.

use std::sync::Arc;

use anyhow::{Context, Result};
use config::ClientProperties;
use discovery::{DiscoveryProvider, DnsServiceDiscovery, StaticDiscovery};
use grid_core::{config::cli, tracing::debug};

/// Outcome of the startup decision
#[derive(Debug)]
pub enum Activation {
    /// `enabled: false` in the client properties
    Disabled,
    /// nothing to resolve members with
    NoDiscovery,
    /// create the client with this provider
    Enabled(Arc<dyn DiscoveryProvider>),
}

/// the discovery provider selected on the command line, if any. A DNS name
/// takes precedence over a static member list.
pub fn discovery_provider(config: &cli::Config) -> Result<Option<Arc<dyn DiscoveryProvider>>> {
    if let Some(name) = &config.discovery_name {
        debug!(%name, port = config.member_port, "using DNS member discovery");
        let dns = DnsServiceDiscovery::new(name.as_str(), config.member_port)
            .context("failed to create DNS discovery")?;
        return Ok(Some(Arc::new(dns)));
    }
    if let Some(members) = &config.static_members {
        debug!(%members, "using static member discovery");
        let disco = StaticDiscovery::parse(members).context("failed to parse static members")?;
        return Ok(Some(Arc::new(disco)));
    }
    Ok(None)
}

/// client is created only when enabled and a discovery provider exists
pub fn decide(
    props: &ClientProperties,
    provider: Option<Arc<dyn DiscoveryProvider>>,
) -> Activation {
    if !props.enabled {
        return Activation::Disabled;
    }
    match provider {
        Some(provider) => Activation::Enabled(provider),
        None => Activation::NoDiscovery,
    }
}
