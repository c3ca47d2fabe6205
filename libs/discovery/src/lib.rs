//! # discovery
//!
//! Resolution of the current data-grid cluster members. Consumers depend on
//! the [`DiscoveryProvider`] capability only; [`DnsServiceDiscovery`] backs it
//! with a service registry exposed over DNS and [`StaticDiscovery`] with a
//! fixed list.
#![warn(
    missing_debug_implementations,
    missing_docs,
    missing_copy_implementations,
    rust_2018_idioms,
    unreachable_pub,
    non_snake_case,
    non_upper_case_globals
)]
#![allow(clippy::cognitive_complexity)]
#![deny(rustdoc::broken_intra_doc_links)]
#![doc(test(
    no_crate_inject,
    attr(deny(warnings, rust_2018_idioms), allow(dead_code, unused_variables))
))]
use std::{fmt, net::SocketAddr};

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use hickory_resolver::config::ResolverOpts;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{Resolver, TokioResolver};
use tracing::debug;

/// Resolves the endpoints of the cluster members a client may connect to.
///
/// Implementations are shared between tasks and must not require mutable
/// access; callers hold them behind an `Arc`.
#[async_trait]
pub trait DiscoveryProvider: fmt::Debug + Send + Sync {
    /// return the currently known member endpoints, in preference order
    async fn discover_members(&self) -> Result<Vec<SocketAddr>>;
}

/// DNS service discovery
///
/// Every A/AAAA record published for `name` is treated as a member listening
/// on `port`. Works with registries that expose services over DNS, ex. Consul's
/// `<service>.service.consul`.
pub struct DnsServiceDiscovery {
    resolver: TokioResolver,
    name: String,
    port: u16,
}

impl DnsServiceDiscovery {
    /// Create a new service using the system resolver configuration
    pub fn new(name: impl Into<String>, port: u16) -> Result<Self> {
        Ok(Self {
            resolver: Resolver::builder(TokioConnectionProvider::default())
                .context("failed to create tokio resolver")?
                .with_options(ResolverOpts::default())
                .build(),
            name: name.into(),
            port,
        })
    }

    /// the service name being resolved
    pub fn name(&self) -> &str {
        &self.name
    }

    /// the port every discovered member is expected to listen on
    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Debug for DnsServiceDiscovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DnsServiceDiscovery")
            .field("name", &self.name)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl DiscoveryProvider for DnsServiceDiscovery {
    async fn discover_members(&self) -> Result<Vec<SocketAddr>> {
        let lookup = self
            .resolver
            .lookup_ip(self.name.as_str())
            .await
            .with_context(|| format!("failed to lookup members for {}", self.name))?;
        let members = lookup
            .iter()
            .map(|ip| SocketAddr::new(ip, self.port))
            .collect::<Vec<_>>();
        debug!(name = %self.name, ?members, "resolved cluster members");

        if members.is_empty() {
            bail!("no members published for {}", self.name);
        }
        Ok(members)
    }
}

/// A fixed list of member endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticDiscovery {
    members: Vec<SocketAddr>,
}

impl StaticDiscovery {
    /// Create a provider that always returns `members`
    pub fn new(members: impl IntoIterator<Item = SocketAddr>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    /// parse a comma separated list of `ip:port` pairs
    /// ex.
    ///     parse("10.0.0.1:5701,10.0.0.2:5701")
    pub fn parse(list: &str) -> Result<Self> {
        let members = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<SocketAddr>()
                    .with_context(|| format!("invalid member address {s:?}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { members })
    }

    /// the configured members
    pub fn members(&self) -> &[SocketAddr] {
        &self.members
    }
}

#[async_trait]
impl DiscoveryProvider for StaticDiscovery {
    async fn discover_members(&self) -> Result<Vec<SocketAddr>> {
        if self.members.is_empty() {
            bail!("static member list is empty");
        }
        Ok(self.members.clone())
    }
}
