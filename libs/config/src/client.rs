//! client configuration types

use std::{
    collections::BTreeMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::Duration,
};

use discovery::DiscoveryProvider;

/// Well-known keys of the free-form client properties
pub mod property {
    /// logging backend used by the client
    pub const LOGGING_TYPE: &str = "hazelcast.logging.type";
    /// usage reporting to the grid vendor
    pub const PHONE_HOME_ENABLED: &str = "hazelcast.phone.home.enabled";
    /// resolve members through `network.discovery` instead of the static list
    pub const DISCOVERY_ENABLED: &str = "hazelcast.discovery.enabled";
}

/// default number of connection attempts made by the grid library
pub const DEFAULT_CONNECTION_ATTEMPT_LIMIT: u32 = 2;
/// default pause between two connection attempts
pub const DEFAULT_CONNECTION_ATTEMPT_PERIOD: Duration = Duration::from_millis(3_000);
/// default timeout of a single socket connect
pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_millis(5_000);
/// port assumed for a static member given without one
pub const DEFAULT_MEMBER_PORT: u16 = 5701;
/// member tried when neither discovery nor a static member list is configured
pub const DEFAULT_MEMBER_ADDRESS: &str = "127.0.0.1:5701";

/// data-grid client config
///
/// Starts out as the library defaults (see [`Default`]) or as a parsed
/// document ([`ClientConfig::from_xml`]). Once handed to the client factory it
/// is no longer modified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    properties: BTreeMap<String, String>,
    cluster_name: Option<String>,
    instance_name: Option<String>,
    network: NetworkConfig,
}

impl ClientConfig {
    /// free-form string properties
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// value of a single property
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// set a property, replacing any previous value for `key`
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// is member discovery through `network.discovery` switched on?
    pub fn is_discovery_enabled(&self) -> bool {
        self.property(property::DISCOVERY_ENABLED)
            .map(|v| v.trim().eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// name of the cluster (group) to join
    pub fn cluster_name(&self) -> Option<&str> {
        self.cluster_name.as_deref()
    }

    /// set the cluster (group) name
    pub fn set_cluster_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.cluster_name = Some(name.into());
        self
    }

    /// name given to the client instance
    pub fn instance_name(&self) -> Option<&str> {
        self.instance_name.as_deref()
    }

    /// set the client instance name
    pub fn set_instance_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.instance_name = Some(name.into());
        self
    }

    /// network section
    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// mutable network section
    pub fn network_mut(&mut self) -> &mut NetworkConfig {
        &mut self.network
    }
}

/// network section of [`ClientConfig`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    connection_attempt_limit: u32,
    connection_attempt_period: Duration,
    connection_timeout: Duration,
    cluster_members: Vec<String>,
    smart_routing: bool,
    discovery: DiscoveryConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connection_attempt_limit: DEFAULT_CONNECTION_ATTEMPT_LIMIT,
            connection_attempt_period: DEFAULT_CONNECTION_ATTEMPT_PERIOD,
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            cluster_members: Vec::new(),
            smart_routing: true,
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl NetworkConfig {
    /// how many times the client tries to reach the cluster before giving up
    pub fn connection_attempt_limit(&self) -> u32 {
        self.connection_attempt_limit
    }
    /// set the connection attempt limit
    pub fn set_connection_attempt_limit(&mut self, limit: u32) -> &mut Self {
        self.connection_attempt_limit = limit;
        self
    }
    /// pause between two connection attempts
    pub fn connection_attempt_period(&self) -> Duration {
        self.connection_attempt_period
    }
    /// set the pause between two connection attempts
    pub fn set_connection_attempt_period(&mut self, period: Duration) -> &mut Self {
        self.connection_attempt_period = period;
        self
    }
    /// timeout of a single socket connect
    pub fn connection_timeout(&self) -> Duration {
        self.connection_timeout
    }
    /// set the socket connect timeout
    pub fn set_connection_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.connection_timeout = timeout;
        self
    }
    /// static `host:port` member list, used when discovery is off
    pub fn cluster_members(&self) -> &[String] {
        &self.cluster_members
    }
    /// append a static member address, [`DEFAULT_MEMBER_PORT`] is used when
    /// `addr` has no port
    pub fn add_cluster_member(&mut self, addr: impl Into<String>) -> &mut Self {
        self.cluster_members.push(with_default_port(addr.into()));
        self
    }
    /// route operations straight to the owning member
    pub fn smart_routing(&self) -> bool {
        self.smart_routing
    }
    /// toggle smart routing
    pub fn set_smart_routing(&mut self, smart_routing: bool) -> &mut Self {
        self.smart_routing = smart_routing;
        self
    }
    /// discovery sub-section
    pub fn discovery(&self) -> &DiscoveryConfig {
        &self.discovery
    }
    /// mutable discovery sub-section
    pub fn discovery_mut(&mut self) -> &mut DiscoveryConfig {
        &mut self.discovery
    }
}

/// `host`, `ip` or `[ipv6]` become `host:5701`, anything with a port is kept
fn with_default_port(addr: String) -> String {
    let trimmed = addr.trim();
    if trimmed.parse::<SocketAddr>().is_ok() {
        return addr;
    }
    let bare = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);
    if let Ok(ip) = bare.parse::<IpAddr>() {
        return SocketAddr::new(ip, DEFAULT_MEMBER_PORT).to_string();
    }
    if trimmed.contains(':') {
        addr
    } else {
        format!("{trimmed}:{DEFAULT_MEMBER_PORT}")
    }
}

/// discovery sub-section of [`NetworkConfig`]
#[derive(Debug, Clone, Default)]
pub struct DiscoveryConfig {
    provider: Option<Arc<dyn DiscoveryProvider>>,
}

impl DiscoveryConfig {
    /// the active discovery provider, if one was attached
    pub fn provider(&self) -> Option<&Arc<dyn DiscoveryProvider>> {
        self.provider.as_ref()
    }

    /// attach `provider` as the active discovery provider, replacing any other
    pub fn set_provider(&mut self, provider: Arc<dyn DiscoveryProvider>) -> &mut Self {
        self.provider = Some(provider);
        self
    }
}

// providers are opaque, two configs match when they share the same one
impl PartialEq for DiscoveryConfig {
    fn eq(&self, other: &Self) -> bool {
        match (&self.provider, &other.provider) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl Eq for DiscoveryConfig {}
