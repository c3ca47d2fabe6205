//! Client factory and the shared client handle.
//!
//! Each connection attempt re-resolves the member list (discovery results
//! change while a cluster forms) and tries every member in order. Attempts are
//! bounded by the configured limit and spaced by the configured attempt period.

use std::{net::SocketAddr, sync::Arc, time::Instant};

use config::{
    ClientConfig, DiscoveryProvider,
    client::{DEFAULT_MEMBER_ADDRESS, property},
};
use grid_core::metrics::{CONNECT_ATTEMPTS, DISCOVERED_MEMBERS, DISCOVERY_FAILURES};
use tokio::{
    net::TcpStream,
    sync::{Mutex, MutexGuard},
};
use tracing::{debug, error, info, warn};

use crate::error::{ClientError, ClientResult};

/// Handle to a data-grid client connected to a cluster member.
///
/// Cheap to clone; all clones share the same session.
#[derive(Debug, Clone)]
pub struct GridClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
struct ClientInner {
    config: ClientConfig,
    member: SocketAddr,
    members: Vec<SocketAddr>,
    session: Mutex<TcpStream>,
    connected_at: Instant,
}

impl GridClient {
    /// the configuration this client was created from
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// cluster (group) name the client joined
    pub fn cluster_name(&self) -> Option<&str> {
        self.inner.config.cluster_name()
    }

    /// member the session is established with
    pub fn member(&self) -> SocketAddr {
        self.inner.member
    }

    /// members known when the session was established
    pub fn members(&self) -> &[SocketAddr] {
        &self.inner.members
    }

    /// when the session was established
    pub fn connected_at(&self) -> Instant {
        self.inner.connected_at
    }

    /// exclusive access to the session stream, for the grid protocol layer
    pub async fn session(&self) -> MutexGuard<'_, TcpStream> {
        self.inner.session.lock().await
    }
}

/// Creates [`GridClient`]s. Holds no state: calling it twice creates two
/// clients, see [`ClientRegistry`](crate::ClientRegistry) for the guarded
/// single instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientFactory;

struct Session {
    stream: TcpStream,
    member: SocketAddr,
    members: Vec<SocketAddr>,
}

impl ClientFactory {
    /// Connect to the cluster described by `config` and return the client.
    ///
    /// Suspends the calling task until a member accepts the connection or the
    /// connection-attempt limit is used up, in which case
    /// [`ClientError::Connection`] is returned. A limit of `0` still makes one
    /// attempt.
    pub async fn get_or_create(config: ClientConfig) -> ClientResult<GridClient> {
        let total_attempts = config.network().connection_attempt_limit().max(1);
        let period = config.network().connection_attempt_period();

        info!(
            cluster_name = ?config.cluster_name(),
            discovery_enabled = config.is_discovery_enabled(),
            total_attempts,
            "connecting to data grid"
        );

        for attempt in 1..=total_attempts {
            match Self::try_connect(&config).await {
                Ok(session) => {
                    CONNECT_ATTEMPTS.connected.inc();
                    info!(
                        attempt,
                        total_attempts,
                        member = %session.member,
                        "data grid connection established"
                    );
                    return Ok(GridClient {
                        inner: Arc::new(ClientInner {
                            config,
                            member: session.member,
                            members: session.members,
                            session: Mutex::new(session.stream),
                            connected_at: Instant::now(),
                        }),
                    });
                }
                Err(err) => {
                    CONNECT_ATTEMPTS.failed.inc();
                    if attempt >= total_attempts {
                        error!(
                            attempts = total_attempts,
                            error = %err,
                            "data grid connection failed after all attempts"
                        );
                        return Err(ClientError::Connection {
                            attempts: total_attempts,
                            reason: err.to_string(),
                        });
                    }

                    warn!(
                        attempt,
                        total_attempts,
                        retry_in_ms = period.as_millis() as u64,
                        error = %err,
                        "data grid connection attempt failed, retrying"
                    );
                    tokio::time::sleep(period).await;
                }
            }
        }

        unreachable!("connect loop should return on success or terminal failure")
    }

    /// one attempt: resolve the members, then try each in order
    async fn try_connect(config: &ClientConfig) -> ClientResult<Session> {
        let members = Self::resolve_members(config).await?;
        let timeout = config.network().connection_timeout();

        let mut last_err = None;
        let mut connected = None;
        for member in &members {
            match tokio::time::timeout(timeout, TcpStream::connect(*member)).await {
                Ok(Ok(stream)) => {
                    if let Err(err) = stream.set_nodelay(true) {
                        debug!(%member, ?err, "failed to set TCP_NODELAY");
                    }
                    connected = Some((stream, *member));
                    break;
                }
                Ok(Err(err)) => {
                    debug!(%member, error = %err, "member connect failed");
                    last_err = Some(ClientError::Transport(format!(
                        "connect to {member} failed: {err}"
                    )));
                }
                Err(_) => {
                    debug!(%member, ?timeout, "member connect timed out");
                    last_err = Some(ClientError::Timeout(format!(
                        "connect to {member} timed out after {timeout:?}"
                    )));
                }
            }
        }

        match connected {
            Some((stream, member)) => Ok(Session {
                stream,
                member,
                members,
            }),
            None => Err(last_err.unwrap_or_else(|| {
                ClientError::Discovery("no members to connect to".into())
            })),
        }
    }

    /// members from the discovery provider when discovery is enabled,
    /// otherwise from the static member list
    async fn resolve_members(config: &ClientConfig) -> ClientResult<Vec<SocketAddr>> {
        let provider = config.network().discovery().provider();
        match provider {
            Some(provider) if config.is_discovery_enabled() => {
                Self::discover(&**provider).await
            }
            _ => {
                if provider.is_some() {
                    warn!(
                        property = property::DISCOVERY_ENABLED,
                        "discovery provider attached but discovery is disabled, using static members"
                    );
                }
                Self::static_members(config.network().cluster_members()).await
            }
        }
    }

    async fn discover(provider: &dyn DiscoveryProvider) -> ClientResult<Vec<SocketAddr>> {
        let members = provider.discover_members().await.map_err(|err| {
            DISCOVERY_FAILURES.inc();
            ClientError::Discovery(format!("{err:#}"))
        })?;
        DISCOVERED_MEMBERS.set(members.len() as i64);
        debug!(?members, "discovered cluster members");

        if members.is_empty() {
            return Err(ClientError::Discovery(
                "discovery returned no members".into(),
            ));
        }
        Ok(members)
    }

    async fn static_members(addrs: &[String]) -> ClientResult<Vec<SocketAddr>> {
        let addrs = if addrs.is_empty() {
            vec![DEFAULT_MEMBER_ADDRESS.to_owned()]
        } else {
            addrs.to_vec()
        };

        let mut members = Vec::with_capacity(addrs.len());
        for addr in &addrs {
            match tokio::net::lookup_host(addr.as_str()).await {
                Ok(resolved) => members.extend(resolved),
                Err(err) => warn!(%addr, error = %err, "failed to resolve static member"),
            }
        }

        if members.is_empty() {
            return Err(ClientError::Discovery(format!(
                "none of the static members resolved: {addrs:?}"
            )));
        }
        Ok(members)
    }
}
