//! shared doubles for the client and registry tests

use std::{
    net::SocketAddr,
    sync::atomic::{AtomicU32, Ordering},
};

use async_trait::async_trait;
use config::DiscoveryProvider;
use tokio::net::TcpListener;

/// fixed members, counting every lookup
#[derive(Debug)]
pub(crate) struct CountingDiscovery {
    calls: AtomicU32,
    members: Vec<SocketAddr>,
}

impl CountingDiscovery {
    pub(crate) fn new(members: Vec<SocketAddr>) -> Self {
        Self {
            calls: AtomicU32::new(0),
            members,
        }
    }

    /// lookups made so far
    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DiscoveryProvider for CountingDiscovery {
    async fn discover_members(&self) -> anyhow::Result<Vec<SocketAddr>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.members.clone())
    }
}

pub(crate) async fn listener() -> (TcpListener, SocketAddr) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (listener, addr)
}

/// an address nothing listens on
pub(crate) async fn closed_addr() -> SocketAddr {
    let (listener, addr) = listener().await;
    drop(listener);
    addr
}
