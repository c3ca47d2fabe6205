//! Single-assignment owner of the process' data-grid client.

use config::ClientConfig;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::{ClientFactory, ClientResult, GridClient};

/// Holds at most one [`GridClient`].
///
/// The first successful [`get_or_try_init`](ClientRegistry::get_or_try_init)
/// creates the client; concurrent callers wait for it and every later caller
/// gets the same handle. A failed creation leaves the registry empty so a
/// later call may try again.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    client: OnceCell<GridClient>,
}

impl ClientRegistry {
    /// empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// the client, if one was created
    pub fn get(&self) -> Option<&GridClient> {
        self.client.get()
    }

    /// Return the existing client, or create it from `config`.
    ///
    /// `config` is dropped unused when a client already exists.
    pub async fn get_or_try_init(&self, config: ClientConfig) -> ClientResult<&GridClient> {
        if let Some(client) = self.client.get() {
            debug!(member = %client.member(), "data grid client already created");
            return Ok(client);
        }
        self.client
            .get_or_try_init(|| ClientFactory::get_or_create(config))
            .await
    }
}
