//! Error types for client creation.

use thiserror::Error;

/// Top-level error type for the grid-client crate.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Every connection attempt failed; the cluster is unreachable.
    #[error("failed to connect to the cluster after {attempts} attempt(s): {reason}")]
    Connection {
        /// attempts made, equal to the configured limit
        attempts: u32,
        /// failure of the last attempt
        reason: String,
    },

    /// Member discovery failed or found nobody.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// A member refused or dropped the connection.
    #[error("transport error: {0}")]
    Transport(String),

    /// Connecting to a member timed out.
    #[error("timeout: {0}")]
    Timeout(String),
}

impl ClientError {
    /// Returns true if this error indicates a transient failure that the next
    /// connection attempt may not hit.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ClientError::Discovery(_) | ClientError::Transport(_) | ClientError::Timeout(_)
        )
    }

    /// Returns true if the connection-attempt budget is exhausted.
    pub fn is_connection(&self) -> bool {
        matches!(self, ClientError::Connection { .. })
    }
}

/// Shorthand result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
