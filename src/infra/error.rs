use std::net::SocketAddr;

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

use crate::config::LoadError;

/// Failures that stop the process before or while it starts serving.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] LoadError),
    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(#[from] TryInitError),
    #[error("database {action} failed: {source}")]
    Database {
        action: &'static str,
        #[source]
        source: sqlx::Error,
    },
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    pub fn database(action: &'static str, source: sqlx::Error) -> Self {
        Self::Database { action, source }
    }
}
