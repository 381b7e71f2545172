//! Server error types

use std::net::SocketAddr;

/// Errors that can stop the server
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listening port is already bound by another process
    #[error("port {port} is already in use")]
    PortInUse { port: u16 },

    /// Any other failure to bind the listening socket
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid listen address '{0}'")]
    InvalidAddress(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ServerError {
    /// Classify a bind failure, separating "address in use" from the rest
    pub fn from_bind(addr: SocketAddr, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::AddrInUse {
            Self::PortInUse { port: addr.port() }
        } else {
            Self::Bind { addr, source }
        }
    }
}
