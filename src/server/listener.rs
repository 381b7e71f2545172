// Listener module
// Creates the TCP listener and classifies bind failures

use socket2::{Domain, Protocol, Socket, Type};
use std::net::SocketAddr;
use tokio::net::TcpListener;

use crate::error::ServerError;

/// Create the server's `TcpListener`.
///
/// `SO_REUSEADDR` is set (except on Windows, where it would allow stealing a
/// live port) so a restarted server can bind while old connections linger in
/// `TIME_WAIT`. `SO_REUSEPORT` is deliberately left off: a second server on
/// the same port must fail with [`ServerError::PortInUse`].
///
/// # Returns
///
/// * `Ok(TcpListener)` - Successfully created and bound listener
/// * `Err(ServerError::PortInUse)` - Another socket already listens on the port
/// * `Err(ServerError::Bind)` - Any other socket failure
pub fn create_listener(addr: SocketAddr) -> Result<TcpListener, ServerError> {
    bind_socket(addr).map_err(|e| ServerError::from_bind(addr, e))
}

fn bind_socket(addr: SocketAddr) -> std::io::Result<TcpListener> {
    // Create socket with appropriate domain (IPv4 or IPv6)
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;

    #[cfg(not(windows))]
    socket.set_reuse_address(true)?;

    // Set non-blocking mode for async compatibility
    socket.set_nonblocking(true)?;

    socket.bind(&addr.into())?;

    // Start listening with a backlog queue size of 128
    socket.listen(128)?;

    // Convert socket2::Socket to std::net::TcpListener, then to tokio::net::TcpListener
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
