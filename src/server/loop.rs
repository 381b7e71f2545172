// Server loop module
// Sequential accept loop: one connection is served to completion before the
// next is accepted

use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::serve_connection;
use crate::config::AppState;
use crate::logger;

/// Accept and serve connections until `shutdown` resolves
///
/// A shutdown request also cuts short the connection currently in flight.
pub async fn run_server_loop<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        tokio::select! {
                            () = serve_connection(stream, peer_addr, Arc::clone(&state)) => {}
                            () = &mut shutdown => return,
                        }
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => return,
        }
    }
}
