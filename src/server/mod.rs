// Server module entry point
// Startup scan, listener binding, browser launch and the accept loop

pub mod browser;
pub mod connection;
pub mod listener;
pub mod signal;

// `loop` is a keyword, so the file is mounted under another name
#[path = "loop.rs"]
pub mod server_loop;

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{AppState, Config};
use crate::error::ServerError;
use crate::logger;
use crate::scan::{self, RICA_FILE_PATTERNS};

pub use listener::create_listener;
pub use server_loop::run_server_loop;

/// Run the server until Ctrl+C (or SIGTERM)
///
/// Returns [`ServerError::PortInUse`] without printing anything when the
/// port is taken, so the caller decides how to report it.
pub async fn run(config: Config, root: PathBuf) -> Result<(), ServerError> {
    let addr = config.get_socket_addr()?;

    let found = scan::find_matching_files(&root, RICA_FILE_PATTERNS).len();
    if found == 0 {
        logger::log_no_files_found(&root);
    }

    let listener = create_listener(addr)?;

    let url = config.browser_url();
    logger::log_server_start(&url, &root, found);

    if config.server.open_browser {
        if let Err(e) = browser::open_browser(&url) {
            logger::log_warning(&format!("Could not open a browser: {e}"));
        }
    }

    let state = Arc::new(AppState::new(config, root));
    run_server_loop(listener, state, signal::shutdown_signal()).await;

    logger::log_server_stopped();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;
    use std::fs;
    use std::net::SocketAddr;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    async fn fetch(addr: SocketAddr, raw_request: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(raw_request.as_bytes()).await.unwrap();
        let mut buf = Vec::new();
        stream.read_to_end(&mut buf).await.unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    fn config_for(port: u16) -> Config {
        Config::load_from(
            None,
            &Overrides {
                host: Some("127.0.0.1"),
                port: Some(port),
                no_open: true,
                verbose: false,
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_serves_requests_until_shutdown() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sub1_metrics.tsv"), "a\tb\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "n").unwrap();

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(config_for(addr.port()), dir.path().to_path_buf()));

        let (tx, rx) = oneshot::channel::<()>();
        let server = run_server_loop(listener, state, async {
            let _ = rx.await;
        });
        let client = async {
            let listing = fetch(addr, "GET /api/files HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
            let missing = fetch(addr, "GET /nope HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
            let preflight =
                fetch(addr, "OPTIONS /api/files HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
            let _ = tx.send(());
            (listing, missing, preflight)
        };

        let ((), (listing, missing, preflight)) = tokio::join!(server, client);

        assert!(listing.starts_with("HTTP/1.1 200 OK"));
        assert!(listing.contains("access-control-allow-origin: *"));
        assert!(listing.contains("\"sub1_metrics.tsv\""));
        assert!(!listing.contains("notes.txt"));

        assert!(missing.starts_with("HTTP/1.1 404 Not Found"));
        assert!(missing.contains("access-control-allow-origin: *"));

        assert!(preflight.starts_with("HTTP/1.1 200 OK"));
        assert!(preflight.contains("access-control-allow-methods: GET, OPTIONS"));
        assert!(preflight.contains("access-control-allow-headers: Content-Type"));
    }

    #[tokio::test]
    async fn test_malformed_request_does_not_stop_the_loop() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("figures")).unwrap();

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let state = Arc::new(AppState::new(config_for(addr.port()), dir.path().to_path_buf()));

        let (tx, rx) = oneshot::channel::<()>();
        let server = run_server_loop(listener, state, async {
            let _ = rx.await;
        });
        let client = async {
            let garbage = fetch(addr, "GARBAGE\r\n\r\n").await;
            let redirect = fetch(addr, "GET //figures HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
            let _ = tx.send(());
            (garbage, redirect)
        };

        let ((), (garbage, redirect)) = tokio::join!(server, client);

        assert!(garbage.starts_with("HTTP/1.1 400"));
        assert!(redirect.starts_with("HTTP/1.1 301 Moved Permanently"));
        assert!(redirect.contains("location: /figures/\r\n"));
    }

    #[tokio::test]
    async fn test_run_reports_port_in_use() {
        let dir = TempDir::new().unwrap();
        let taken = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let port = taken.local_addr().unwrap().port();

        let result = run(config_for(port), dir.path().to_path_buf()).await;
        assert!(matches!(result, Err(ServerError::PortInUse { port: p }) if p == port));
    }
}
