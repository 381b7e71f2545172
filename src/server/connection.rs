// Connection handling module
// Serves one TCP connection to completion and writes its access log line

use http_body_util::Full;
use hyper::body::{Body, Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, Uri, Version};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AppState;
use crate::handler;
use crate::logger::{self, AccessLogEntry};

/// Serve a single connection.
///
/// Keep-alive is off, so each connection carries exactly one request and
/// the caller's accept loop stays strictly sequential. A non-zero
/// `read_timeout` bounds how long a slow client can hold the loop.
pub async fn serve_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) {
    let io = TokioIo::new(stream);
    let timeout_secs = state.config.performance.read_timeout;

    let mut builder = http1::Builder::new();
    builder.keep_alive(false);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| {
            let state = Arc::clone(&state);
            async move { handle_logged(req, peer_addr, state).await }
        }),
    );

    let result = if timeout_secs == 0 {
        Ok(conn.await)
    } else {
        tokio::time::timeout(Duration::from_secs(timeout_secs), conn).await
    };

    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) if is_client_fault(&err) => {}
        Ok(Err(err)) => logger::log_connection_error(&err),
        Err(_) => {
            logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {timeout_secs} seconds"
            ));
        }
    }
}

/// Client hung up mid-request or sent something that is not HTTP.
/// hyper has already answered the latter with a 400; nothing worth reporting.
fn is_client_fault(err: &hyper::Error) -> bool {
    err.is_incomplete_message() || err.is_parse()
}

/// Run the request handler and log the outcome
async fn handle_logged(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let mut entry = AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        request_target(req.uri()).to_string(),
    );
    entry.http_version = version_label(req.version()).to_string();

    let response = handler::handle_request(req, Arc::clone(&state)).await?;

    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    logger::log_access(&entry, state.access_log());

    Ok(response)
}

fn request_target(uri: &Uri) -> &str {
    uri.path_and_query().map_or("/", |pq| pq.as_str())
}

const fn version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test]
    async fn test_malformed_request_is_client_fault() {
        let (mut client, server) = tokio::io::duplex(4096);
        client.write_all(b"GARBAGE\r\n\r\n").await.unwrap();

        let err = http1::Builder::new()
            .serve_connection(
                TokioIo::new(server),
                service_fn(|_req: Request<Incoming>| async {
                    Ok::<_, Infallible>(Response::new(Full::new(Bytes::new())))
                }),
            )
            .await
            .unwrap_err();
        assert!(is_client_fault(&err));

        let mut reply = Vec::new();
        client.read_to_end(&mut reply).await.unwrap();
        assert!(String::from_utf8_lossy(&reply).starts_with("HTTP/1.1 400"));
    }

    #[test]
    fn test_request_target_keeps_query() {
        let uri: Uri = "/api/files?t=1".parse().unwrap();
        assert_eq!(request_target(&uri), "/api/files?t=1");
        let uri: Uri = "/".parse().unwrap();
        assert_eq!(request_target(&uri), "/");
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(Version::HTTP_10), "1.0");
        assert_eq!(version_label(Version::HTTP_11), "1.1");
    }
}
