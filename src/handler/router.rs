//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation,
//! route matching, and dispatching. Every response leaves through
//! [`handle_request`], which stamps the CORS headers on it.

use crate::config::AppState;
use crate::handler::{files_api, static_files, FILES_API_PATH};
use crate::http;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::sync::Arc;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) path, query excluded
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub is_head: bool,
    pub if_modified_since: Option<String>,
    pub has_if_none_match: bool,
}

impl<'a> RequestContext<'a> {
    pub fn from_request<B>(req: &'a Request<B>) -> Self {
        let headers = req.headers();
        Self {
            path: req.uri().path(),
            query: req.uri().query(),
            is_head: req.method() == Method::HEAD,
            if_modified_since: headers
                .get("if-modified-since")
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
            has_if_none_match: headers.contains_key("if-none-match"),
        }
    }

    /// Percent-decoded path; invalid UTF-8 is replaced, never rejected
    pub fn decoded_path(&self) -> String {
        decode_path(self.path)
    }
}

pub fn decode_path(path: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(path.as_bytes())).into_owned()
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let response = route_request(&req, &state).await;
    Ok(http::with_cors(response))
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response()),
        _ => Some(http::build_501_response(method.as_str())),
    }
}

/// Route request based on its decoded path
async fn route_request<B>(req: &Request<B>, state: &Arc<AppState>) -> Response<Full<Bytes>> {
    if let Some(resp) = check_http_method(req.method()) {
        return resp;
    }

    let ctx = RequestContext::from_request(req);

    // Only the path is compared, so `/api/files?t=123` (a cache-busting
    // reload) still gets the listing rather than a 404
    if ctx.decoded_path() == FILES_API_PATH {
        return files_api::serve_file_listing(&ctx, state).await;
    }

    static_files::serve_path(&ctx, &state.root).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{body_string, send, state_for};
    use hyper::StatusCode;
    use std::fs;
    use tempfile::TempDir;

    fn assert_cors(resp: &Response<Full<Bytes>>) {
        let headers = resp.headers();
        assert_eq!(headers["access-control-allow-origin"], "*");
        assert_eq!(headers["access-control-allow-methods"], "GET, OPTIONS");
        assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    }

    fn tedana_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("sub1_metrics.tsv"), "Component\tkappa\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        fs::write(dir.path().join("comp_001.svg"), "<svg/>").unwrap();
        dir
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/api%2Ffiles"), "/api/files");
        assert_eq!(decode_path("/a%20b.tsv"), "/a b.tsv");
        assert_eq!(decode_path("/bad%FF"), "/bad\u{FFFD}");
    }

    #[tokio::test]
    async fn test_file_listing_endpoint() {
        let dir = tedana_dir();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/api/files").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "application/json");
        assert_cors(&resp);

        let value: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(
            value["files"],
            serde_json::json!(["comp_001.svg", "sub1_metrics.tsv"])
        );
        assert_eq!(value["path"], dir.path().display().to_string());
    }

    #[tokio::test]
    async fn test_encoded_listing_path_is_routed() {
        let dir = tedana_dir();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/api%2Ffiles").await;
        assert_eq!(resp.headers()["content-type"], "application/json");

        let resp = send(&state, Method::GET, "/api/files?t=1").await;
        assert_eq!(resp.headers()["content-type"], "application/json");
    }

    #[tokio::test]
    async fn test_options_preflight() {
        let dir = TempDir::new().unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::OPTIONS, "/anything").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_cors(&resp);
        assert!(body_string(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_static_file_and_404_carry_cors() {
        let dir = tedana_dir();
        let state = state_for(dir.path());

        let resp = send(&state, Method::GET, "/sub1_metrics.tsv").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["content-type"], "text/tab-separated-values");
        assert_cors(&resp);
        assert_eq!(body_string(resp).await, "Component\tkappa\n");

        let resp = send(&state, Method::GET, "/does_not_exist.tsv").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_unsupported_method() {
        let dir = TempDir::new().unwrap();
        let state = state_for(dir.path());

        let resp = send(&state, Method::POST, "/api/files").await;
        assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
        assert_cors(&resp);
    }

    #[tokio::test]
    async fn test_head_listing_has_no_body() {
        let dir = tedana_dir();
        let state = state_for(dir.path());

        let resp = send(&state, Method::HEAD, "/api/files").await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_ne!(resp.headers()["content-length"], "0");
        assert!(body_string(resp).await.is_empty());
    }
}
