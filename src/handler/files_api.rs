//! `GET /api/files`: JSON listing of the Rica-relevant files under the root

use crate::config::AppState;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use crate::scan::FileListing;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::sync::Arc;

/// Walk the served root and answer with the listing
pub async fn serve_file_listing(
    ctx: &RequestContext<'_>,
    state: &Arc<AppState>,
) -> Response<Full<Bytes>> {
    let root = state.root.clone();
    let patterns = state.patterns;

    let scan = tokio::task::spawn_blocking(move || FileListing::build(&root, patterns));
    let listing = match scan.await {
        Ok(listing) => listing,
        Err(e) => {
            logger::log_error(&format!("File scan task failed: {e}"));
            return http::build_500_response();
        }
    };

    match listing.to_json() {
        Ok(json) => http::build_json_response(json, ctx.is_head),
        Err(e) => {
            logger::log_error(&format!("Failed to serialize file listing: {e}"));
            http::build_500_response()
        }
    }
}
