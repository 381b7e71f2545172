//! Static file serving module
//!
//! Serves the served root the way a plain directory web server does: files
//! with an inferred Content-Type, `index.html` for directories, and an HTML
//! listing for directories without one.

use crate::handler::router::{decode_path, RequestContext};
use crate::http::{self, cache, mime};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;
use std::fmt::Write as _;
use std::fs::Metadata;
use std::path::{Path, PathBuf};
use tokio::fs;

const INDEX_FILES: &[&str] = &["index.html", "index.htm"];

/// Serve whatever the request path names under `root`
pub async fn serve_path(ctx: &RequestContext<'_>, root: &Path) -> Response<Full<Bytes>> {
    let fs_path = root.join(translate_path(ctx.path));

    let Ok(meta) = fs::metadata(&fs_path).await else {
        return http::build_404_response(ctx.is_head);
    };

    if meta.is_dir() {
        if !ctx.path.ends_with('/') {
            return http::build_moved_permanently_response(&slash_location(ctx));
        }
        for index in INDEX_FILES {
            let index_path = fs_path.join(index);
            if let Ok(index_meta) = fs::metadata(&index_path).await {
                if index_meta.is_file() {
                    return serve_file(ctx, &index_path, &index_meta).await;
                }
            }
        }
        return serve_directory_listing(ctx, &fs_path).await;
    }

    // "file.tsv/" never names a file
    if ctx.path.ends_with('/') {
        return http::build_404_response(ctx.is_head);
    }

    serve_file(ctx, &fs_path, &meta).await
}

/// Map a URL path onto a path relative to the served root
///
/// The path is percent-decoded and normalized; `..` can climb no higher than
/// the root and empty or `.` segments are dropped.
pub fn translate_path(url_path: &str) -> PathBuf {
    let decoded = decode_path(url_path);
    let mut parts: Vec<&str> = Vec::new();

    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s if cfg!(windows) && (s.contains('\\') || s.contains(':')) => {}
            s => parts.push(s),
        }
    }

    parts.iter().collect()
}

/// Location for the trailing-slash redirect
///
/// Leading slashes collapse to one so `//host` never leaves the server as a
/// protocol-relative URL.
fn slash_location(ctx: &RequestContext<'_>) -> String {
    let path = ctx.path.trim_start_matches('/');
    match ctx.query {
        Some(q) => format!("/{path}/?{q}"),
        None => format!("/{path}/"),
    }
}

/// Serve a single regular file
async fn serve_file(
    ctx: &RequestContext<'_>,
    file_path: &Path,
    meta: &Metadata,
) -> Response<Full<Bytes>> {
    let last_modified = meta.modified().ok();

    if let Some(modified) = last_modified {
        if cache::is_not_modified(
            ctx.if_modified_since.as_deref(),
            ctx.has_if_none_match,
            modified,
        ) {
            return http::build_304_response(&cache::format_http_date(modified));
        }
    }

    // Exists but unreadable is reported as missing
    let Ok(content) = fs::read(file_path).await else {
        return http::build_404_response(ctx.is_head);
    };

    let date = last_modified.map(cache::format_http_date);
    http::build_content_response(
        Bytes::from(content),
        mime::content_type_for_path(file_path),
        date.as_deref(),
        ctx.is_head,
    )
}

/// Serve an HTML index of a directory
async fn serve_directory_listing(ctx: &RequestContext<'_>, dir: &Path) -> Response<Full<Bytes>> {
    let Ok(mut entries) = fs::read_dir(dir).await else {
        return http::build_404_response(ctx.is_head);
    };

    let mut names: Vec<ListingEntry> = Vec::new();
    while let Ok(Some(entry)) = entries.next_entry().await {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_symlink = entry.file_type().await.is_ok_and(|t| t.is_symlink());
        // Follow symlinks so linked directories get their slash
        let is_dir = fs::metadata(entry.path()).await.is_ok_and(|m| m.is_dir());
        names.push(ListingEntry {
            name,
            is_dir,
            is_symlink,
        });
    }
    names.sort_by_key(|e| e.name.to_lowercase());

    let html = render_directory_listing(&ctx.decoded_path(), &names);
    http::build_html_response(html, ctx.is_head)
}

struct ListingEntry {
    name: String,
    is_dir: bool,
    is_symlink: bool,
}

fn render_directory_listing(display_path: &str, entries: &[ListingEntry]) -> String {
    let title = format!("Directory listing for {}", escape_html(display_path));
    let mut html = String::new();

    let _ = writeln!(html, "<!DOCTYPE HTML>");
    let _ = writeln!(html, "<html lang=\"en\">");
    let _ = writeln!(html, "<head>");
    let _ = writeln!(html, "<meta charset=\"utf-8\">");
    let _ = writeln!(html, "<title>{title}</title>");
    let _ = writeln!(html, "</head>");
    let _ = writeln!(html, "<body>");
    let _ = writeln!(html, "<h1>{title}</h1>");
    let _ = writeln!(html, "<hr>\n<ul>");

    for entry in entries {
        let mut display = entry.name.clone();
        let mut link = urlencoding::encode(&entry.name).into_owned();
        if entry.is_dir {
            link.push('/');
        }
        // A link shows as `name@` even when it points at a directory
        if entry.is_symlink {
            display.push('@');
        } else if entry.is_dir {
            display.push('/');
        }
        let _ = writeln!(
            html,
            "<li><a href=\"{link}\">{}</a></li>",
            escape_html(&display)
        );
    }

    let _ = writeln!(html, "</ul>\n<hr>\n</body>\n</html>");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
