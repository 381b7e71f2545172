//! Logger module
//!
//! Console logging for the server:
//! - Startup banner and startup warnings
//! - Access logging (quiet by default, everything in verbose mode)
//! - Error and warning logging

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use std::path::Path;
use writer::LogTarget;

/// Write to info/access log
fn write_info(message: &str) {
    writer::write_line(LogTarget::Stdout, message);
}

/// Write to error log
fn write_error(message: &str) {
    writer::write_line(LogTarget::Stderr, message);
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    log_error(&format!("Failed to serve connection: {err}"));
}

pub fn log_server_start(url: &str, root: &Path, found: usize) {
    write_info_lines(&server_start_lines(url, root, found));
}

pub fn log_no_files_found(root: &Path) {
    write_info_lines(&no_files_lines(root));
}

pub fn log_port_in_use(port: u16) {
    write_info_lines(&port_in_use_lines(port));
}

fn write_info_lines(lines: &[String]) {
    for line in lines {
        write_info(line);
    }
}

fn server_start_lines(url: &str, root: &Path, found: usize) -> Vec<String> {
    vec![
        format!("Rica server running at {url}"),
        format!("Serving files from: {}", root.display()),
        format!("Found {found} Rica-relevant files"),
        String::new(),
        "Press Ctrl+C to stop the server".to_string(),
        String::new(),
    ]
}

fn no_files_lines(root: &Path) -> Vec<String> {
    vec![
        format!("Warning: No tedana output files found in {}", root.display()),
        "Make sure you're running this from a tedana output folder.".to_string(),
        String::new(),
    ]
}

fn port_in_use_lines(port: u16) -> Vec<String> {
    vec![
        format!("Error: Port {port} is already in use."),
        format!("Try: rica-server --port {}", port.saturating_add(1)),
    ]
}

pub fn log_server_stopped() {
    write_info("\nServer stopped.");
}

/// Log a served request
///
/// Quiet mode prints only listing requests and non-2xx responses.
pub fn log_access(entry: &AccessLogEntry, verbose: bool) {
    if let Some(line) = access_line(entry, verbose) {
        write_info(&line);
    }
}

fn access_line(entry: &AccessLogEntry, verbose: bool) -> Option<String> {
    if verbose {
        Some(entry.format_common())
    } else if entry.is_listing_request() {
        Some("[Rica] File list requested".to_string())
    } else if entry.is_success() {
        None
    } else {
        Some(entry.format_short())
    }
}
