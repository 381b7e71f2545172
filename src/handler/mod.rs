//! Request handler module
//!
//! Responsible for request routing dispatch: the Rica file listing endpoint
//! and static file serving for everything else.

pub mod files_api;
pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;

/// Reserved path of the JSON file listing
pub const FILES_API_PATH: &str = "/api/files";
