//! HTTP protocol layer module
//!
//! Provides HTTP protocol-related base functionality, decoupled from the
//! request routing in `handler`.

pub mod cache;
pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use cors::with_cors;
pub use response::{
    build_304_response, build_404_response, build_500_response, build_501_response,
    build_content_response, build_html_response, build_json_response,
    build_moved_permanently_response, build_options_response,
};
