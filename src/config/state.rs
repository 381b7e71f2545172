// Application state module
// Read-only state shared by every request handler

use std::path::PathBuf;

use super::types::Config;
use crate::scan::RICA_FILE_PATTERNS;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Directory served over HTTP and scanned for Rica files
    pub root: PathBuf,
    /// Filename substrings that mark a file as Rica-relevant
    pub patterns: &'static [&'static str],
}

impl AppState {
    pub fn new(config: Config, root: PathBuf) -> Self {
        Self {
            config,
            root,
            patterns: RICA_FILE_PATTERNS,
        }
    }

    pub const fn access_log(&self) -> bool {
        self.config.logging.access_log
    }
}
