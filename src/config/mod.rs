// Configuration module entry point
// Manages application configuration and the per-process server state

mod state;
mod types;

use std::net::SocketAddr;
use std::path::Path;

use crate::error::ServerError;

// Re-export public types
pub use state::AppState;
pub use types::{Config, Overrides};

impl Config {
    /// Load configuration: built-in defaults, then the optional settings file,
    /// then command-line overrides
    pub fn load_from(
        config_file: Option<&Path>,
        overrides: &Overrides<'_>,
    ) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.open_browser", true)?
            .set_default("logging.access_log", false)?
            .set_default("performance.read_timeout", 30)?;

        if let Some(path) = config_file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        if let Some(host) = overrides.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(port) = overrides.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if overrides.no_open {
            builder = builder.set_override("server.open_browser", false)?;
        }
        if overrides.verbose {
            builder = builder.set_override("logging.access_log", true)?;
        }

        builder.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ServerError> {
        let host = self.server.host.trim_start_matches('[').trim_end_matches(']');
        let addr = if host.contains(':') {
            format!("[{host}]:{}", self.server.port)
        } else {
            format!("{host}:{}", self.server.port)
        };
        addr.parse()
            .map_err(|_| ServerError::InvalidAddress(self.server.host.clone()))
    }

    /// URL shown to the user and opened in the browser
    pub fn browser_url(&self) -> String {
        format!("http://localhost:{}", self.server.port)
    }
}
