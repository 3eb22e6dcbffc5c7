use aerodex_core::config::FileConfig;

/// HTTP server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Whole-request timeout in seconds (default: `90`).
    ///
    /// Kept above the upstream client timeout so an upstream timeout surfaces
    /// as a 504 from the handler rather than a cut connection.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            request_timeout_secs: 90,
        }
    }
}

impl ServerConfig {
    /// Defaults with the `[server]` section of the config file applied.
    pub fn from_file(file: &FileConfig) -> Self {
        let defaults = Self::default();
        Self {
            host: file.server.host.clone().unwrap_or(defaults.host),
            port: file.server.port.unwrap_or(defaults.port),
            request_timeout_secs: file
                .server
                .request_timeout_secs
                .unwrap_or(defaults.request_timeout_secs),
        }
    }

    /// `host:port` string suitable for `TcpListener::bind`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
