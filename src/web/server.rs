//! Web server implementation
//!
//! Provides the main server struct and configuration.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::routes::{router, AppState};
use super::{DEFAULT_BIND, DEFAULT_BODY_LIMIT, DEFAULT_PORT, PORT_ENV};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Address to bind to
    pub bind: String,
    /// Maximum request body size in bytes
    pub body_limit: usize,
    /// Directory holding transient files
    pub uploads_dir: PathBuf,
    /// Directory holding the static forms and stylesheet
    pub public_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND.to_string(),
            body_limit: DEFAULT_BODY_LIMIT,
            uploads_dir: PathBuf::from("uploads"),
            public_dir: PathBuf::from("public"),
        }
    }
}

impl ServerConfig {
    /// Default configuration with the port taken from the `PORT`
    /// environment variable when set and parseable.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(port) = std::env::var(PORT_ENV)
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
        {
            config.port = port;
        }
        config
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the bind address
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Set the body limit
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Set the uploads directory
    pub fn with_uploads_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.uploads_dir = dir.into();
        self
    }

    /// Set the public assets directory
    pub fn with_public_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.public_dir = dir.into();
        self
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.bind, self.port).parse()
    }
}

/// Web server instance
pub struct WebServer {
    config: ServerConfig,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server with default configuration
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new web server with the given configuration
    pub fn with_config(config: ServerConfig) -> Self {
        let state = Arc::new(AppState::new(&config.uploads_dir, &config.public_dir));
        Self { config, state }
    }

    /// Get the server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Build the router
    pub fn build_router(&self) -> Router {
        router(self.state.clone())
            .layer(CorsLayer::permissive())
            .layer(DefaultBodyLimit::max(self.config.body_limit))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server
    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.config.socket_addr()?;
        self.state.scratch.ensure().await?;
        let router = self.build_router();

        info!("listening on http://{}", addr);
        info!("  GET  /upload        - upload form");
        info!("  POST /upload        - file -> base64 page");
        info!("  GET  /convert-back  - conversion form");
        info!("  POST /convert-back  - base64 -> file download");

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}

impl Default for WebServer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.body_limit, 50 * 1024 * 1024);
        assert_eq!(config.uploads_dir, PathBuf::from("uploads"));
        assert_eq!(config.public_dir, PathBuf::from("public"));
    }

    #[test]
    fn test_server_config_builder() {
        let config = ServerConfig::default()
            .with_port(8080)
            .with_bind("0.0.0.0")
            .with_body_limit(10 * 1024 * 1024)
            .with_uploads_dir("/tmp/scratch")
            .with_public_dir("assets");

        assert_eq!(config.port, 8080);
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.body_limit, 10 * 1024 * 1024);
        assert_eq!(config.uploads_dir, PathBuf::from("/tmp/scratch"));
        assert_eq!(config.public_dir, PathBuf::from("assets"));
    }

    #[test]
    fn test_server_config_socket_addr() {
        let config = ServerConfig::default();
        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.port(), 3000);
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
    }

    #[test]
    fn test_web_server_with_config() {
        let server = WebServer::with_config(ServerConfig::default().with_port(9000));
        assert_eq!(server.config().port, 9000);
    }
}
