//! Web server module for fileb64
//!
//! Provides the HTTP surface: an upload page that renders a file as
//! base64, and a conversion page that turns a base64 string back into a
//! downloadable file.
//!
//! # Routes
//!
//! - `GET  /upload`        - static upload form
//! - `POST /upload`        - multipart file -> HTML page with base64
//! - `GET  /convert-back`  - static conversion form
//! - `POST /convert-back`  - base64 + file name -> file download
//!
//! Static assets (the two forms and the stylesheet) are served from the
//! public directory.

mod routes;
mod server;

pub use routes::AppState;
pub use server::{ServerConfig, WebServer};

/// Default server port
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address
pub const DEFAULT_BIND: &str = "127.0.0.1";

/// Default body limit in bytes (50 MB), applied to multipart uploads and
/// to urlencoded/JSON conversion bodies alike
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

/// Environment variable consulted for the listening port
pub const PORT_ENV: &str = "PORT";
