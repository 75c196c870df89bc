//! fileb64 - file <-> base64 exchange web server
//!
//! A small HTTP server with two symmetric halves:
//!
//! - upload a file and get its base64 encoding rendered in an HTML page
//! - post a base64 string plus a file name and get the decoded bytes back
//!   as a download
//!
//! Every converted payload passes through a scratch file under the uploads
//! directory; the file is removed once the response has been produced,
//! on success and failure paths alike.

pub mod b64;
pub mod store;
pub mod web;

pub use store::{sanitize_file_name, ScratchDir, ScratchFile, StoreError};
pub use web::{ServerConfig, WebServer, DEFAULT_BIND, DEFAULT_BODY_LIMIT, DEFAULT_PORT};
