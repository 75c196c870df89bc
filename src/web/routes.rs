//! Route handlers
//!
//! Two symmetric flows, each self-contained within one request:
//! upload -> spool -> encode -> HTML page, and base64 -> decode -> write
//! -> download. Scratch files are guarded and removed once the response
//! body has been built.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get_service;
use axum::{extract::FromRequest, Form, Json, Router};
use serde::Deserialize;
use tower_http::services::{ServeDir, ServeFile};
use tracing::error;

use crate::b64;
use crate::store::{sanitize_file_name, ScratchDir};

/// Application state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub scratch: ScratchDir,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(uploads_dir: impl Into<PathBuf>, public_dir: impl AsRef<Path>) -> Self {
        Self {
            scratch: ScratchDir::new(uploads_dir),
            public_dir: public_dir.as_ref().to_path_buf(),
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let upload_form = ServeFile::new(state.public_dir.join("upload.html"));
    let convert_form = ServeFile::new(state.public_dir.join("convert.html"));
    let assets = ServeDir::new(state.public_dir.clone());

    Router::new()
        .route("/upload", get_service(upload_form).post(upload_file))
        .route("/convert-back", get_service(convert_form).post(convert_back))
        .fallback_service(assets)
        .with_state(state)
}

/// Handle a multipart upload: spool the file, encode it, render the
/// result page. The spooled file is deleted when the guard drops,
/// whether encoding succeeded or not.
async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Html<String>, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
        if field.name() != Some("file") {
            continue;
        }

        let mime = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(multipart_failure)?;

        let spooled = state.scratch.spool(&data).await.map_err(read_failure)?;
        let bytes = spooled.read().await.map_err(read_failure)?;
        let encoded = b64::encode(&bytes);

        return Ok(Html(result_page(&mime, &encoded)));
    }

    Err(AppError::BadRequest("No file uploaded".to_string()))
}

fn read_failure(e: impl std::fmt::Display) -> AppError {
    error!(error = %e, "failed to read uploaded file");
    AppError::Internal("File reading failed.".to_string())
}

/// Map a multipart error to a response, keeping its status: a breached
/// body limit stays 413 rather than collapsing into a generic 400.
fn multipart_failure(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File too large".to_string())
    } else {
        AppError::BadRequest(format!("Malformed upload: {}", e.body_text()))
    }
}

/// Render the upload result page: inline preview for images, the raw
/// base64 in an editable textarea, and navigation back to the two forms.
fn result_page(mime: &str, encoded: &str) -> String {
    let preview = if mime.starts_with("image/") {
        format!(r#"<img src="data:{mime};base64,{encoded}" alt="Uploaded image" />"#)
    } else {
        String::new()
    };

    format!(
        r#"<html>
<head><link rel="stylesheet" href="/style.css"></head>
<body>
<div class="container">
  <h3>File uploaded successfully!</h3>
  {preview}
  <textarea rows="10" cols="50">{encoded}</textarea>
  <br/>
  <a href="/convert-back">Convert Base64 back to File</a><br/><br/>
  <button onclick="window.location.href='/upload';">Upload Another File</button>
</div>
</body>
</html>"#
    )
}

/// Conversion request body, accepted as JSON or an urlencoded form.
///
/// Both fields default to empty so a missing field is reported by the
/// handler's own validation rather than a deserializer error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConvertRequest {
    pub base64_string: String,
    pub file_name: String,
}

impl<S> FromRequest<S> for ConvertRequest
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim_start().starts_with("application/json"));

        if is_json {
            let Json(body) = Json::<ConvertRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))?;
            Ok(body)
        } else {
            let Form(body) = Form::<ConvertRequest>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(format!("Invalid form body: {e}")))?;
            Ok(body)
        }
    }
}

/// Decode a base64 string, write it under the supplied name, and stream
/// it back as an attachment. The written file is deleted when the guard
/// drops, after the response body has been read into memory.
async fn convert_back(
    State(state): State<Arc<AppState>>,
    request: ConvertRequest,
) -> Result<FileDownload, AppError> {
    if request.base64_string.is_empty() || request.file_name.is_empty() {
        return Err(AppError::BadRequest(
            "Base64 string and file name are required.".to_string(),
        ));
    }

    let name =
        sanitize_file_name(&request.file_name).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let bytes = b64::decode_lenient(&request.base64_string);

    let written = state
        .scratch
        .write_named(name, &bytes)
        .await
        .map_err(write_failure)?;
    let data = written.read().await.map_err(write_failure)?;

    Ok(FileDownload {
        data,
        file_name: name.to_string(),
    })
}

fn write_failure(e: impl std::fmt::Display) -> AppError {
    error!(error = %e, "failed to write decoded file");
    AppError::Internal("Failed to write file.".to_string())
}

/// A file download response with an attachment disposition
#[derive(Debug)]
pub struct FileDownload {
    data: Vec<u8>,
    file_name: String,
}

impl IntoResponse for FileDownload {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [
                (
                    header::CONTENT_TYPE,
                    "application/octet-stream".to_string(),
                ),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", self.file_name),
                ),
            ],
            self.data,
        )
            .into_response()
    }
}

/// API error type; user-visible failures are plain text
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    PayloadTooLarge(String),
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, message).into_response()
    }
}
