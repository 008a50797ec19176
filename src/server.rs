use crate::index::build_index;
use crate::parse::LOG_EXTENSION;
use crate::templates::render_page;
use axum::Router;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderValue, Method, StatusCode, Uri, header};
use axum::response::Response;
use percent_encoding::percent_decode_str;
use serde_json::Value as JsonValue;
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Immutable server configuration, fixed for the lifetime of the process.
#[derive(Clone, Debug)]
pub struct ServeConfig {
    pub log_dir: PathBuf,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServeConfig>,
}

/// Where a request path lands, with the resolved on-disk target for file
/// routes. Resolution keeps only the basename of the client-supplied path,
/// so traversal sequences never escape the log directory.
#[derive(Debug, Eq, PartialEq)]
pub enum Route {
    Index,
    Raw(PathBuf),
    Rendered(PathBuf),
}

pub fn route_request(log_dir: &Path, request_path: &str) -> Route {
    let decoded = percent_decode_str(request_path).decode_utf8_lossy();
    let trimmed = decoded.trim_start_matches('/');
    if trimmed.is_empty() {
        return Route::Index;
    }
    if trimmed.ends_with(LOG_EXTENSION) {
        return Route::Raw(log_dir.join(file_basename(trimmed)));
    }
    Route::Rendered(log_dir.join(format!("{}{LOG_EXTENSION}", file_basename(trimmed))))
}

fn file_basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

pub fn build_router(state: AppState) -> Router {
    // One fallback handler owns the whole path space; the priority rules in
    // `route_request` decide index vs. raw vs. rendered.
    Router::new().fallback(handle).with_state(state)
}

async fn handle(State(state): State<AppState>, method: Method, uri: Uri) -> Response {
    let path = uri.path().to_string();

    let response = if method != Method::GET {
        respond(
            StatusCode::METHOD_NOT_ALLOWED,
            b"Method not allowed".to_vec(),
            "text/plain",
        )
    } else {
        match route_request(&state.config.log_dir, &path) {
            Route::Index => serve_index(&state).await,
            Route::Raw(file_path) => serve_raw(file_path).await,
            Route::Rendered(file_path) => serve_rendered(file_path).await,
        }
    };

    log_event(
        "http.request",
        serde_json::json!({
            "method": method.as_str(),
            "path": path,
            "status": response.status().as_u16(),
        }),
    );

    response
}

async fn serve_index(state: &AppState) -> Response {
    let log_dir = state.config.log_dir.clone();
    let result = tokio::task::spawn_blocking(move || build_index(&log_dir))
        .await
        .map_err(io::Error::other)
        .and_then(|res| res);

    match result {
        Ok(page) => respond(StatusCode::OK, page.into_bytes(), "text/html"),
        Err(error) => internal_error(&error),
    }
}

async fn serve_raw(file_path: PathBuf) -> Response {
    match read_log_file(file_path).await {
        Ok(bytes) => respond(StatusCode::OK, bytes, "text/plain; charset=utf-8"),
        Err(error) if error.kind() == io::ErrorKind::NotFound => not_found(),
        Err(error) => internal_error(&error),
    }
}

async fn serve_rendered(file_path: PathBuf) -> Response {
    let title = file_path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();

    match read_log_file(file_path).await {
        Ok(bytes) => {
            let content = String::from_utf8_lossy(&bytes);
            let page = render_page(&title, &content);
            respond(StatusCode::OK, page.into_bytes(), "text/html")
        }
        Err(error) if error.kind() == io::ErrorKind::NotFound => not_found(),
        Err(error) => internal_error(&error),
    }
}

/// Reads a log file, requiring it to be a regular file. Anything else on
/// that path (directory, socket) reads as not-found.
async fn read_log_file(file_path: PathBuf) -> io::Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || {
        let meta = std::fs::metadata(&file_path)?;
        if !meta.is_file() {
            return Err(io::Error::from(io::ErrorKind::NotFound));
        }
        std::fs::read(&file_path)
    })
    .await
    .map_err(io::Error::other)?
}

fn not_found() -> Response {
    respond(StatusCode::NOT_FOUND, b"Not found".to_vec(), "text/plain")
}

fn internal_error(error: &io::Error) -> Response {
    log_event(
        "http.error",
        serde_json::json!({ "error": error.to_string() }),
    );
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        b"Internal server error".to_vec(),
        "text/plain",
    )
}

/// Every response, errors included, carries the permissive CORS header and
/// a Content-Length computed from the encoded byte length.
fn respond(status: StatusCode, body: Vec<u8>, content_type: &'static str) -> Response {
    let length = body.len();
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, HeaderValue::from_static(content_type))
        .header(header::CONTENT_LENGTH, length)
        .header(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        )
        .body(Body::from(body))
        .unwrap_or_else(|_| {
            let mut fallback = Response::new(Body::empty());
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}

fn log_event(event: &'static str, fields: JsonValue) {
    let line = serde_json::json!({
        "ts": now_iso(),
        "event": event,
        "fields": fields,
    });
    use std::io::Write as _;
    let mut out = std::io::stderr().lock();
    let _ = writeln!(out, "{line}");
    let _ = out.flush();
}

fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

pub async fn run_http_server_on(addr: SocketAddr, config: ServeConfig) -> Result<(), String> {
    let state = AppState {
        config: Arc::new(config),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|error| error.to_string())?;

    axum::serve(listener, app)
        .await
        .map_err(|error| error.to_string())
}
