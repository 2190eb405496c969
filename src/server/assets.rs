use crate::server::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use log::error;
use std::io::ErrorKind;

pub async fn sitemap(State(state): State<AppState>) -> Response {
    serve_file(&state, "sitemap.xml", "application/xml").await
}

pub async fn robots(State(state): State<AppState>) -> Response {
    serve_file(&state, "robots.txt", "text/plain").await
}

/// Serve a file from the static directory with a fixed content type
async fn serve_file(state: &AppState, file_name: &str, content_type: &'static str) -> Response {
    let path = state.static_dir.join(file_name);

    match tokio::fs::read(&path).await {
        Ok(contents) => ([(header::CONTENT_TYPE, content_type)], contents).into_response(),
        Err(e) if e.kind() == ErrorKind::NotFound => StatusCode::NOT_FOUND.into_response(),
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
