//! Request handling: GET-only static asset serving.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use tracing::{debug, warn};

use crate::content::ContentResolver;
use crate::mime::mime_for_path;

pub(crate) const NOT_FOUND_BODY: &str = "404 - Not Found";

pub(crate) struct AssetState {
    pub(crate) resolver: Arc<dyn ContentResolver>,
    pub(crate) content_root: String,
}

impl AssetState {
    fn full_path(&self, relative: &str) -> String {
        let root = self.content_root.trim_end_matches('/');
        if root.is_empty() {
            relative.to_string()
        } else {
            format!("{root}/{relative}")
        }
    }
}

/// Map a URL path to a content-relative asset path.
///
/// `/` is the bootstrap page. Returns `None` for paths that cannot name an
/// asset (bad escapes, `..` segments).
pub(crate) fn asset_path(url_path: &str) -> Option<String> {
    let decoded = urlencoding::decode(url_path).ok()?;
    let relative = decoded.trim_start_matches('/');
    if relative.is_empty() {
        return Some("index.html".into());
    }
    if relative.split(['/', '\\']).any(|segment| segment == "..") {
        return None;
    }
    Some(relative.to_string())
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        [(CONTENT_TYPE, HeaderValue::from_static("text/plain"))],
        NOT_FOUND_BODY,
    )
        .into_response()
}

pub(crate) async fn serve_asset(
    State(state): State<Arc<AssetState>>,
    method: Method,
    uri: Uri,
) -> Response {
    if method != Method::GET {
        debug!(%method, path = uri.path(), "method not allowed");
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let Some(relative) = asset_path(uri.path()) else {
        debug!(path = uri.path(), "unservable path");
        return not_found();
    };
    let full = state.full_path(&relative);

    if !state.resolver.exists(&full).await {
        debug!(path = %full, "asset not found");
        return not_found();
    }

    match state.resolver.read_all(&full).await {
        Ok(bytes) => {
            debug!(path = %full, len = bytes.len(), "serving asset");
            (
                StatusCode::OK,
                [
                    (CONTENT_TYPE, HeaderValue::from_static(mime_for_path(&relative))),
                    (CONTENT_LENGTH, HeaderValue::from(bytes.len())),
                ],
                bytes,
            )
                .into_response()
        }
        Err(e) if e.is_not_found() => not_found(),
        Err(e) => {
            warn!(path = %full, error = %e, "failed to read asset");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
