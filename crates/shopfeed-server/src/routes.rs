//! HTTP surface: a single download route for the published export.

use std::path::PathBuf;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub published_path: PathBuf,
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/download", get(download))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Streams the currently published export back as an attachment.
///
/// Reads whatever file is published at request time; the export loop only
/// ever replaces that file by rename, so a read sees a complete export.
async fn download(State(state): State<AppState>) -> Response {
    match tokio::fs::read(&state.published_path).await {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"products.csv\"",
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            "no export has been published yet",
        )
            .into_response(),
        Err(e) => {
            tracing::error!(
                error = %e,
                path = %state.published_path.display(),
                "failed to read published export"
            );
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn download_serves_published_file_as_attachment() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("final_products.csv");
        std::fs::write(&path, "SKU|EAN\nS1|111\n").expect("write export");

        let app = build_app(AppState {
            published_path: path,
        });
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/csv; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"products.csv\""
        );

        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        assert_eq!(&body[..], b"SKU|EAN\nS1|111\n");
    }

    #[tokio::test]
    async fn download_returns_404_before_first_publish() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = build_app(AppState {
            published_path: dir.path().join("missing.csv"),
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = build_app(AppState {
            published_path: dir.path().join("final_products.csv"),
        });

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
