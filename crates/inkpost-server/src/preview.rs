//! Preview of a generated site.
//!
//! Serves the output directory as-is. Page URLs are mapped onto the files the
//! batch generator writes, so `/post/{slug}` answers with `post/{slug}.html`.

use std::path::Path;

use axum::Router;
use axum::extract::Request;
use axum::http::Uri;
use inkpost_render::Route;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::security;
use crate::static_files;

/// Create the preview router serving files below `out_dir`.
pub(crate) fn create_preview_router(out_dir: &Path) -> Router {
    Router::new()
        .fallback_service(static_files::static_service(out_dir))
        .layer(axum::middleware::map_request(rewrite_page_path))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
}

/// Point page URLs at the generated file for that page.
async fn rewrite_page_path(mut request: Request) -> Request {
    let Some(file) = Route::classify(request.uri().path()).output_path() else {
        return request;
    };

    let mut target = format!("/{file}");
    if let Some(query) = request.uri().query() {
        target.push('?');
        target.push_str(query);
    }

    match target.parse::<Uri>() {
        Ok(uri) => *request.uri_mut() = uri,
        Err(e) => tracing::warn!(path = %request.uri().path(), error = %e, "Cannot map page path"),
    }
    request
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use super::*;

    fn setup() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("post")).unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("index.html"), "<p>list</p>").unwrap();
        fs::write(dir.path().join("post/hello.html"), "<p>hello</p>").unwrap();
        fs::write(dir.path().join("assets/app.css"), "body {}").unwrap();
        dir
    }

    async fn get(dir: &Path, uri: &str) -> (StatusCode, String) {
        let app = create_preview_router(dir);
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_list_page() {
        let dir = setup();

        for uri in ["/", "/index.html"] {
            let (status, body) = get(dir.path(), uri).await;
            assert_eq!(status, StatusCode::OK, "uri: {uri}");
            assert_eq!(body, "<p>list</p>", "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn test_post_page_without_extension() {
        let dir = setup();

        for uri in ["/post/hello", "/post/hello.html", "/post/hello?ref=feed"] {
            let (status, body) = get(dir.path(), uri).await;
            assert_eq!(status, StatusCode::OK, "uri: {uri}");
            assert_eq!(body, "<p>hello</p>", "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn test_missing_post_is_not_found() {
        let dir = setup();

        for uri in ["/post/missing", "/post/"] {
            let (status, _) = get(dir.path(), uri).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "uri: {uri}");
        }
    }

    #[tokio::test]
    async fn test_assets_served_unchanged() {
        let dir = setup();

        let (status, body) = get(dir.path(), "/assets/app.css").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body {}");

        let (status, _) = get(dir.path(), "/about").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_response_headers() {
        let dir = setup();
        let app = create_preview_router(dir.path());

        let response = app
            .oneshot(Request::get("/post/hello").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let headers = response.headers();
        assert!(headers[header::CONTENT_TYPE].to_str().unwrap().starts_with("text/html"));
        assert_eq!(headers["x-content-type-options"], "nosniff");
    }
}
