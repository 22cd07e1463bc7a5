//! Static file serving.
//!
//! Serves what the page renderer declines in development and the whole
//! generated site in preview.

use std::path::Path;

use tower_http::services::ServeDir;

/// Create the service that serves files below `dir`.
///
/// Missing files produce a plain 404.
pub(crate) fn static_service(dir: &Path) -> ServeDir {
    ServeDir::new(dir).append_index_html_on_directories(false)
}
