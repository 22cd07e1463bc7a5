//! Router construction.
//!
//! Builds the axum router: the page renderer runs as middleware in front of
//! the static file service, so it sees every request first and passes on the
//! ones it does not own.

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use inkpost_render::EnvironmentProvider;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::security;
use crate::state::DevRenderer;
use crate::static_files;

/// Create the application router.
///
/// # Arguments
///
/// * `renderer` - Shared page renderer state
/// * `static_dir` - Directory serving everything the renderer declines
pub(crate) fn create_router<P>(renderer: Arc<DevRenderer<P>>, static_dir: &Path) -> Router
where
    P: EnvironmentProvider + 'static,
{
    Router::new()
        .fallback_service(static_files::static_service(static_dir))
        .layer(axum::middleware::from_fn_with_state(
            renderer,
            handlers::pages::render_page::<P>,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
}
