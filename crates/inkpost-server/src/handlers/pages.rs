//! Page rendering middleware.
//!
//! Classifies the request path, renders the list or detail page, splices the
//! fragment into a freshly read shell and responds with HTML. Requests for
//! paths this renderer does not own are passed to the next handler untouched.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{Method, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use inkpost_render::{
    EnvironmentProvider, NOT_FOUND_FRAGMENT, Page, Route, Shell, ShellError, TemplateResolver,
    with_environment,
};

use crate::error::ServerError;
use crate::state::DevRenderer;

/// Page a request renders.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    List,
    Detail(String),
}

impl Target {
    /// Narrow a route to a page this renderer owns.
    fn from_route(route: Route) -> Option<Self> {
        match route {
            Route::List => Some(Self::List),
            Route::Detail(slug) => Some(Self::Detail(slug)),
            Route::Unmatched => None,
        }
    }
}

/// Render list and post pages; decline everything else.
pub(crate) async fn render_page<P>(
    State(renderer): State<Arc<DevRenderer<P>>>,
    request: Request,
    next: Next,
) -> Response
where
    P: EnvironmentProvider + 'static,
{
    if !matches!(*request.method(), Method::GET | Method::HEAD) {
        return next.run(request).await;
    }

    let path = request.uri().path().to_owned();
    let Some(target) = Target::from_route(Route::classify(&path)) else {
        return next.run(request).await;
    };

    match respond(renderer, target, &path).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(path = %path, error = %err, "Failed to render page");
            err.into_response()
        }
    }
}

/// Render the page for `target` and wrap it in the shell.
async fn respond<P>(
    renderer: Arc<DevRenderer<P>>,
    target: Target,
    url: &str,
) -> Result<Response, ServerError>
where
    P: EnvironmentProvider + 'static,
{
    // Templates are loaded from disk while rendering.
    let (status, fragment) = {
        let renderer = Arc::clone(&renderer);
        tokio::task::spawn_blocking(move || render_fragment(&renderer, &target)).await??
    };

    // Read on every request so shell edits apply without a restart.
    let shell = tokio::fs::read_to_string(&renderer.shell_path)
        .await
        .map(Shell::new)
        .map_err(|source| ShellError::Io {
            path: renderer.shell_path.clone(),
            source,
        })?;
    let html = shell
        .transform(url, renderer.transform.as_ref())?
        .splice(&fragment)?;

    Ok((
        status,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
        .into_response())
}

/// Render the HTML fragment for a page.
///
/// A missing post is a normal 404 page, not an error.
fn render_fragment<P>(
    renderer: &DevRenderer<P>,
    target: &Target,
) -> Result<(StatusCode, String), ServerError>
where
    P: EnvironmentProvider,
{
    match target {
        Target::List => with_environment(&renderer.provider, |env| {
            let render = env.resolve(&renderer.site.list_template)?;
            let fragment = render(&Page::List {
                documents: &renderer.documents,
            })?;
            Ok((StatusCode::OK, fragment))
        }),
        Target::Detail(slug) => match renderer.find(slug) {
            Some(document) => with_environment(&renderer.provider, |env| {
                let render = env.resolve(&renderer.site.detail_template)?;
                Ok((StatusCode::OK, render(&Page::Detail { document })?))
            }),
            None => Ok((StatusCode::NOT_FOUND, NOT_FOUND_FRAGMENT.to_owned())),
        },
    }
}
