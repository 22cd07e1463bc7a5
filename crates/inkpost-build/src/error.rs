//! Error types for static site generation.

use std::path::PathBuf;

use inkpost_render::{RenderError, ResolveError, ShellError};

/// Error returned when generation aborts.
///
/// Pages written before the failure are left in place.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Template could not be resolved or the environment failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A page failed to render.
    #[error("Failed to render {url}: {source}")]
    Render {
        /// URL of the page.
        url: String,
        /// Underlying render error.
        #[source]
        source: RenderError,
    },

    /// Shell could not be read or has no insertion point.
    #[error(transparent)]
    Shell(#[from] ShellError),

    /// Output could not be written.
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        /// Path being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Shell state could not be encoded.
    #[error("Failed to encode shell state: {0}")]
    State(#[from] serde_json::Error),
}
