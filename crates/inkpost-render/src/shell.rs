//! HTML page shell handling.
//!
//! A shell is the outer HTML document with exactly one insertion point,
//! [`APP_MARKER`]. Rendered fragments are spliced into it verbatim.

use std::path::{Path, PathBuf};

/// Insertion point a shell must contain.
pub const APP_MARKER: &str = r#"<div id="app"></div>"#;

/// Error returned when a shell cannot be read or filled in.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    /// Shell file could not be read.
    #[error("Failed to read page shell {}: {source}", path.display())]
    Io {
        /// Shell path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Shell does not contain the insertion marker.
    #[error("Page shell is missing the `<div id=\"app\"></div>` insertion point")]
    MissingMarker,
}

/// Outer HTML document a rendered fragment is spliced into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shell {
    html: String,
}

impl Shell {
    /// Wrap shell HTML.
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Read a shell from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::Io`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, ShellError> {
        std::fs::read_to_string(path)
            .map(Self::new)
            .map_err(|source| ShellError::Io {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Shell HTML.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.html
    }

    /// Whether the shell still contains an empty insertion point.
    #[must_use]
    pub fn has_marker(&self) -> bool {
        self.html.contains(APP_MARKER)
    }

    /// Apply `transform` for the page at `url`.
    ///
    /// # Errors
    ///
    /// Returns the transform's error.
    pub fn transform(self, url: &str, transform: &dyn ShellTransform) -> Result<Self, ShellError> {
        transform.transform(url, self.html).map(Self::new)
    }

    /// Insert `fragment` at the first insertion point.
    ///
    /// The fragment is inserted as-is, without escaping.
    ///
    /// # Errors
    ///
    /// Returns [`ShellError::MissingMarker`] if the shell has no insertion point.
    pub fn splice(&self, fragment: &str) -> Result<String, ShellError> {
        let Some(at) = self.html.find(APP_MARKER) else {
            return Err(ShellError::MissingMarker);
        };

        let mut out = String::with_capacity(self.html.len() + fragment.len());
        out.push_str(&self.html[..at]);
        out.push_str(r#"<div id="app">"#);
        out.push_str(fragment);
        out.push_str("</div>");
        out.push_str(&self.html[at + APP_MARKER.len()..]);
        Ok(out)
    }
}

/// Post-processing applied to the shell before a fragment is spliced in.
pub trait ShellTransform: Send + Sync {
    /// Transform `html` for the page served at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`ShellError`] if the transform cannot be applied.
    fn transform(&self, url: &str, html: String) -> Result<String, ShellError>;
}

/// Leaves the shell untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityTransform;

impl ShellTransform for IdentityTransform {
    fn transform(&self, _url: &str, html: String) -> Result<String, ShellError> {
        Ok(html)
    }
}

/// Adds a `generator` meta tag before `</head>`.
#[derive(Clone, Debug)]
pub struct GeneratorMetaTransform {
    tag: String,
}

impl GeneratorMetaTransform {
    /// Tag the shell with `generator` (e.g. `inkpost 0.1.0`).
    #[must_use]
    pub fn new(generator: &str) -> Self {
        Self {
            tag: format!(r#"<meta name="generator" content="{}">"#, escape_attr(generator)),
        }
    }
}

impl ShellTransform for GeneratorMetaTransform {
    fn transform(&self, _url: &str, html: String) -> Result<String, ShellError> {
        if html.contains(&self.tag) {
            return Ok(html);
        }
        match html.find("</head>") {
            Some(at) => {
                let mut out = String::with_capacity(html.len() + self.tag.len());
                out.push_str(&html[..at]);
                out.push_str(&self.tag);
                out.push_str(&html[at..]);
                Ok(out)
            }
            None => Ok(html),
        }
    }
}

/// Escape characters that would end an attribute value.
fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}
