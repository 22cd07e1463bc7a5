//! Renderer state.
//!
//! Shared, read-only state for all requests. Built once at server start.

use std::path::PathBuf;
use std::sync::Arc;

use inkpost_config::SiteConfig;
use inkpost_content::Document;
use inkpost_render::{IdentityTransform, ShellTransform, TemplateEnvironmentProvider};

/// Per-request page renderer state.
///
/// Holds the document snapshot taken at startup. Documents added to the
/// content directory later are not visible until the server restarts.
pub struct DevRenderer<P = TemplateEnvironmentProvider> {
    /// Documents loaded at startup.
    pub(crate) documents: Arc<[Document]>,
    /// Template references and paths.
    pub(crate) site: SiteConfig,
    /// Page shell, read fresh on every request.
    pub(crate) shell_path: PathBuf,
    /// Creates one rendering environment per request.
    pub(crate) provider: P,
    /// Shell post-processing hook.
    pub(crate) transform: Box<dyn ShellTransform>,
}

impl DevRenderer {
    /// Create a renderer using minijinja templates and no shell transform.
    #[must_use]
    pub fn new(documents: Arc<[Document]>, site: SiteConfig, shell_path: PathBuf) -> Self {
        Self {
            documents,
            site,
            shell_path,
            provider: TemplateEnvironmentProvider,
            transform: Box::new(IdentityTransform),
        }
    }
}

impl<P> DevRenderer<P> {
    /// Replace the rendering environment provider.
    #[must_use]
    pub fn with_provider<Q>(self, provider: Q) -> DevRenderer<Q> {
        DevRenderer {
            documents: self.documents,
            site: self.site,
            shell_path: self.shell_path,
            provider,
            transform: self.transform,
        }
    }

    /// Replace the shell post-processing hook.
    #[must_use]
    pub fn with_transform(mut self, transform: impl ShellTransform + 'static) -> Self {
        self.transform = Box::new(transform);
        self
    }

    /// Find a document by exact slug.
    pub(crate) fn find(&self, slug: &str) -> Option<&Document> {
        self.documents.iter().find(|doc| doc.slug == slug)
    }
}
