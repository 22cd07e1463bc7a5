//! Content directory loading.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::converter::{MarkupConverter, PulldownConverter};
use crate::document::Document;

/// File extension of markdown documents.
pub const MARKDOWN_EXTENSION: &str = ".md";

/// Loads documents from a content directory.
///
/// Only files directly inside the directory whose name ends in `.md` are
/// considered. Results follow directory enumeration order, which is
/// platform dependent and not sorted.
pub struct ContentStore {
    dir: PathBuf,
    converter: Box<dyn MarkupConverter>,
}

impl ContentStore {
    /// Create a store for `dir` using [`PulldownConverter`].
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            converter: Box::new(PulldownConverter::new()),
        }
    }

    /// Replace the markdown converter.
    #[must_use]
    pub fn with_converter(mut self, converter: impl MarkupConverter + 'static) -> Self {
        self.converter = Box::new(converter);
        self
    }

    /// Load every markdown document in the content directory.
    ///
    /// Never fails: if the directory cannot be read, a warning is logged and
    /// an empty list is returned. A file that cannot be read is skipped.
    #[must_use]
    pub fn load(&self) -> Vec<Document> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    dir = %self.dir.display(),
                    error = %e,
                    "Error loading posts"
                );
                return Vec::new();
            }
        };

        let mut documents = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(dir = %self.dir.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            let Some(slug) = name
                .strip_suffix(MARKDOWN_EXTENSION)
                .filter(|slug| !slug.is_empty())
            else {
                continue;
            };

            // Follows symlinks, unlike `DirEntry::file_type`.
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            match read_lossy(&path) {
                Ok(raw) => {
                    let html = self.converter.convert(&raw);
                    documents.push(Document::new(slug, &raw, html));
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Skipping unreadable post");
                }
            }
        }

        tracing::debug!(dir = %self.dir.display(), count = documents.len(), "Loaded posts");
        documents
    }

    /// Load documents into a shared, read-only snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<[Document]> {
        self.load().into()
    }
}

/// Read a file as text, replacing invalid UTF-8 sequences.
fn read_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Post is not valid UTF-8, decoding lossily");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}
