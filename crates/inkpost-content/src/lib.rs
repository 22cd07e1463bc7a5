//! Markdown content loading for inkpost.
//!
//! This crate provides:
//! - [`Document`]: one parsed post (slug, title, rendered HTML)
//! - [`ContentStore`]: loads every markdown file of a content directory
//! - [`MarkupConverter`]: the markdown-to-HTML capability, with
//!   [`PulldownConverter`] as the default backend
//!
//! # Quick Start
//!
//! ```no_run
//! use inkpost_content::ContentStore;
//!
//! let store = ContentStore::new("src/content");
//! let documents = store.load();
//! for doc in &documents {
//!     println!("{} -> {}", doc.slug, doc.title);
//! }
//! ```
//!
//! # Trusted content
//!
//! Converted HTML is not sanitized. Raw HTML inside markdown passes through
//! verbatim and is later inserted into pages as-is. The content directory is
//! assumed to be author-controlled.

mod converter;
mod document;
mod store;

pub use converter::{MarkupConverter, PulldownConverter};
pub use document::{Document, UNTITLED, extract_title};
pub use store::{ContentStore, MARKDOWN_EXTENSION};
