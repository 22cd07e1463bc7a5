//! Page rendering contract for inkpost.
//!
//! This crate provides:
//! - [`Page`]: the two page shapes (list and detail)
//! - [`RenderFn`]: a pure function turning a page into an HTML fragment
//! - [`TemplateResolver`], [`RenderEnvironment`], [`EnvironmentProvider`]:
//!   lazy resolution of template references inside a scoped environment
//! - [`TemplateEnvironment`]: the minijinja-backed implementation
//! - [`Shell`]: the outer HTML document fragments are spliced into
//! - [`Route`]: request path classification
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use inkpost_config::TemplateRef;
//! use inkpost_content::ContentStore;
//! use inkpost_render::{Page, TemplateEnvironmentProvider, TemplateResolver, with_environment};
//!
//! let documents = ContentStore::new("src/content").load();
//! let html: Result<String, Box<dyn std::error::Error>> =
//!     with_environment(&TemplateEnvironmentProvider, |env| {
//!         let render = env.resolve(&TemplateRef::builtin("list"))?;
//!         Ok(render(&Page::List { documents: &documents })?)
//!     });
//! # html?;
//! # Ok(())
//! # }
//! ```
//!
//! # Trusted content
//!
//! Document bodies are inserted into detail pages without sanitization.
//! This is only safe while the content directory is author-controlled.

mod environment;
mod jinja;
mod page;
mod route;
mod shell;

pub use environment::{
    EnvironmentProvider, RenderEnvironment, ResolveError, TemplateResolver, with_environment,
};
pub use jinja::{TemplateEnvironment, TemplateEnvironmentProvider};
pub use page::{NOT_FOUND_FRAGMENT, Page, RenderError, RenderFn};
pub use route::{POST_PREFIX, Route};
pub use shell::{
    APP_MARKER, GeneratorMetaTransform, IdentityTransform, Shell, ShellError, ShellTransform,
};

// Re-export for convenience
pub use inkpost_config::TemplateRef;
