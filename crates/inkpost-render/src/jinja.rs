//! minijinja-backed rendering environment.
//!
//! Templates are loaded on first use through a minijinja loader: builtin
//! references come from sources compiled into the binary, anything else is
//! read from disk. Nothing is loaded when the environment is created.

use std::io;
use std::path::Path;
use std::sync::Arc;

use inkpost_config::TemplateRef;
use minijinja::{AutoEscape, Environment, ErrorKind};

use crate::environment::{EnvironmentProvider, RenderEnvironment, ResolveError, TemplateResolver};
use crate::page::{Page, RenderFn};

/// Source of the builtin list template.
const LIST_TEMPLATE: &str = include_str!("templates/list.html");

/// Source of the builtin detail template.
const DETAIL_TEMPLATE: &str = include_str!("templates/detail.html");

/// Look up a compiled-in template by name.
fn builtin_source(name: &str) -> Option<&'static str> {
    match name {
        "list" => Some(LIST_TEMPLATE),
        "detail" => Some(DETAIL_TEMPLATE),
        _ => None,
    }
}

/// Load template source for a reference string.
fn load_template(name: &str) -> Result<Option<String>, minijinja::Error> {
    if let Some(builtin) = TemplateRef::new(name).builtin_name() {
        return Ok(builtin_source(builtin).map(str::to_owned));
    }

    match std::fs::read_to_string(Path::new(name)) {
        Ok(source) => {
            tracing::debug!(template = %name, "Loaded template");
            Ok(Some(source))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(
            minijinja::Error::new(ErrorKind::InvalidOperation, "failed to read template")
                .with_source(e),
        ),
    }
}

/// Escape HTML in builtin templates and in `.html`/`.htm` template files.
fn auto_escape(name: &str) -> AutoEscape {
    let is_html = TemplateRef::new(name).builtin_name().is_some()
        || Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));
    if is_html {
        AutoEscape::Html
    } else {
        AutoEscape::None
    }
}

/// Rendering environment holding a lazily populated template set.
pub struct TemplateEnvironment {
    env: Arc<Environment<'static>>,
    closed: bool,
}

impl TemplateEnvironment {
    /// Create an empty environment. No template is loaded yet.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_loader(load_template);
        env.set_auto_escape_callback(auto_escape);
        Self {
            env: Arc::new(env),
            closed: false,
        }
    }
}

impl Default for TemplateEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateResolver for TemplateEnvironment {
    fn resolve(&self, reference: &TemplateRef) -> Result<RenderFn, ResolveError> {
        // Loading happens here, the first time the reference is requested.
        if let Err(source) = self.env.get_template(reference.as_str()) {
            return Err(if source.kind() == ErrorKind::TemplateNotFound {
                ResolveError::NotFound(reference.clone())
            } else {
                ResolveError::Load {
                    reference: reference.clone(),
                    source,
                }
            });
        }

        let env = Arc::clone(&self.env);
        let name = reference.as_str().to_owned();
        Ok(Arc::new(move |page: &Page<'_>| {
            let template = env.get_template(&name)?;
            Ok(template.render(page.context())?)
        }))
    }
}

impl RenderEnvironment for TemplateEnvironment {
    fn close(mut self) -> Result<(), ResolveError> {
        self.closed = true;
        tracing::debug!("Closed rendering environment");
        Ok(())
    }
}

impl Drop for TemplateEnvironment {
    fn drop(&mut self) {
        if !self.closed {
            tracing::warn!("Rendering environment dropped without being closed");
        }
    }
}

/// Hands out a fresh [`TemplateEnvironment`] per request or build.
#[derive(Clone, Copy, Debug, Default)]
pub struct TemplateEnvironmentProvider;

impl EnvironmentProvider for TemplateEnvironmentProvider {
    type Environment = TemplateEnvironment;

    fn create(&self) -> Result<Self::Environment, ResolveError> {
        Ok(TemplateEnvironment::new())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use inkpost_content::Document;

    use super::*;
    use crate::environment::with_environment;

    fn hello() -> Document {
        Document {
            slug: "hello-world".to_owned(),
            title: "Hello World".to_owned(),
            html: "<p>Body <em>text</em></p>".to_owned(),
        }
    }

    #[test]
    fn test_builtin_list_renders_links() {
        let env = TemplateEnvironment::new();
        let render = env.resolve(&TemplateRef::builtin("list")).unwrap();
        let docs = vec![hello()];

        let html = render(&Page::List { documents: &docs }).unwrap();

        assert!(html.contains("href=\"/post/hello-world\""));
        assert!(html.contains(">Hello World</a>"));
        env.close().unwrap();
    }

    #[test]
    fn test_builtin_list_escapes_titles() {
        let env = TemplateEnvironment::new();
        let render = env.resolve(&TemplateRef::builtin("list")).unwrap();
        let docs = vec![Document {
            slug: "tags".to_owned(),
            title: "<b>Tags</b>".to_owned(),
            html: String::new(),
        }];

        let html = render(&Page::List { documents: &docs }).unwrap();

        assert!(html.contains("&lt;b&gt;Tags&lt;/b&gt;"));
        env.close().unwrap();
    }

    #[test]
    fn test_builtin_detail_inserts_raw_body() {
        let env = TemplateEnvironment::new();
        let render = env.resolve(&TemplateRef::builtin("detail")).unwrap();
        let doc = hello();

        let html = render(&Page::Detail { document: &doc }).unwrap();

        assert!(html.contains("<p>Body <em>text</em></p>"));
        assert!(html.contains("href=\"/\""));
        env.close().unwrap();
    }

    #[test]
    fn test_unknown_builtin_not_found() {
        let env = TemplateEnvironment::new();

        let err = env.resolve(&TemplateRef::builtin("archive")).err().unwrap();

        assert!(matches!(err, ResolveError::NotFound(_)));
        env.close().unwrap();
    }

    #[test]
    fn test_file_template_resolved_lazily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list.html");
        let reference = TemplateRef::new(path.to_string_lossy());

        // The environment exists before the template file does.
        let env = TemplateEnvironment::new();
        fs::write(&path, "{% for p in posts %}[{{ p.slug }}]{% endfor %}").unwrap();
        let render = env.resolve(&reference).unwrap();
        let docs = vec![hello()];

        assert_eq!(render(&Page::List { documents: &docs }).unwrap(), "[hello-world]");
        env.close().unwrap();
    }

    #[test]
    fn test_missing_file_template_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let reference = TemplateRef::new(dir.path().join("nope.html").to_string_lossy());
        let env = TemplateEnvironment::new();

        let err = env.resolve(&reference).err().unwrap();

        assert!(matches!(err, ResolveError::NotFound(_)));
        env.close().unwrap();
    }

    #[test]
    fn test_broken_file_template_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.html");
        fs::write(&path, "{% for p in posts %}unterminated").unwrap();
        let env = TemplateEnvironment::new();

        let err = env
            .resolve(&TemplateRef::new(path.to_string_lossy()))
            .err()
            .unwrap();

        assert!(matches!(err, ResolveError::Load { .. }));
        env.close().unwrap();
    }

    #[test]
    fn test_fresh_environment_sees_template_edits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("detail.html");
        let reference = TemplateRef::new(path.to_string_lossy());
        let doc = hello();
        let provider = TemplateEnvironmentProvider;

        fs::write(&path, "v1 {{ post.title }}").unwrap();
        let first: Result<String, ResolveError> = with_environment(&provider, |env| {
            let render = env.resolve(&reference)?;
            Ok(render(&Page::Detail { document: &doc }).unwrap())
        });

        fs::write(&path, "v2 {{ post.title }}").unwrap();
        let second: Result<String, ResolveError> = with_environment(&provider, |env| {
            let render = env.resolve(&reference)?;
            Ok(render(&Page::Detail { document: &doc }).unwrap())
        });

        assert_eq!(first.unwrap(), "v1 Hello World");
        assert_eq!(second.unwrap(), "v2 Hello World");
    }
}
