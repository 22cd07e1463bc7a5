//! Page shapes and the render function contract.

use std::sync::Arc;

use inkpost_content::Document;
use minijinja::{Value, context};

/// Fragment rendered in place of a detail page when the slug is unknown.
pub const NOT_FOUND_FRAGMENT: &str = "<h1>Post not found</h1>";

/// Input to a render function.
#[derive(Clone, Copy, Debug)]
pub enum Page<'a> {
    /// Home page listing every document.
    List {
        /// All loaded documents, in load order.
        documents: &'a [Document],
    },
    /// Single post page.
    Detail {
        /// The post to show.
        document: &'a Document,
    },
}

impl Page<'_> {
    /// Template context for this page.
    ///
    /// List pages expose `posts`, detail pages expose `post`.
    #[must_use]
    pub fn context(&self) -> Value {
        match self {
            Page::List { documents } => context! { posts => documents },
            Page::Detail { document } => context! { post => document },
        }
    }
}

/// Error returned when a resolved template fails to render.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The template engine reported an error.
    #[error("Template rendering failed: {0}")]
    Template(#[from] minijinja::Error),
}

/// Pure function from a page shape to an HTML fragment.
pub type RenderFn = Arc<dyn Fn(&Page<'_>) -> Result<String, RenderError> + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        Document {
            slug: "hello".to_owned(),
            title: "Hello".to_owned(),
            html: "<p>Hi</p>".to_owned(),
        }
    }

    #[test]
    fn test_list_context_exposes_posts() {
        let docs = vec![document()];
        let ctx = Page::List { documents: &docs }.context();

        let posts = ctx.get_attr("posts").unwrap();
        assert_eq!(posts.len(), Some(1));
    }

    #[test]
    fn test_detail_context_exposes_post() {
        let doc = document();
        let ctx = Page::Detail { document: &doc }.context();

        let post = ctx.get_attr("post").unwrap();
        assert_eq!(post.get_attr("slug").unwrap().as_str(), Some("hello"));
    }
}
