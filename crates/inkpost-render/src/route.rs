//! Request path classification.

/// URL prefix of post pages.
pub const POST_PREFIX: &str = "/post/";

/// Page a request path maps to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    /// Home page listing all posts.
    List,
    /// Single post page for the given slug.
    Detail(String),
    /// Not a page this renderer owns.
    Unmatched,
}

impl Route {
    /// Classify a request path.
    ///
    /// `/`, `/index.html` and `index.html` are the list page. Any path under
    /// `/post/` is a detail page whose slug is the remainder with a trailing
    /// `.html` removed. Everything else is unmatched.
    #[must_use]
    pub fn classify(path: &str) -> Self {
        if matches!(path, "/" | "/index.html" | "index.html") {
            return Self::List;
        }
        match path.strip_prefix(POST_PREFIX) {
            Some(rest) => {
                let slug = rest.strip_suffix(".html").unwrap_or(rest);
                Self::Detail(slug.to_owned())
            }
            None => Self::Unmatched,
        }
    }

    /// File a page is written to, relative to the output directory.
    #[must_use]
    pub fn output_path(&self) -> Option<String> {
        match self {
            Self::List => Some("index.html".to_owned()),
            Self::Detail(slug) => Some(format!("{}{slug}.html", POST_PREFIX.trim_start_matches('/'))),
            Self::Unmatched => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_list_paths() {
        assert_eq!(Route::classify("/"), Route::List);
        assert_eq!(Route::classify("/index.html"), Route::List);
        assert_eq!(Route::classify("index.html"), Route::List);
    }

    #[test]
    fn test_detail_paths() {
        assert_eq!(
            Route::classify("/post/hello-world"),
            Route::Detail("hello-world".to_owned())
        );
        assert_eq!(
            Route::classify("/post/hello-world.html"),
            Route::Detail("hello-world".to_owned())
        );
    }

    #[test]
    fn test_detail_strips_only_trailing_extension() {
        assert_eq!(
            Route::classify("/post/v1.html.html"),
            Route::Detail("v1.html".to_owned())
        );
        assert_eq!(
            Route::classify("/post/notes.txt"),
            Route::Detail("notes.txt".to_owned())
        );
    }

    #[test]
    fn test_empty_slug_is_detail() {
        assert_eq!(Route::classify("/post/"), Route::Detail(String::new()));
    }

    #[test]
    fn test_unmatched_paths() {
        for path in ["", "/post", "/posts/x", "/about", "/assets/app.css", "/index.htm"] {
            assert_eq!(Route::classify(path), Route::Unmatched, "path: {path}");
        }
    }

    #[test]
    fn test_classification_is_deterministic() {
        for path in ["/", "/post/a", "/x", "/post/b.html"] {
            assert_eq!(Route::classify(path), Route::classify(path));
        }
    }

    #[test]
    fn test_output_path() {
        assert_eq!(Route::List.output_path().as_deref(), Some("index.html"));
        assert_eq!(
            Route::Detail("a".to_owned()).output_path().as_deref(),
            Some("post/a.html")
        );
        assert_eq!(Route::classify("/post/a.html").output_path().as_deref(), Some("post/a.html"));
        assert_eq!(Route::Unmatched.output_path(), None);
    }
}
