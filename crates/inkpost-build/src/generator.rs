//! Batch generator.

use std::fs;
use std::path::{Path, PathBuf};

use inkpost_config::SiteConfig;
use inkpost_content::{ContentStore, Document};
use inkpost_render::{
    EnvironmentProvider, POST_PREFIX, Page, RenderFn, Shell, ShellError,
    TemplateEnvironmentProvider, TemplateResolver, with_environment,
};
use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Name of the list page, which is also where the shell is read from.
const INDEX_FILE: &str = "index.html";

/// Directory below the output directory holding post pages.
const POST_DIR: &str = "post";

/// File remembering the shell used by the last run.
///
/// Kept next to the output directory by default so it is not published.
pub const SHELL_STATE_FILE: &str = ".inkpost-shell.json";

/// Files written by a successful run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Written pages, list page first, then posts in load order.
    pub pages: Vec<PathBuf>,
}

/// Shell used by the last run and the list page it produced.
#[derive(Debug, Serialize, Deserialize)]
struct ShellState {
    shell: String,
    index: String,
}

/// Renders the whole site once.
pub struct BatchGenerator<P = TemplateEnvironmentProvider> {
    site: SiteConfig,
    provider: P,
    state_path: PathBuf,
}

impl BatchGenerator {
    /// Create a generator using minijinja templates.
    #[must_use]
    pub fn with_templates(site: SiteConfig) -> Self {
        Self::new(site, TemplateEnvironmentProvider)
    }
}

impl<P: EnvironmentProvider> BatchGenerator<P> {
    /// Create a generator.
    ///
    /// Shell state is kept in [`SHELL_STATE_FILE`] in the parent of the
    /// output directory.
    #[must_use]
    pub fn new(site: SiteConfig, provider: P) -> Self {
        let state_path = default_state_path(&site.out_dir);
        Self {
            site,
            provider,
            state_path,
        }
    }

    /// Keep shell state at `path` instead.
    #[must_use]
    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = path.into();
        self
    }

    /// Generate every page.
    ///
    /// Documents are loaded first; a missing content directory yields a site
    /// with an empty list page. Rendering runs inside one environment that is
    /// released before this returns, whether or not generation succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] on the first template, shell or write failure.
    /// Pages already written stay on disk.
    pub fn generate(&self) -> Result<BuildReport, BuildError> {
        let documents = ContentStore::new(&self.site.content_dir).load();
        tracing::info!(
            count = documents.len(),
            content_dir = %self.site.content_dir.display(),
            "Loaded posts"
        );

        let report = with_environment(&self.provider, |env| self.render_all(env, &documents))?;

        tracing::info!(
            pages = report.pages.len(),
            out_dir = %self.site.out_dir.display(),
            "Generation complete"
        );
        Ok(report)
    }

    fn render_all(
        &self,
        env: &impl TemplateResolver,
        documents: &[Document],
    ) -> Result<BuildReport, BuildError> {
        let shell = self.read_shell()?;

        let post_dir = self.site.out_dir.join(POST_DIR);
        fs::create_dir_all(&post_dir).map_err(|source| BuildError::Io {
            path: post_dir.clone(),
            source,
        })?;

        let mut report = BuildReport::default();

        let list = env.resolve(&self.site.list_template)?;
        let index = self.site.out_dir.join(INDEX_FILE);
        let index_html = write_page(&shell, &list, &Page::List { documents }, "/", &index)?;
        self.save_state(&shell, index_html)?;
        report.pages.push(index);

        if documents.is_empty() {
            return Ok(report);
        }

        let detail = env.resolve(&self.site.detail_template)?;
        for document in documents {
            let url = format!("{POST_PREFIX}{}", document.slug);
            let path = post_dir.join(format!("{}.html", document.slug));
            write_page(&shell, &detail, &Page::Detail { document }, &url, &path)?;
            report.pages.push(path);
        }

        Ok(report)
    }

    /// Read the unfilled shell.
    ///
    /// `{out_dir}/index.html` is the shell while it has the insertion point.
    /// Without one it must be exactly the list page the last run wrote, in
    /// which case that run's shell is reused.
    fn read_shell(&self) -> Result<Shell, BuildError> {
        let index = self.site.out_dir.join(INDEX_FILE);
        let current = Shell::read(&index)?;
        if current.has_marker() {
            return Ok(current);
        }

        match self.load_state() {
            Some(state) if state.index == current.as_str() => {
                tracing::debug!(path = %self.state_path.display(), "Reusing shell from previous run");
                Ok(Shell::new(state.shell))
            }
            _ => Err(ShellError::MissingMarker.into()),
        }
    }

    fn load_state(&self) -> Option<ShellState> {
        let content = fs::read_to_string(&self.state_path).ok()?;
        match serde_json::from_str(&content) {
            Ok(state) => Some(state),
            Err(e) => {
                tracing::warn!(path = %self.state_path.display(), error = %e, "Ignoring invalid shell state");
                None
            }
        }
    }

    fn save_state(&self, shell: &Shell, index: String) -> Result<(), BuildError> {
        let state = ShellState {
            shell: shell.as_str().to_owned(),
            index,
        };
        write_file(&self.state_path, &serde_json::to_string(&state)?)
    }
}

/// Parent of `out_dir`, or the current directory.
fn default_state_path(out_dir: &Path) -> PathBuf {
    out_dir
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .join(SHELL_STATE_FILE)
}

/// Render one page, splice it into the shell and write it.
///
/// Returns the written HTML.
fn write_page(
    shell: &Shell,
    render: &RenderFn,
    page: &Page<'_>,
    url: &str,
    path: &Path,
) -> Result<String, BuildError> {
    let fragment = render(page).map_err(|source| BuildError::Render {
        url: url.to_owned(),
        source,
    })?;
    let html = shell.splice(&fragment)?;
    write_file(path, &html)?;
    tracing::info!(path = %path.display(), "Generated {url}");
    Ok(html)
}

fn write_file(path: &Path, contents: &str) -> Result<(), BuildError> {
    fs::write(path, contents).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })
}
