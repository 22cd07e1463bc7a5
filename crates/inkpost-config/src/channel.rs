//! Side-channel handoff of [`SiteConfig`] between build phases.
//!
//! The preparation phase and the generation phase run as separate processes.
//! The resolved site configuration is written to a fixed-name JSON file at the
//! end of preparation and read back at the start of generation. That file is
//! the only state shared between the two phases.

use std::path::{Path, PathBuf};

use crate::{ConfigError, SiteConfig};

/// Name of the side-channel file.
pub const CHANNEL_FILENAME: &str = ".inkpost.config.json";

/// Reads and writes the side-channel config file.
#[derive(Clone, Debug)]
pub struct ConfigChannel {
    path: PathBuf,
}

impl ConfigChannel {
    /// Channel whose file lives in `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(CHANNEL_FILENAME),
        }
    }

    /// Channel in the current working directory.
    #[must_use]
    pub fn in_current_dir() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }

    /// Path of the side-channel file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `site` to the side-channel file, replacing any previous content.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn persist(&self, site: &SiteConfig) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(site)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), "Persisted site config");
        Ok(())
    }

    /// Read the persisted config, falling back to [`SiteConfig::default`].
    ///
    /// A missing or unparseable file is not an error: a warning is logged
    /// and the defaults are returned.
    #[must_use]
    pub fn restore(&self) -> SiteConfig {
        match self.restore_strict() {
            Ok(site) => {
                tracing::info!(path = %self.path.display(), ?site, "Loaded config");
                site
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "No usable config found, using defaults"
                );
                SiteConfig::default()
            }
        }
    }

    /// Read the persisted config, reporting why it could not be read.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if the file is absent and
    /// `ConfigError::Json` if it cannot be parsed.
    pub fn restore_strict(&self) -> Result<SiteConfig, ConfigError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateRef;
    use pretty_assertions::assert_eq;

    fn custom_site() -> SiteConfig {
        SiteConfig {
            content_dir: PathBuf::from("/blog/posts"),
            list_template: TemplateRef::new("/blog/templates/list.html"),
            detail_template: TemplateRef::builtin("detail"),
            out_dir: PathBuf::from("/blog/public"),
        }
    }

    #[test]
    fn test_persist_then_restore() {
        let dir = tempfile::tempdir().unwrap();
        let channel = ConfigChannel::new(dir.path());

        channel.persist(&custom_site()).unwrap();

        assert_eq!(channel.restore(), custom_site());
    }

    #[test]
    fn test_persist_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let channel = ConfigChannel::new(dir.path());

        channel.persist(&custom_site()).unwrap();
        channel.persist(&SiteConfig::default()).unwrap();

        assert_eq!(channel.restore(), SiteConfig::default());
    }

    #[test]
    fn test_restore_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let channel = ConfigChannel::new(dir.path());

        channel.persist(&custom_site()).unwrap();
        std::fs::remove_file(channel.path()).unwrap();

        assert_eq!(channel.restore(), SiteConfig::default());
        assert!(matches!(
            channel.restore_strict(),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_restore_corrupt_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let channel = ConfigChannel::new(dir.path());
        std::fs::write(channel.path(), "{ not json").unwrap();

        assert_eq!(channel.restore(), SiteConfig::default());
        assert!(matches!(channel.restore_strict(), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_restore_partial_file_defaults_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let channel = ConfigChannel::new(dir.path());
        std::fs::write(channel.path(), r#"{ "outDir": "public" }"#).unwrap();

        let site = channel.restore();

        assert_eq!(site.out_dir, PathBuf::from("public"));
        assert_eq!(site.content_dir, SiteConfig::default().content_dir);
        assert_eq!(site.list_template, TemplateRef::builtin("list"));
    }

    #[test]
    fn test_persisted_shape() {
        let dir = tempfile::tempdir().unwrap();
        let channel = ConfigChannel::new(dir.path());
        channel.persist(&SiteConfig::default()).unwrap();

        let raw = std::fs::read_to_string(channel.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();

        assert_eq!(json["contentDir"], "src/content");
        assert_eq!(json["listTemplate"], "builtin:list");
        assert_eq!(json["detailTemplate"], "builtin:detail");
        assert_eq!(json["outDir"], "dist");
    }
}
