//! Configuration management for inkpost.
//!
//! Parses `inkpost.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! The part of the configuration that crosses from the preparation phase to
//! the generation phase is [`SiteConfig`]. It is handed over through a
//! side-channel file managed by [`ConfigChannel`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `server.host`
//! - `content.dir`
//! - `templates.list`
//! - `templates.detail`
//! - `build.out_dir`
//! - `build.shell`

mod channel;
mod expand;

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use channel::{CHANNEL_FILENAME, ConfigChannel};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content directory.
    pub content_dir: Option<PathBuf>,
    /// Override output directory.
    pub out_dir: Option<PathBuf>,
    /// Override page shell path.
    pub shell: Option<PathBuf>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "inkpost.toml";

/// Prefix marking a template compiled into the binary.
const BUILTIN_PREFIX: &str = "builtin:";

/// Reference to a page template.
///
/// Either a compiled-in template (`builtin:list`, `builtin:detail`) or a path
/// to a template file. References are resolved lazily by the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateRef(String);

impl TemplateRef {
    /// Create a reference from its string form.
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    /// Reference to a compiled-in template.
    #[must_use]
    pub fn builtin(name: &str) -> Self {
        Self(format!("{BUILTIN_PREFIX}{name}"))
    }

    /// Reference string as written in configuration.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the compiled-in template, if this is a builtin reference.
    #[must_use]
    pub fn builtin_name(&self) -> Option<&str> {
        self.0.strip_prefix(BUILTIN_PREFIX)
    }

    /// Resolve a file reference against `base`. Builtin and absolute
    /// references are returned unchanged.
    #[must_use]
    pub fn resolve_against(&self, base: &Path) -> Self {
        if self.builtin_name().is_some() || Path::new(&self.0).is_absolute() {
            return self.clone();
        }
        Self(base.join(&self.0).to_string_lossy().into_owned())
    }
}

impl fmt::Display for TemplateRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Site configuration shared by the dev server and the batch generator.
///
/// This is what the preparation phase persists and the generation phase
/// restores. Fields missing from a persisted file take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Directory containing markdown documents.
    pub content_dir: PathBuf,
    /// Template for the list page.
    pub list_template: TemplateRef,
    /// Template for a single post page.
    pub detail_template: TemplateRef,
    /// Output directory for generated static files.
    pub out_dir: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("src/content"),
            list_template: TemplateRef::builtin("list"),
            detail_template: TemplateRef::builtin("detail"),
            out_dir: PathBuf::from("dist"),
        }
    }
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Content configuration (paths are relative strings from TOML).
    content: ContentConfigRaw,
    /// Template references as written in TOML.
    templates: TemplatesConfigRaw,
    /// Build configuration (paths are relative strings from TOML).
    build: BuildConfigRaw,

    /// Resolved site configuration (set after loading).
    #[serde(skip)]
    pub site: SiteConfig,
    /// Resolved path of the HTML page shell (set after loading).
    #[serde(skip)]
    pub shell_path: PathBuf,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5173,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    dir: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct TemplatesConfigRaw {
    list: Option<String>,
    detail: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct BuildConfigRaw {
    out_dir: Option<String>,
    shell: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Side-channel (de)serialization error.
    #[error("Side-channel config error: {0}")]
    Json(#[from] serde_json::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`build.out_dir`").
        field: String,
        /// Error message (e.g., "${`OUT_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `inkpost.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(content_dir) = &settings.content_dir {
            self.site.content_dir.clone_from(content_dir);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.site.out_dir.clone_from(out_dir);
        }
        if let Some(shell) = &settings.shell {
            self.shell_path.clone_from(shell);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let defaults = SiteConfig::default();
        Self {
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            templates: TemplatesConfigRaw::default(),
            build: BuildConfigRaw::default(),
            site: SiteConfig {
                content_dir: base.join(&defaults.content_dir),
                out_dir: base.join(&defaults.out_dir),
                ..defaults
            },
            shell_path: base.join("index.html"),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        // Empty strings would resolve to the config directory itself.
        config.validate_raw()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.server.host, "server.host")?;

        // Port 0 is technically valid (OS assigns a random port), but it's
        // unlikely to be intentional in a config file
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        require_non_empty(self.site.list_template.as_str(), "templates.list")?;
        require_non_empty(self.site.detail_template.as_str(), "templates.detail")?;
        Ok(())
    }

    /// Reject empty path and template values as written in the file.
    fn validate_raw(&self) -> Result<(), ConfigError> {
        let fields = [
            (&self.content.dir, "content.dir"),
            (&self.templates.list, "templates.list"),
            (&self.templates.detail, "templates.detail"),
            (&self.build.out_dir, "build.out_dir"),
            (&self.build.shell, "build.shell"),
        ];
        for (value, field) in fields {
            if let Some(value) = value {
                require_non_empty(value, field)?;
            }
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;

        let expand_opt = |value: &mut Option<String>, field: &str| -> Result<(), ConfigError> {
            if let Some(raw) = value.as_deref() {
                *value = Some(expand::expand_env(raw, field)?);
            }
            Ok(())
        };
        expand_opt(&mut self.content.dir, "content.dir")?;
        expand_opt(&mut self.templates.list, "templates.list")?;
        expand_opt(&mut self.templates.detail, "templates.detail")?;
        expand_opt(&mut self.build.out_dir, "build.out_dir")?;
        expand_opt(&mut self.build.shell, "build.shell")?;

        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = SiteConfig::default();
        let template = |raw: Option<&str>, default: TemplateRef| {
            raw.map_or(default, TemplateRef::new)
                .resolve_against(config_dir)
        };

        self.site = SiteConfig {
            content_dir: self
                .content
                .dir
                .as_deref()
                .map_or_else(|| config_dir.join(&defaults.content_dir), |d| config_dir.join(d)),
            list_template: template(self.templates.list.as_deref(), defaults.list_template),
            detail_template: template(self.templates.detail.as_deref(), defaults.detail_template),
            out_dir: self
                .build
                .out_dir
                .as_deref()
                .map_or_else(|| config_dir.join(&defaults.out_dir), |d| config_dir.join(d)),
        };
        self.shell_path = config_dir.join(self.build.shell.as_deref().unwrap_or("index.html"));
    }
}
