//! `inkpost prepare` command implementation.
//!
//! First phase of a static build: resolves configuration, hands it to the
//! generation phase through the side-channel file and stages the page shell
//! as `{out_dir}/index.html`.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use inkpost_config::{CliSettings, Config, ConfigChannel, SiteConfig};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the prepare command.
#[derive(Args)]
pub(crate) struct PrepareArgs {
    /// Path to configuration file (default: auto-discover inkpost.toml).
    #[arg(short, long, env = "INKPOST_CONFIG")]
    config: Option<PathBuf>,

    /// Markdown content directory (overrides config).
    #[arg(long)]
    content_dir: Option<PathBuf>,

    /// Output directory (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Page shell (overrides config).
    #[arg(long)]
    shell: Option<PathBuf>,
}

impl PrepareArgs {
    /// Execute the prepare command against the side channel in the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the shell cannot be staged.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        self.run(&ConfigChannel::in_current_dir(), &Output::new())?;
        Ok(())
    }

    /// Resolve configuration, persist it to `channel` and stage the shell.
    pub(crate) fn run(self, channel: &ConfigChannel, output: &Output) -> Result<SiteConfig, CliError> {
        let cli_settings = CliSettings {
            content_dir: self.content_dir,
            out_dir: self.out_dir,
            shell: self.shell,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        channel.persist(&config.site)?;
        output.info(&format!("Wrote {}", channel.path().display()));

        let staged = stage_shell(&config.shell_path, &config.site.out_dir)?;
        output.info(&format!("Staged page shell at {}", staged.display()));

        Ok(config.site)
    }
}

/// Copy the shell to `{out_dir}/index.html`.
fn stage_shell(shell: &Path, out_dir: &Path) -> Result<PathBuf, CliError> {
    fs::create_dir_all(out_dir)?;
    let target = out_dir.join("index.html");
    if is_same_file(shell, &target) {
        return Ok(target);
    }

    fs::copy(shell, &target).map_err(|source| CliError::ShellCopy {
        from: shell.to_path_buf(),
        to: target.clone(),
        source,
    })?;
    tracing::debug!(from = %shell.display(), to = %target.display(), "Copied page shell");
    Ok(target)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
