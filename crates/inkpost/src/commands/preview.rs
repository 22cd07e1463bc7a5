//! `inkpost preview` command implementation.

use std::path::PathBuf;

use clap::Args;
use inkpost_config::{CliSettings, Config};
use inkpost_server::{preview_config_from_config, run_preview};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the preview command.
#[derive(Args)]
pub(crate) struct PreviewArgs {
    /// Path to configuration file (default: auto-discover inkpost.toml).
    #[arg(short, long, env = "INKPOST_CONFIG")]
    config: Option<PathBuf>,

    /// Output directory to serve (overrides config).
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (default: 4173).
    #[arg(short, long)]
    port: Option<u16>,
}

impl PreviewArgs {
    /// Execute the preview command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            out_dir: self.out_dir,
            ..Default::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let preview_config = preview_config_from_config(&config, self.port);

        output.info(&format!(
            "Previewing {} on http://{}:{}",
            preview_config.out_dir.display(),
            preview_config.host,
            preview_config.port
        ));

        run_preview(preview_config)
            .await
            .map_err(|e| CliError::Server(e.to_string()))?;

        Ok(())
    }
}
