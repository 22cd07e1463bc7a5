//! `inkpost generate` command implementation.
//!
//! Second phase of a static build. Reads configuration only from the side
//! channel written by `prepare`; `inkpost.toml` is not consulted.

use clap::Args;
use inkpost_build::{BatchGenerator, BuildReport, SHELL_STATE_FILE};
use inkpost_config::{ConfigChannel, SiteConfig};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the generate command.
#[derive(Args)]
pub(crate) struct GenerateArgs {
    /// Fail instead of using defaults when the side-channel file is missing or invalid.
    #[arg(long)]
    strict: bool,
}

impl GenerateArgs {
    /// Execute the generate command against the side channel in the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails, or in strict mode if the side
    /// channel cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let report = self.run(&ConfigChannel::in_current_dir(), &output)?;
        output.success(&format!("Generated {} pages", report.pages.len()));
        Ok(())
    }

    /// Restore configuration from `channel` and generate the site.
    pub(crate) fn run(&self, channel: &ConfigChannel, output: &Output) -> Result<BuildReport, CliError> {
        let site = if self.strict {
            channel.restore_strict()?
        } else {
            if !channel.path().is_file() {
                output.warning(&format!(
                    "{} not found, using default configuration",
                    channel.path().display()
                ));
            }
            channel.restore()
        };

        generate(site, channel)
    }
}

/// Run the batch generator for `site`, keeping shell state beside `channel`.
pub(crate) fn generate(site: SiteConfig, channel: &ConfigChannel) -> Result<BuildReport, CliError> {
    let generator = BatchGenerator::with_templates(site)
        .with_state_path(channel.path().with_file_name(SHELL_STATE_FILE));
    Ok(generator.generate()?)
}
