//! `inkpost build` command implementation.
//!
//! Runs both phases of a static build: `prepare`, then `generate` with the
//! configuration read back from the side channel.

use clap::Args;
use inkpost_config::ConfigChannel;

use super::generate::generate;
use super::prepare::PrepareArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    prepare: PrepareArgs,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if either phase fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let channel = ConfigChannel::in_current_dir();

        let site = self.prepare.run(&channel, &output)?;
        let report = generate(channel.restore_strict()?, &channel)?;

        output.success(&format!(
            "Generated {} pages in {}",
            report.pages.len(),
            site.out_dir.display()
        ));
        Ok(())
    }
}
