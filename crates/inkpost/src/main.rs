//! inkpost CLI - Markdown blog generator.
//!
//! Provides commands for:
//! - `serve`: Start the development server
//! - `prepare`: Resolve configuration and stage the page shell
//! - `generate`: Render the static site from the staged configuration
//! - `build`: `prepare` followed by `generate`
//! - `preview`: Serve the generated site

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, GenerateArgs, PrepareArgs, PreviewArgs, ServeArgs};
use error::CliError;
use output::Output;

/// Application version from Cargo.toml.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// inkpost - Markdown blog generator.
#[derive(Parser)]
#[command(name = "inkpost", version, about)]
struct Cli {
    /// Enable verbose output (info-level logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the development server.
    Serve(ServeArgs),
    /// Resolve configuration and stage the page shell in the output directory.
    Prepare(PrepareArgs),
    /// Generate the static site from the staged configuration.
    Generate(GenerateArgs),
    /// Run prepare and generate.
    Build(BuildArgs),
    /// Serve the generated site.
    Preview(PreviewArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Serve(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute(VERSION))),
        Commands::Preview(args) => tokio::runtime::Runtime::new()
            .map_err(CliError::from)
            .and_then(|rt| rt.block_on(args.execute())),
        Commands::Prepare(args) => args.execute(),
        Commands::Generate(args) => args.execute(),
        Commands::Build(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
