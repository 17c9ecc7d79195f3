//! fwpkg - firmware update package builder CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fwpkg_cli::cmd;
use fwpkg_cli::ui::Output;
use fwpkg_cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let output = Output::new(cli.quiet);

    match cli.command {
        Commands::Build(args) => cmd::build::build(&args, &output),
        Commands::New { model, output_dir } => cmd::package::new(&model, &output_dir, &output),
        Commands::Check { path } => cmd::package::check(&path, &output),
        Commands::Md5 { files } => cmd::hash::hash(&files),
    }
}
