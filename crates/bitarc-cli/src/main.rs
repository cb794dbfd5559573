//! Bitarc CLI - validates compression settings against archive formats and
//! shows the property list the engine would receive.

mod cli;
mod commands;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Logs go to stderr so JSON on stdout stays parseable.
    if cli.verbose || std::env::var("RUST_LOG").is_ok() {
        let directive = if cli.verbose {
            "bitarc_core=debug"
        } else {
            "bitarc_core=warn"
        };
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive(directive.parse()?))
            .with_writer(std::io::stderr)
            .init();
    }

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match &cli.command {
        cli::Commands::Plan(args) => commands::plan::execute(args, &*formatter),
        cli::Commands::Formats => commands::formats::execute(&*formatter),
        cli::Commands::Completion(args) => {
            commands::completion::execute(args.shell);
            Ok(())
        }
    }
}
