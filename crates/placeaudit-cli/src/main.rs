//! placeaudit CLI - data-quality audit for scraped place listings.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            source,
            datasets_root,
            config,
            by_kind,
            json,
        } => commands::check::run(source, datasets_root, config, by_kind, json, cli.verbose),

        Commands::Prepare {
            run_id,
            datasets_dir,
            inputs_dir,
        } => commands::prepare::run(run_id, datasets_dir, inputs_dir, cli.verbose),

        Commands::Send {
            run_id,
            url,
            api_key,
            storage_dir,
        } => commands::send::run(run_id, url, api_key, storage_dir, cli.verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
