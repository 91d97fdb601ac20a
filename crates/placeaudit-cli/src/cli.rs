//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use placeaudit::input::DATASETS_ROOT;
use std::path::PathBuf;

/// placeaudit: data-quality audit for scraped place listings
#[derive(Parser)]
#[command(name = "placeaudit")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit a dataset and print a quality report
    Check {
        /// Dataset file, directory, or run id under the datasets root
        #[arg(value_name = "SOURCE")]
        source: Option<String>,

        /// Root that run ids resolve against
        #[arg(long, default_value = DATASETS_ROOT)]
        datasets_root: PathBuf,

        /// Audit configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Aggregate defects by kind instead of by exact description
        #[arg(long)]
        by_kind: bool,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build the scraper actor input for a run
    Prepare {
        /// Run id; settings are read from <DATASETS_DIR>/<RUN_ID>.json
        #[arg(value_name = "RUN_ID")]
        run_id: String,

        /// Directory holding run settings files
        #[arg(long, default_value = "datasets")]
        datasets_dir: PathBuf,

        /// Directory the actor inputs are written to
        #[arg(long, default_value = "inputs")]
        inputs_dir: PathBuf,
    },

    /// Post a run's records to a webhook in a single request
    Send {
        /// Run id; records are read from <STORAGE_DIR>/<RUN_ID>
        #[arg(value_name = "RUN_ID")]
        run_id: String,

        /// Webhook URL
        #[arg(long, env = "PLACEAUDIT_WEBHOOK_URL")]
        url: String,

        /// Webhook API key
        #[arg(long, env = "PLACEAUDIT_WEBHOOK_KEY", hide_env_values = true)]
        api_key: String,

        /// Root of the scraped datasets
        #[arg(long, default_value = DATASETS_ROOT)]
        storage_dir: PathBuf,
    },
}
