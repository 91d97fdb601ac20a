//! Send command - post a run's records to a webhook.

use std::path::{Path, PathBuf};

use colored::Colorize;
use placeaudit::input::default_dataset;
use placeaudit::{Loader, WebhookClient};

/// Written by the scraper next to the dataset; not part of the records.
const RETRY_QUEUE_FILE: &str = "retry_queue.json";

/// `<storage_dir>/<run_id>`, else the default dataset under the same root.
fn dataset_for_run(storage_dir: &Path, run_id: &str) -> Result<PathBuf, String> {
    let dataset_dir = storage_dir.join(run_id);
    if dataset_dir.exists() {
        return Ok(dataset_dir);
    }
    let fallback = default_dataset(storage_dir);
    if !fallback.exists() {
        return Err(format!("Dataset not found: {}", dataset_dir.display()));
    }
    eprintln!(
        "{} {}",
        "⚠️  Using default dataset:".yellow(),
        fallback.display()
    );
    Ok(fallback)
}

pub fn run(
    run_id: String,
    url: String,
    api_key: String,
    storage_dir: PathBuf,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let dataset_dir = dataset_for_run(&storage_dir, &run_id)?;
    if verbose {
        eprintln!("{} {}", "Dataset".cyan().bold(), dataset_dir.display());
    }

    let outcome = Loader::new().exclude(RETRY_QUEUE_FILE).load(&dataset_dir)?;
    for skipped in &outcome.skipped {
        eprintln!(
            "{} {}: {}",
            "⚠️  Could not read".yellow(),
            skipped.path.display(),
            skipped.reason
        );
    }

    println!(
        "Sending {} record(s) in one request...",
        outcome.records.len().to_string().white().bold()
    );

    let client = WebhookClient::new(url, api_key)?;
    let delivery = client.send(&run_id, &outcome.records)?;

    println!(
        "{} HTTP {} ({:.1} KB)",
        "Sent".green().bold(),
        delivery.status,
        delivery.payload_bytes as f64 / 1024.0
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_dataset_preferred() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("run-7")).unwrap();
        std::fs::create_dir(root.path().join("default")).unwrap();

        let dir = dataset_for_run(root.path(), "run-7").unwrap();
        assert_eq!(dir, root.path().join("run-7"));
    }

    #[test]
    fn test_fallback_stays_under_storage_dir() {
        let root = TempDir::new().unwrap();
        std::fs::create_dir(root.path().join("default")).unwrap();

        let dir = dataset_for_run(root.path(), "run-8").unwrap();
        assert_eq!(dir, root.path().join("default"));
    }

    #[test]
    fn test_no_dataset_is_error() {
        let root = TempDir::new().unwrap();
        let err = dataset_for_run(root.path(), "run-9").unwrap_err();
        assert!(err.contains("run-9"));
    }
}
