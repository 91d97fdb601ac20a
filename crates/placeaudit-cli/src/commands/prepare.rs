//! Prepare command - build the scraper actor input for a run.

use std::path::PathBuf;

use colored::Colorize;
use placeaudit::actor;

pub fn run(
    run_id: String,
    datasets_dir: PathBuf,
    inputs_dir: PathBuf,
    _verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{} {}",
        "Preparing input for".cyan().bold(),
        run_id.white()
    );

    let prepared = actor::prepare(&run_id, &datasets_dir, &inputs_dir)?;
    let input = &prepared.manifest.input;
    let stats = &prepared.manifest.stats;

    println!();
    println!("  Search terms:     {}", stats.search_terms);
    println!(
        "  Location:         {}",
        input.get("location").and_then(|v| v.as_str()).unwrap_or_default()
    );
    println!("  Max per search:   {}", stats.max_crawled_per_search);
    println!(
        "  Website only:     {}",
        input
            .get("onlyWithWebsite")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    );
    println!("  Estimated places: ~{}", stats.estimated_total_places);
    println!("  Estimated time:   ~{} min", stats.estimated_time_minutes);
    println!();

    println!(
        "{} {}",
        "Saved to".green().bold(),
        prepared.input_path.display().to_string().white()
    );
    println!(
        "{} {}",
        "Manifest".green().bold(),
        prepared.manifest_path.display().to_string().white()
    );

    Ok(())
}
