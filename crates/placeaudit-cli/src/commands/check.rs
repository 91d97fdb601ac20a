//! Check command - audit a dataset and print the quality report.

use std::path::PathBuf;

use colored::Colorize;
use placeaudit::input::{default_dataset, resolve_source};
use placeaudit::{AuditConfig, AuditError, Auditor, DefectGranularity};

pub fn run(
    source: Option<String>,
    datasets_root: PathBuf,
    config: Option<PathBuf>,
    by_kind: bool,
    json_output: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = match source {
        Some(arg) => resolve_source(&arg, &datasets_root)?,
        None => default_dataset(&datasets_root),
    };

    let mut audit_config = match config {
        Some(path) => AuditConfig::from_file(path)?,
        None => AuditConfig::default(),
    };
    if by_kind {
        audit_config = audit_config.with_granularity(DefectGranularity::Kind);
    }

    if verbose {
        eprintln!(
            "{} {}",
            "Auditing".cyan().bold(),
            source.display().to_string().white()
        );
    }

    let auditor = Auditor::with_config(audit_config)?;
    let outcome = match auditor.audit(&source) {
        Ok(outcome) => outcome,
        Err(AuditError::EmptyData(_)) => {
            println!("{}", "⚠️  No records found.".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for skipped in &outcome.load.skipped {
        eprintln!(
            "{} {}: {}",
            "⚠️  Could not read".yellow(),
            skipped.path.display(),
            skipped.reason
        );
    }

    if json_output {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        print!("{}", outcome.report);
        println!();
    }

    Ok(())
}
