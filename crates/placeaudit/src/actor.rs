//! Scraper actor input preparation.
//!
//! A run settings file (`<datasets>/<run_id>.json`) is merged over
//! [`default_input`] into the actor's `INPUT.json`, next to a
//! `manifest.json` that records where the input came from and a rough size
//! estimate for the run.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{AuditError, Result};
use crate::input::is_filled_value;

/// Seconds the actor spends per place, on average.
const SECONDS_PER_PLACE: f64 = 0.65;

/// Defaults every actor input starts from.
pub fn default_input() -> Map<String, Value> {
    let value = json!({
        "maxCrawledPlacesPerSearch": 100,
        "language": "pt-BR",
        "onlyWithWebsite": false,
        "concurrency": 3,
        "userData": {}
    });
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Size estimate stored in the manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub search_terms: usize,
    pub max_crawled_per_search: u64,
    pub estimated_total_places: u64,
    pub estimated_time_minutes: u64,
}

impl RunStats {
    fn estimate(search_terms: usize, max_per_search: u64) -> Self {
        let total = search_terms as u64 * max_per_search;
        let minutes = total as f64 * SECONDS_PER_PLACE / 60.0;
        Self {
            search_terms,
            max_crawled_per_search: max_per_search,
            estimated_total_places: total,
            estimated_time_minutes: minutes.round_ties_even() as u64,
        }
    }
}

/// Provenance of a prepared input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub search_run_id: String,
    pub created_at: DateTime<Utc>,
    pub source: PathBuf,
    /// SHA-256 of the settings file.
    pub source_hash: String,
    pub stats: RunStats,
    pub input: Value,
}

/// Files written by [`prepare`].
#[derive(Debug, Clone)]
pub struct PreparedInput {
    pub input_path: PathBuf,
    pub manifest_path: PathBuf,
    pub manifest: Manifest,
}

/// Merge run settings over the defaults.
///
/// Settings keys override defaults; `userData` is merged key by key and
/// always carries `search_run_id`. `searchTerms` must be a non-empty array
/// and `location` must be filled.
pub fn build_input(run_id: &str, settings: &Map<String, Value>) -> Result<Map<String, Value>> {
    match settings.get("searchTerms") {
        Some(Value::Array(terms)) if !terms.is_empty() => {}
        Some(Value::Array(_)) | None | Some(Value::Null) => {
            return Err(AuditError::InvalidSettings(
                "missing required field: searchTerms".to_string(),
            ));
        }
        Some(_) => {
            return Err(AuditError::InvalidSettings(
                "searchTerms must be a non-empty list".to_string(),
            ));
        }
    }
    if !settings.get("location").is_some_and(is_given) {
        return Err(AuditError::InvalidSettings(
            "missing required field: location".to_string(),
        ));
    }

    let max_crawled = settings.get("maxCrawledPlacesPerSearch");
    if let Some(value) = max_crawled.filter(|v| v.as_u64().is_none()) {
        return Err(AuditError::InvalidSettings(format!(
            "maxCrawledPlacesPerSearch must be a non-negative integer, got {value}"
        )));
    }

    let mut input = default_input();
    for (key, value) in settings {
        input.insert(key.clone(), value.clone());
    }

    let mut user_data = match default_input().remove("userData") {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    if let Some(Value::Object(extra)) = settings.get("userData") {
        for (key, value) in extra {
            user_data.insert(key.clone(), value.clone());
        }
    }
    user_data.insert("search_run_id".to_string(), Value::from(run_id));
    input.insert("userData".to_string(), Value::Object(user_data));

    Ok(input)
}

/// Filled, and not `false` or zero.
fn is_given(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        other => is_filled_value(other),
    }
}

/// Read `<datasets_dir>/<run_id>.json` and write `INPUT.json` and
/// `manifest.json` under `<inputs_dir>/<run_id>/`.
pub fn prepare(
    run_id: &str,
    datasets_dir: impl AsRef<Path>,
    inputs_dir: impl AsRef<Path>,
) -> Result<PreparedInput> {
    let settings_path = datasets_dir.as_ref().join(format!("{run_id}.json"));
    if !settings_path.is_file() {
        return Err(AuditError::SourceNotFound(settings_path));
    }

    let bytes = std::fs::read(&settings_path).map_err(|e| AuditError::io(&settings_path, e))?;
    let settings: Value = serde_json::from_slice(&bytes).map_err(|e| AuditError::JsonAt {
        path: settings_path.clone(),
        source: e,
    })?;
    let Value::Object(settings) = settings else {
        return Err(AuditError::InvalidSettings(
            "run settings must be a JSON object".to_string(),
        ));
    };

    let input = build_input(run_id, &settings)?;

    let term_count = input
        .get("searchTerms")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    let max_per_search = input
        .get("maxCrawledPlacesPerSearch")
        .and_then(Value::as_u64)
        .unwrap_or(100);

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let source_hash = format!("sha256:{:x}", hasher.finalize());

    let source = std::fs::canonicalize(&settings_path).unwrap_or_else(|_| settings_path.clone());
    let manifest = Manifest {
        search_run_id: run_id.to_string(),
        created_at: Utc::now(),
        source,
        source_hash,
        stats: RunStats::estimate(term_count, max_per_search),
        input: Value::Object(input),
    };

    let out_dir = inputs_dir.as_ref().join(run_id);
    std::fs::create_dir_all(&out_dir).map_err(|e| AuditError::io(&out_dir, e))?;

    let input_path = out_dir.join("INPUT.json");
    let manifest_path = out_dir.join("manifest.json");
    write_pretty(&input_path, &manifest.input)?;
    write_pretty(&manifest_path, &manifest)?;
    debug!(run_id, input = %input_path.display(), "actor input written");

    Ok(PreparedInput {
        input_path,
        manifest_path,
        manifest,
    })
}

/// Four-space indented JSON, non-ASCII kept as is.
fn write_pretty<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    std::fs::write(path, buf).map_err(|e| AuditError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn settings(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("settings must be an object"),
        }
    }

    #[test]
    fn test_build_input_merges_defaults() {
        let input = build_input(
            "run-1",
            &settings(json!({
                "searchTerms": ["clínica estética", "dermatologista"],
                "location": "São Paulo, SP, BR",
                "onlyWithWebsite": true,
                "userData": {"campaign_id": "camp_001"}
            })),
        )
        .unwrap();

        assert_eq!(input["maxCrawledPlacesPerSearch"], 100);
        assert_eq!(input["language"], "pt-BR");
        assert_eq!(input["onlyWithWebsite"], true);
        assert_eq!(input["concurrency"], 3);
        assert_eq!(
            input["userData"],
            json!({"campaign_id": "camp_001", "search_run_id": "run-1"})
        );

        // Defaults keep their position; new keys follow.
        let keys: Vec<&str> = input.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "maxCrawledPlacesPerSearch",
                "language",
                "onlyWithWebsite",
                "concurrency",
                "userData",
                "searchTerms",
                "location",
            ]
        );
    }

    #[test]
    fn test_run_id_overrides_user_data() {
        let input = build_input(
            "run-2",
            &settings(json!({
                "searchTerms": ["a"],
                "location": "x",
                "userData": {"search_run_id": "spoofed"}
            })),
        )
        .unwrap();
        assert_eq!(input["userData"]["search_run_id"], "run-2");
    }

    #[test]
    fn test_required_fields() {
        let missing_terms = build_input("r", &settings(json!({"location": "x"})));
        assert!(matches!(missing_terms, Err(AuditError::InvalidSettings(_))));

        let empty_terms = build_input("r", &settings(json!({"searchTerms": [], "location": "x"})));
        assert!(matches!(empty_terms, Err(AuditError::InvalidSettings(_))));

        let scalar_terms =
            build_input("r", &settings(json!({"searchTerms": "a", "location": "x"})));
        assert!(matches!(scalar_terms, Err(AuditError::InvalidSettings(_))));

        let missing_location = build_input("r", &settings(json!({"searchTerms": ["a"]})));
        assert!(matches!(missing_location, Err(AuditError::InvalidSettings(_))));
    }

    #[test]
    fn test_estimate() {
        let stats = RunStats::estimate(2, 100);
        assert_eq!(stats.estimated_total_places, 200);
        // 200 * 0.65 / 60 = 2.17
        assert_eq!(stats.estimated_time_minutes, 2);

        // 600 * 0.65 / 60 = 6.5, halves go to even
        assert_eq!(RunStats::estimate(6, 100).estimated_time_minutes, 6);
        // 1800 * 0.65 / 60 = 19.5
        assert_eq!(RunStats::estimate(18, 100).estimated_time_minutes, 20);
    }

    #[test]
    fn test_falsy_location_rejected() {
        for location in [json!(0), json!(false), json!([]), json!({}), json!(""), json!(null)] {
            let result = build_input(
                "r",
                &settings(json!({"searchTerms": ["a"], "location": location})),
            );
            assert!(
                matches!(result, Err(AuditError::InvalidSettings(_))),
                "location {location} should be rejected"
            );
        }

        let coords = json!({"searchTerms": ["a"], "location": {"lat": -23.5, "lng": -46.6}});
        assert!(build_input("r", &settings(coords)).is_ok());
    }

    #[test]
    fn test_max_crawled_must_be_integer() {
        for max in [json!(50.5), json!("50"), json!(-1), json!(null)] {
            let result = build_input(
                "r",
                &settings(json!({
                    "searchTerms": ["a"],
                    "location": "x",
                    "maxCrawledPlacesPerSearch": max
                })),
            );
            assert!(
                matches!(result, Err(AuditError::InvalidSettings(_))),
                "maxCrawledPlacesPerSearch {max} should be rejected"
            );
        }

        let valid = json!({
            "searchTerms": ["a"],
            "location": "x",
            "maxCrawledPlacesPerSearch": 50
        });
        let input = build_input("r", &settings(valid)).unwrap();
        assert_eq!(input["maxCrawledPlacesPerSearch"], 50);
    }

    #[test]
    fn test_prepare_writes_files() {
        let root = TempDir::new().unwrap();
        let datasets = root.path().join("datasets");
        let inputs = root.path().join("inputs");
        std::fs::create_dir(&datasets).unwrap();
        std::fs::write(
            datasets.join("run-9.json"),
            r#"{"searchTerms": ["padaria"], "location": "Curitiba, PR, BR", "maxCrawledPlacesPerSearch": 40}"#,
        )
        .unwrap();

        let prepared = prepare("run-9", &datasets, &inputs).unwrap();
        assert!(prepared.input_path.ends_with("run-9/INPUT.json"));
        assert!(prepared.manifest.source_hash.starts_with("sha256:"));
        assert_eq!(prepared.manifest.stats.estimated_total_places, 40);

        let written = std::fs::read_to_string(&prepared.input_path).unwrap();
        assert!(written.contains("\n    \"maxCrawledPlacesPerSearch\": 40"));
        let parsed: Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["userData"]["search_run_id"], "run-9");

        let manifest: Value =
            serde_json::from_str(&std::fs::read_to_string(&prepared.manifest_path).unwrap())
                .unwrap();
        assert_eq!(manifest["searchRunId"], "run-9");
        assert_eq!(manifest["stats"]["searchTerms"], 1);
    }

    #[test]
    fn test_prepare_missing_settings() {
        let root = TempDir::new().unwrap();
        let err = prepare("nope", root.path(), root.path()).unwrap_err();
        assert!(matches!(err, AuditError::SourceNotFound(_)));
    }
}
