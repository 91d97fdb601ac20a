//! Dataset loading from JSON files and directories.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use super::record::Record;
use crate::error::{AuditError, Result};

/// Dataset read when no source is given, relative to the datasets root.
pub const DEFAULT_DATASET: &str = "default";

/// Root under which run identifiers resolve to dataset directories.
pub const DATASETS_ROOT: &str = "storage/datasets";

/// The default dataset directory under `datasets_root`.
pub fn default_dataset(datasets_root: impl AsRef<Path>) -> PathBuf {
    datasets_root.as_ref().join(DEFAULT_DATASET)
}

/// A source file that was skipped because it could not be read.
#[derive(Debug, Clone)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub reason: String,
}

/// Records loaded from a source, plus the files that had to be skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub records: Vec<Record>,
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedSource>,
}

/// Loads place records from a JSON file or a directory of JSON files.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    exclude: Vec<String>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ignore directory entries with this file name.
    pub fn exclude(mut self, file_name: impl Into<String>) -> Self {
        self.exclude.push(file_name.into());
        self
    }

    /// Load a single file or every `*.json` file of a directory.
    ///
    /// Directory files are read in name order. A file that fails to parse is
    /// reported in [`LoadOutcome::skipped`] and the rest are still loaded; a
    /// single file that fails to parse is an error.
    pub fn load(&self, source: impl AsRef<Path>) -> Result<LoadOutcome> {
        let source = source.as_ref();
        if source.is_dir() {
            self.load_dir(source)
        } else if source.is_file() {
            let mut outcome = LoadOutcome::default();
            let value = read_json(source)?;
            push_records(&mut outcome, source, value);
            outcome.files.push(source.to_path_buf());
            Ok(outcome)
        } else {
            Err(AuditError::SourceNotFound(source.to_path_buf()))
        }
    }

    fn load_dir(&self, dir: &Path) -> Result<LoadOutcome> {
        let entries = std::fs::read_dir(dir).map_err(|e| AuditError::io(dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| AuditError::io(dir, e))?.path();
            let is_json = path.extension().is_some_and(|ext| ext == "json");
            let excluded = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| self.exclude.iter().any(|e| e == n));
            if is_json && !excluded && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        if files.is_empty() {
            return Err(AuditError::NoJsonFiles(dir.to_path_buf()));
        }

        let mut outcome = LoadOutcome::default();
        for path in files {
            match read_json(&path) {
                Ok(value) => {
                    push_records(&mut outcome, &path, value);
                    outcome.files.push(path);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "skipping unreadable dataset file");
                    outcome.skipped.push(SkippedSource {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        Ok(outcome)
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| AuditError::JsonAt {
        path: path.to_path_buf(),
        source: e,
    })
}

/// A document is either one record or an array of records.
fn push_records(outcome: &mut LoadOutcome, path: &Path, value: Value) {
    let before = outcome.records.len();
    match value {
        Value::Array(items) => {
            for (idx, item) in items.into_iter().enumerate() {
                match item {
                    Value::Object(map) => outcome.records.push(Record::from(map)),
                    other => warn!(
                        file = %path.display(),
                        index = idx,
                        kind = json_kind(&other),
                        "skipping non-object array entry"
                    ),
                }
            }
        }
        Value::Object(map) => outcome.records.push(Record::from(map)),
        other => warn!(
            file = %path.display(),
            kind = json_kind(&other),
            "skipping document that is neither an object nor an array"
        ),
    }
    debug!(
        file = %path.display(),
        records = outcome.records.len() - before,
        "loaded dataset file"
    );
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Resolve a command-line dataset argument.
///
/// An existing path is used as is. A bare identifier (no path separator) is
/// looked up as `<datasets_root>/<id>`. Anything else is not found.
pub fn resolve_source(arg: &str, datasets_root: impl AsRef<Path>) -> Result<PathBuf> {
    let path = PathBuf::from(arg);
    if path.exists() {
        return Ok(path);
    }

    if !arg.contains('/') && !arg.contains('\\') {
        let candidate = datasets_root.as_ref().join(arg);
        if candidate.exists() {
            return Ok(candidate);
        }
        return Err(AuditError::DatasetNotFound {
            path: candidate,
            run_id: arg.to_string(),
        });
    }

    Err(AuditError::SourceNotFound(path))
}
