//! Main auditor struct and public API.

use std::path::Path;

use tracing::debug;

use crate::config::AuditConfig;
use crate::error::Result;
use crate::input::{LoadOutcome, Loader, Record};
use crate::report::Report;
use crate::validation::{DefectKind, RecordValidator};

/// Result of auditing a dataset on disk.
#[derive(Debug, Clone)]
pub struct AuditOutcome {
    /// Loaded records, files read and files skipped.
    pub load: LoadOutcome,
    pub report: Report,
}

/// Loads datasets and audits them against one configuration.
pub struct Auditor {
    config: AuditConfig,
    validator: RecordValidator,
    loader: Loader,
}

impl Auditor {
    /// Auditor with the default rule set.
    pub fn new() -> Result<Self> {
        Self::with_config(AuditConfig::default())
    }

    /// Auditor with a custom configuration.
    pub fn with_config(config: AuditConfig) -> Result<Self> {
        config.check()?;
        let validator = RecordValidator::new(&config)?;
        Ok(Self {
            config,
            validator,
            loader: Loader::new(),
        })
    }

    /// Use a custom loader (e.g. with excluded file names).
    pub fn with_loader(mut self, loader: Loader) -> Self {
        self.loader = loader;
        self
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Defects of a single record.
    pub fn validate(&self, record: &Record) -> Vec<DefectKind> {
        self.validator.validate(record)
    }

    /// Report over records already in memory.
    pub fn audit_records(&self, records: &[Record]) -> Result<Report> {
        Report::build_with(records, &self.config, &self.validator)
    }

    /// Load a file or directory and report over its records.
    pub fn audit(&self, source: impl AsRef<Path>) -> Result<AuditOutcome> {
        let source = source.as_ref();
        let load = self.loader.load(source)?;
        debug!(
            source = %source.display(),
            records = load.records.len(),
            files = load.files.len(),
            skipped = load.skipped.len(),
            "dataset loaded"
        );
        let report = self.audit_records(&load.records)?;
        Ok(AuditOutcome { load, report })
    }
}
