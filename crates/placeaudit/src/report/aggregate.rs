//! Dataset-level statistics built from per-record defects.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{AuditConfig, DefectGranularity};
use crate::error::{AuditError, Result};
use crate::input::Record;
use crate::validation::{DefectKind, RecordValidator};

/// Example descriptions kept per row when aggregating by kind.
const MAX_EXAMPLES: usize = 3;

/// Fill statistics for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFill {
    pub field: String,
    pub filled: usize,
    pub null: usize,
    /// Fraction of records with the field filled (0.0-1.0).
    pub rate: f64,
    pub important: bool,
    /// Important field under the sparse threshold.
    pub sparse: bool,
}

/// One row of the defect frequency table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectCount {
    pub description: String,
    pub count: usize,
    /// Distinct value-level descriptions, filled only when aggregating by kind.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub examples: Vec<String>,
}

/// Number of records per search term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermCount {
    pub term: String,
    pub count: usize,
}

/// A record with at least one defect, kept for inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemRecord {
    /// Position of the record in the input.
    pub index: usize,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub defects: Vec<String>,
}

/// Clean/defective totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub clean: usize,
    pub defective: usize,
}

/// Data-quality report for one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub total: usize,
    pub fields: Vec<FieldFill>,
    pub granularity: DefectGranularity,
    /// Sorted by descending count; ties keep first-seen order.
    pub defects: Vec<DefectCount>,
    /// Sorted by descending count; ties keep first-seen order.
    pub search_terms: Vec<TermCount>,
    /// The first problem records, in input order.
    pub samples: Vec<ProblemRecord>,
    pub summary: Summary,
}

impl Report {
    /// Audit `records` with a validator built from `config`.
    pub fn build(records: &[Record], config: &AuditConfig) -> Result<Self> {
        let validator = RecordValidator::new(config)?;
        Self::build_with(records, config, &validator)
    }

    /// Audit `records` with an existing validator.
    ///
    /// Fails with [`AuditError::EmptyData`] when there is nothing to audit.
    pub fn build_with(
        records: &[Record],
        config: &AuditConfig,
        validator: &RecordValidator,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(AuditError::EmptyData("no records".to_string()));
        }
        let total = records.len();

        let fields = fill_rates(records, config);
        debug!(fields = fields.len(), "fill-rate pass done");

        let (defects, samples, defective) = defect_table(records, config, validator);
        debug!(distinct = defects.len(), defective, "defect pass done");

        let search_terms = term_distribution(records, config);
        debug!(terms = search_terms.len(), "grouping pass done");

        Ok(Self {
            total,
            fields,
            granularity: config.granularity,
            defects,
            search_terms,
            samples,
            summary: Summary {
                total,
                clean: total - defective,
                defective,
            },
        })
    }

    /// Whether no record had a defect.
    pub fn is_clean(&self) -> bool {
        self.defects.is_empty()
    }

    /// Fill statistics of one field.
    pub fn field(&self, name: &str) -> Option<&FieldFill> {
        self.fields.iter().find(|f| f.field == name)
    }
}

fn fill_rates(records: &[Record], config: &AuditConfig) -> Vec<FieldFill> {
    let total = records.len();
    config
        .fields
        .iter()
        .map(|field| {
            let filled = records.iter().filter(|r| r.is_filled(field)).count();
            let rate = if total == 0 {
                0.0
            } else {
                filled as f64 / total as f64
            };
            let important = config.is_important(field);
            FieldFill {
                field: field.clone(),
                filled,
                null: total - filled,
                rate,
                important,
                sparse: important && rate < config.sparse_threshold,
            }
        })
        .collect()
}

fn defect_table(
    records: &[Record],
    config: &AuditConfig,
    validator: &RecordValidator,
) -> (Vec<DefectCount>, Vec<ProblemRecord>, usize) {
    let mut counts: IndexMap<String, DefectCount> = IndexMap::new();
    let mut samples = Vec::new();
    let mut defective = 0;

    for (index, record) in records.iter().enumerate() {
        let kinds = validator.validate(record);
        if kinds.is_empty() {
            continue;
        }
        defective += 1;

        let descriptions: Vec<String> = kinds.iter().map(ToString::to_string).collect();
        for (kind, description) in kinds.iter().zip(&descriptions) {
            tally(&mut counts, config.granularity, kind, description);
        }

        if samples.len() < config.sample_size {
            samples.push(ProblemRecord {
                index,
                label: identity_label(record),
                url: record
                    .text("google_maps_url")
                    .map(|u| u.chars().take(config.sample_url_limit).collect()),
                defects: descriptions,
            });
        }
    }

    let mut defects: Vec<DefectCount> = counts.into_values().collect();
    // Stable sort: equal counts stay in first-seen order.
    defects.sort_by(|a, b| b.count.cmp(&a.count));

    (defects, samples, defective)
}

fn tally(
    counts: &mut IndexMap<String, DefectCount>,
    granularity: DefectGranularity,
    kind: &DefectKind,
    description: &str,
) {
    let key = match granularity {
        DefectGranularity::Value => description,
        DefectGranularity::Kind => kind.label(),
    };
    let row = counts.entry(key.to_string()).or_insert_with(|| DefectCount {
        description: key.to_string(),
        count: 0,
        examples: Vec::new(),
    });
    row.count += 1;

    if granularity == DefectGranularity::Kind
        && kind.echoes_value()
        && row.examples.len() < MAX_EXAMPLES
        && !row.examples.iter().any(|e| e == description)
    {
        row.examples.push(description.to_string());
    }
}

fn term_distribution(records: &[Record], config: &AuditConfig) -> Vec<TermCount> {
    let mut terms: IndexMap<String, usize> = IndexMap::new();
    for record in records {
        let term = record
            .text("search_term")
            .unwrap_or_else(|| config.missing_term_label.clone());
        *terms.entry(term).or_insert(0) += 1;
    }

    let mut terms: Vec<TermCount> = terms
        .into_iter()
        .map(|(term, count)| TermCount { term, count })
        .collect();
    terms.sort_by(|a, b| b.count.cmp(&a.count));
    terms
}

/// Best identity of a record: its name, else its place id, else `?`.
fn identity_label(record: &Record) -> String {
    ["name", "place_id", "cid"]
        .iter()
        .find_map(|field| record.text(field))
        .unwrap_or_else(|| "?".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    fn clean(name: &str, term: &str) -> Record {
        record(json!({
            "name": name,
            "rating": 4.2,
            "reviews_count": 10,
            "search_term": term
        }))
    }

    #[test]
    fn test_empty_input_is_error() {
        let err = Report::build(&[], &AuditConfig::default()).unwrap_err();
        assert!(matches!(err, AuditError::EmptyData(_)));
    }

    #[test]
    fn test_all_clean() {
        let records = vec![clean("A", "x"), clean("B", "x"), clean("C", "y")];
        let report = Report::build(&records, &AuditConfig::default()).unwrap();

        assert!(report.is_clean());
        assert!(report.samples.is_empty());
        assert_eq!(report.summary, Summary { total: 3, clean: 3, defective: 0 });
    }

    #[test]
    fn test_missing_names_collapse_into_one_row() {
        let records: Vec<Record> = (0..4).map(|_| record(json!({"search_term": "x"}))).collect();
        let report = Report::build(&records, &AuditConfig::default()).unwrap();

        let name = report.field("name").unwrap();
        assert_eq!(name.filled, 0);
        assert_eq!(name.rate, 0.0);
        assert!(name.sparse);

        assert_eq!(report.defects.len(), 1);
        assert_eq!(report.defects[0].description, "name is empty");
        assert_eq!(report.defects[0].count, 4);
        assert_eq!(report.summary.defective, 4);
    }

    #[test]
    fn test_sparse_marker_only_for_important_fields() {
        let records = vec![clean("A", "x"), clean("B", "x")];
        let report = Report::build(&records, &AuditConfig::default()).unwrap();

        assert!(report.field("phone").unwrap().sparse);
        let cid = report.field("cid").unwrap();
        assert_eq!(cid.filled, 0);
        assert!(!cid.sparse);
        assert!(!report.field("name").unwrap().sparse);
    }

    #[test]
    fn test_half_filled_is_not_sparse() {
        let records = vec![
            clean("A", "x").with("phone", "+5511987654321"),
            clean("B", "x"),
        ];
        let report = Report::build(&records, &AuditConfig::default()).unwrap();
        assert!(!report.field("phone").unwrap().sparse);
    }

    #[test]
    fn test_defect_ties_keep_first_seen_order() {
        let records = vec![
            clean("A", "x").with("website", "www.a.com"),
            clean("B", "x").with("phone", "123"),
            clean("C", "x").with("phone", "123"),
            clean("D", "x").with("postal_code", "1"),
            clean("E", "x").with("website", "www.a.com"),
        ];
        let report = Report::build(&records, &AuditConfig::default()).unwrap();

        let rows: Vec<(&str, usize)> = report
            .defects
            .iter()
            .map(|d| (d.description.as_str(), d.count))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("website without protocol: 'www.a.com'", 2),
                ("phone outside expected format: '123'", 2),
                ("postal_code outside expected pattern: '1'", 1),
            ]
        );
    }

    #[test]
    fn test_distinct_values_are_distinct_rows() {
        let records = vec![
            clean("A", "x").with("phone", "123"),
            clean("B", "x").with("phone", "456"),
        ];
        let report = Report::build(&records, &AuditConfig::default()).unwrap();
        assert_eq!(report.defects.len(), 2);
    }

    #[test]
    fn test_kind_granularity_groups_values() {
        let records = vec![
            clean("A", "x").with("phone", "123"),
            clean("B", "x").with("phone", "456"),
            clean("C", "x").with("phone", "123"),
        ];
        let config = AuditConfig::default().with_granularity(DefectGranularity::Kind);
        let report = Report::build(&records, &config).unwrap();

        assert_eq!(report.defects.len(), 1);
        assert_eq!(report.defects[0].description, "phone outside expected format");
        assert_eq!(report.defects[0].count, 3);
        assert_eq!(
            report.defects[0].examples,
            vec![
                "phone outside expected format: '123'",
                "phone outside expected format: '456'",
            ]
        );
    }

    #[test]
    fn test_term_distribution() {
        let records = vec![
            clean("A", "a"),
            clean("B", "b"),
            clean("C", "a"),
            record(json!({"name": "D", "rating": 4.0, "reviews_count": 1})),
        ];
        let report = Report::build(&records, &AuditConfig::default()).unwrap();

        assert_eq!(
            report.search_terms,
            vec![
                TermCount { term: "a".into(), count: 2 },
                TermCount { term: "b".into(), count: 1 },
                TermCount { term: "(no term)".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_samples_capped_and_ordered() {
        let records: Vec<Record> = (0..15)
            .map(|i| clean(&format!("P{i}"), "x").with("website", "www.x.com"))
            .collect();
        let report = Report::build(&records, &AuditConfig::default()).unwrap();

        assert_eq!(report.summary.defective, 15);
        assert_eq!(report.samples.len(), 10);
        assert_eq!(report.samples[0].label, "P0");
        assert_eq!(report.samples[9].index, 9);
    }

    #[test]
    fn test_sample_identity_and_url() {
        let long_url = format!("https://www.google.com/maps/place/{}", "z".repeat(100));
        let records = vec![record(json!({
            "place_id": "ChIJ123",
            "google_maps_url": long_url,
        }))];
        let report = Report::build(&records, &AuditConfig::default()).unwrap();

        let sample = &report.samples[0];
        assert_eq!(sample.label, "ChIJ123");
        assert_eq!(sample.url.as_ref().unwrap().chars().count(), 60);
        assert_eq!(sample.defects, vec!["name is empty"]);
    }
}
