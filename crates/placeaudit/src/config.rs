//! Audit configuration.
//!
//! Every literal the rules and the report depend on lives here, so a dataset
//! from another country can be audited by loading a different configuration
//! file instead of changing code. [`AuditConfig::default`] is the Brazilian
//! rule set.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};

/// Recognized record fields, in report order.
pub const DEFAULT_FIELDS: &[&str] = &[
    "name",
    "rating",
    "reviews_count",
    "phone",
    "website",
    "whatsapp",
    "full_address",
    "street",
    "city",
    "state",
    "postal_code",
    "country_code",
    "latitude",
    "longitude",
    "place_id",
    "cid",
    "knowledge_graph_id",
    "category_primary",
    "business_status",
    "price_level",
    "google_maps_url",
    "search_term",
    "location",
    "scraped_at",
];

/// Fields expected to be filled in most records.
pub const DEFAULT_IMPORTANT_FIELDS: &[&str] = &[
    "name",
    "rating",
    "reviews_count",
    "phone",
    "website",
    "full_address",
    "latitude",
    "longitude",
    "category_primary",
];

/// Closed latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Approximate box around Brazil. Coarse on purpose: points near the
    /// borders may fall outside.
    pub const BRAZIL: BoundingBox = BoundingBox {
        min_lat: -35.0,
        max_lat: 5.0,
        min_lng: -75.0,
        max_lng: -30.0,
    };

    /// Whether the point lies inside the box, edges included.
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lng..=self.max_lng).contains(&lng)
    }
}

/// How defect descriptions are folded into the frequency table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefectGranularity {
    /// One row per exact description; descriptions that echo a value
    /// produce one row per distinct value.
    #[default]
    Value,
    /// One row per defect kind, with a few example descriptions attached.
    Kind,
}

/// Configuration for the validator and the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditConfig {
    /// Fields listed in the fill-rate table.
    pub fields: Vec<String>,
    /// Fields whose sparse fill rate gets a warning marker.
    pub important_fields: Vec<String>,
    /// Fill rate under which an important field is flagged (0.0-1.0).
    pub sparse_threshold: f64,
    /// Name produced when the scraper captured the page chrome instead of a place.
    pub placeholder_name: String,
    pub rating_min: f64,
    pub rating_max: f64,
    pub phone_pattern: String,
    pub postal_code_pattern: String,
    pub website_prefixes: Vec<String>,
    pub bounding_box: BoundingBox,
    /// Substring every maps URL must contain.
    pub maps_url_marker: String,
    /// Characters of a suspicious URL echoed in its defect description.
    pub url_echo_limit: usize,
    /// Characters of the maps URL shown next to a sample problem record.
    pub sample_url_limit: usize,
    /// Problem records kept for inspection.
    pub sample_size: usize,
    /// Grouping key used for records without a search term.
    pub missing_term_label: String,
    pub granularity: DefectGranularity,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            fields: DEFAULT_FIELDS.iter().map(|s| s.to_string()).collect(),
            important_fields: DEFAULT_IMPORTANT_FIELDS.iter().map(|s| s.to_string()).collect(),
            sparse_threshold: 0.5,
            placeholder_name: "Google Maps".to_string(),
            rating_min: 1.0,
            rating_max: 5.0,
            phone_pattern: r"^\+55\d{10,11}$".to_string(),
            postal_code_pattern: r"^\d{5}-\d{3}$".to_string(),
            website_prefixes: vec!["http://".to_string(), "https://".to_string()],
            bounding_box: BoundingBox::BRAZIL,
            maps_url_marker: "google.com/maps".to_string(),
            url_echo_limit: 80,
            sample_url_limit: 60,
            sample_size: 10,
            missing_term_label: "(no term)".to_string(),
            granularity: DefectGranularity::Value,
        }
    }
}

impl AuditConfig {
    /// Load a configuration file. Keys left out keep their default value.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
        let config: AuditConfig =
            serde_json::from_str(&text).map_err(|e| AuditError::JsonAt {
                path: path.to_path_buf(),
                source: e,
            })?;
        config.check()?;
        Ok(config)
    }

    /// Set the defect granularity.
    pub fn with_granularity(mut self, granularity: DefectGranularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Reject values no audit could run with.
    pub fn check(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.sparse_threshold) {
            return Err(AuditError::Config(format!(
                "sparse_threshold must be within [0, 1], got {}",
                self.sparse_threshold
            )));
        }
        if self.rating_min > self.rating_max {
            return Err(AuditError::Config(format!(
                "rating_min ({}) is greater than rating_max ({})",
                self.rating_min, self.rating_max
            )));
        }
        let bbox = &self.bounding_box;
        if bbox.min_lat > bbox.max_lat || bbox.min_lng > bbox.max_lng {
            return Err(AuditError::Config("bounding_box has inverted edges".to_string()));
        }
        Ok(())
    }

    pub fn is_important(&self, field: &str) -> bool {
        self.important_fields.iter().any(|f| f == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_field_lists() {
        let config = AuditConfig::default();
        assert_eq!(config.fields.len(), 24);
        assert_eq!(config.important_fields.len(), 9);
        assert!(config.important_fields.iter().all(|f| config.fields.contains(f)));
        assert!(config.is_important("category_primary"));
        assert!(!config.is_important("cid"));
    }

    #[test]
    fn test_bounding_box_edges_inclusive() {
        let bbox = BoundingBox::BRAZIL;
        assert!(bbox.contains(-23.5, -46.6));
        assert!(bbox.contains(-35.0, -75.0));
        assert!(bbox.contains(5.0, -30.0));
        assert!(!bbox.contains(40.7, -74.0));
        assert!(!bbox.contains(-23.5, -29.9));
    }

    #[test]
    fn test_partial_config_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"placeholder_name": "Mapas", "granularity": "kind"}}"#).unwrap();

        let config = AuditConfig::from_file(file.path()).unwrap();
        assert_eq!(config.placeholder_name, "Mapas");
        assert_eq!(config.granularity, DefectGranularity::Kind);
        assert_eq!(config.sample_size, 10);
        assert_eq!(config.bounding_box, BoundingBox::BRAZIL);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"sparse_threshold": 1.5}}"#).unwrap();

        let err = AuditConfig::from_file(file.path()).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }
}
