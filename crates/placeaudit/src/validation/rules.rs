//! Per-record rules and the validator that runs them.

use regex::Regex;

use crate::config::{AuditConfig, BoundingBox};
use crate::error::Result;
use crate::input::{value_text, Record};

use super::defect::DefectKind;
use super::invisible::contains_invisible;

/// A single check over one record.
///
/// Rules never fail: a field the rule needs that is absent simply means the
/// rule has nothing to report.
pub trait Rule: Send + Sync {
    /// Short identifier of the rule.
    fn name(&self) -> &'static str;

    /// Append any defect found in `record`.
    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>);
}

/// Text of a field for echoing, `null` when absent.
fn echo(record: &Record, field: &str) -> String {
    record
        .get(field)
        .map(value_text)
        .unwrap_or_else(|| "null".to_string())
}

/// Rejects empty names and the placeholder name.
pub struct NameRule {
    placeholder: String,
}

impl Rule for NameRule {
    fn name(&self) -> &'static str {
        "name"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        if !record.is_filled("name") {
            defects.push(DefectKind::EmptyName);
        } else if record.get_str("name") == Some(self.placeholder.as_str()) {
            defects.push(DefectKind::PlaceholderName {
                name: self.placeholder.clone(),
            });
        }
    }
}

/// Rating must lie in `[min, max]`.
pub struct RatingRangeRule {
    min: f64,
    max: f64,
}

impl Rule for RatingRangeRule {
    fn name(&self) -> &'static str {
        "rating_range"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        // Non-numeric ratings are a loader concern.
        let Some(rating) = record.get_f64("rating") else {
            return;
        };
        if !(self.min..=self.max).contains(&rating) {
            defects.push(DefectKind::RatingOutOfRange {
                rating: echo(record, "rating"),
                min: self.min.to_string(),
                max: self.max.to_string(),
            });
        }
    }
}

/// Rating and review count must be present together.
pub struct RatingCountRule;

impl Rule for RatingCountRule {
    fn name(&self) -> &'static str {
        "rating_count"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        let has_rating = record.is_present("rating");
        let has_count = record.is_present("reviews_count");

        if has_rating && !has_count {
            defects.push(DefectKind::RatingWithoutCount);
        }
        if has_count && !has_rating {
            defects.push(DefectKind::CountWithoutRating);
        }
    }
}

/// Phone must match the configured pattern.
pub struct PhoneRule {
    pattern: Regex,
}

impl Rule for PhoneRule {
    fn name(&self) -> &'static str {
        "phone"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        if let Some(phone) = record.text("phone") {
            if !self.pattern.is_match(&phone) {
                defects.push(DefectKind::InvalidPhone { phone });
            }
        }
    }
}

/// Website must start with an accepted protocol.
pub struct WebsiteRule {
    prefixes: Vec<String>,
}

impl Rule for WebsiteRule {
    fn name(&self) -> &'static str {
        "website"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        if let Some(website) = record.text("website") {
            if !self.prefixes.iter().any(|p| website.starts_with(p.as_str())) {
                defects.push(DefectKind::WebsiteWithoutProtocol { website });
            }
        }
    }
}

/// Latitude and longitude must be present together.
pub struct CoordinatePairRule;

impl Rule for CoordinatePairRule {
    fn name(&self) -> &'static str {
        "coordinate_pair"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        if record.is_present("latitude") != record.is_present("longitude") {
            defects.push(DefectKind::IncompleteCoordinates {
                lat: echo(record, "latitude"),
                lng: echo(record, "longitude"),
            });
        }
    }
}

/// Coordinates must fall inside the bounding box.
pub struct BoundingBoxRule {
    bbox: BoundingBox,
}

impl Rule for BoundingBoxRule {
    fn name(&self) -> &'static str {
        "bounding_box"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        let (Some(lat), Some(lng)) = (record.get_f64("latitude"), record.get_f64("longitude"))
        else {
            return;
        };
        if !self.bbox.contains(lat, lng) {
            defects.push(DefectKind::CoordinatesOutOfBounds {
                lat: echo(record, "latitude"),
                lng: echo(record, "longitude"),
            });
        }
    }
}

/// Postal code must match the configured pattern.
pub struct PostalCodeRule {
    pattern: Regex,
}

impl Rule for PostalCodeRule {
    fn name(&self) -> &'static str {
        "postal_code"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        if let Some(postal_code) = record.text("postal_code") {
            if !self.pattern.is_match(&postal_code) {
                defects.push(DefectKind::InvalidPostalCode { postal_code });
            }
        }
    }
}

/// Address must not carry invisible control characters.
pub struct InvisibleCharRule;

impl Rule for InvisibleCharRule {
    fn name(&self) -> &'static str {
        "invisible_chars"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        let address = record.get_str("full_address").unwrap_or("");
        if contains_invisible(address) {
            defects.push(DefectKind::InvisibleCharacters);
        }
    }
}

/// Maps URL must point at the maps host.
pub struct MapsUrlRule {
    marker: String,
    echo_limit: usize,
}

impl Rule for MapsUrlRule {
    fn name(&self) -> &'static str {
        "maps_url"
    }

    fn check(&self, record: &Record, defects: &mut Vec<DefectKind>) {
        if let Some(url) = record.text("google_maps_url") {
            if !url.contains(self.marker.as_str()) {
                defects.push(DefectKind::SuspiciousMapsUrl {
                    url: url.chars().take(self.echo_limit).collect(),
                });
            }
        }
    }
}

/// Runs every rule, in a fixed order, over a record.
pub struct RecordValidator {
    rules: Vec<Box<dyn Rule>>,
}

impl RecordValidator {
    /// Build the rule list from a configuration. Fails only on an invalid pattern.
    pub fn new(config: &AuditConfig) -> Result<Self> {
        Ok(Self {
            rules: vec![
                Box::new(NameRule {
                    placeholder: config.placeholder_name.clone(),
                }),
                Box::new(RatingRangeRule {
                    min: config.rating_min,
                    max: config.rating_max,
                }),
                Box::new(RatingCountRule),
                Box::new(PhoneRule {
                    pattern: Regex::new(&config.phone_pattern)?,
                }),
                Box::new(WebsiteRule {
                    prefixes: config.website_prefixes.clone(),
                }),
                Box::new(CoordinatePairRule),
                Box::new(BoundingBoxRule {
                    bbox: config.bounding_box,
                }),
                Box::new(PostalCodeRule {
                    pattern: Regex::new(&config.postal_code_pattern)?,
                }),
                Box::new(InvisibleCharRule),
                Box::new(MapsUrlRule {
                    marker: config.maps_url_marker.clone(),
                    echo_limit: config.url_echo_limit,
                }),
            ],
        })
    }

    /// Names of the rules in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Run all rules. No rule suppresses another.
    pub fn validate(&self, record: &Record) -> Vec<DefectKind> {
        let mut defects = Vec::new();
        for rule in &self.rules {
            rule.check(record, &mut defects);
        }
        defects
    }

    /// Human-readable descriptions of [`RecordValidator::validate`].
    pub fn describe(&self, record: &Record) -> Vec<String> {
        self.validate(record).iter().map(ToString::to_string).collect()
    }
}
