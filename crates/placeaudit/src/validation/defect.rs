//! Defect kinds reported by the record validator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One rule violation found in one record.
///
/// Variants that echo the offending value carry it as text, so
/// [`fmt::Display`] yields a value-level description while
/// [`DefectKind::label`] yields the class-level one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DefectKind {
    /// Name absent or empty.
    EmptyName,
    /// Name equal to the placeholder the scraper gets on a failed capture.
    PlaceholderName { name: String },
    /// Rating outside the configured closed range.
    RatingOutOfRange { rating: String, min: String, max: String },
    /// Rating present, review count absent.
    RatingWithoutCount,
    /// Review count present, rating absent.
    CountWithoutRating,
    /// Phone not matching the configured format.
    InvalidPhone { phone: String },
    /// Website without an accepted protocol prefix.
    WebsiteWithoutProtocol { website: String },
    /// Exactly one of latitude/longitude present.
    IncompleteCoordinates { lat: String, lng: String },
    /// Both coordinates present but outside the bounding box.
    CoordinatesOutOfBounds { lat: String, lng: String },
    /// Postal code not matching the configured format.
    InvalidPostalCode { postal_code: String },
    /// Address still carries bidi/formatting control characters.
    InvisibleCharacters,
    /// Maps URL without the expected host/path marker (truncated).
    SuspiciousMapsUrl { url: String },
}

impl DefectKind {
    /// Class-level description, identical for every value.
    pub fn label(&self) -> &'static str {
        match self {
            DefectKind::EmptyName => "name is empty",
            DefectKind::PlaceholderName { .. } => "name is the placeholder (failed capture)",
            DefectKind::RatingOutOfRange { .. } => "rating out of range",
            DefectKind::RatingWithoutCount => "rating present but reviews_count=null",
            DefectKind::CountWithoutRating => "reviews_count present but rating=null",
            DefectKind::InvalidPhone { .. } => "phone outside expected format",
            DefectKind::WebsiteWithoutProtocol { .. } => "website without protocol",
            DefectKind::IncompleteCoordinates { .. } => "incomplete coordinates",
            DefectKind::CoordinatesOutOfBounds { .. } => "coordinates outside bounding box",
            DefectKind::InvalidPostalCode { .. } => "postal_code outside expected pattern",
            DefectKind::InvisibleCharacters => {
                "full_address still contains invisible Unicode characters"
            }
            DefectKind::SuspiciousMapsUrl { .. } => "suspicious google_maps_url",
        }
    }

    /// Whether the description embeds the triggering value.
    pub fn echoes_value(&self) -> bool {
        !matches!(
            self,
            DefectKind::EmptyName
                | DefectKind::RatingWithoutCount
                | DefectKind::CountWithoutRating
                | DefectKind::InvisibleCharacters
        )
    }
}

impl fmt::Display for DefectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefectKind::PlaceholderName { name } => write!(f, "name='{name}' (failed capture)"),
            DefectKind::RatingOutOfRange { rating, min, max } => {
                write!(f, "rating out of range ({min}-{max}): {rating}")
            }
            DefectKind::InvalidPhone { phone } => {
                write!(f, "phone outside expected format: '{phone}'")
            }
            DefectKind::WebsiteWithoutProtocol { website } => {
                write!(f, "website without protocol: '{website}'")
            }
            DefectKind::IncompleteCoordinates { lat, lng } => {
                write!(f, "incomplete coordinates: lat={lat}, lng={lng}")
            }
            DefectKind::CoordinatesOutOfBounds { lat, lng } => {
                write!(f, "coordinates outside bounding box: ({lat}, {lng})")
            }
            DefectKind::InvalidPostalCode { postal_code } => {
                write!(f, "postal_code outside expected pattern: '{postal_code}'")
            }
            DefectKind::SuspiciousMapsUrl { url } => {
                write!(f, "suspicious google_maps_url: '{url}'")
            }
            DefectKind::EmptyName
            | DefectKind::RatingWithoutCount
            | DefectKind::CountWithoutRating
            | DefectKind::InvisibleCharacters => f.write_str(self.label()),
        }
    }
}
