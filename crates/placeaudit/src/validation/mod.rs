//! Per-record validation rules.

mod defect;
mod invisible;
mod rules;

pub use defect::DefectKind;
pub use invisible::{contains_invisible, is_invisible, INVISIBLE_RANGES};
pub use rules::{
    BoundingBoxRule, CoordinatePairRule, InvisibleCharRule, MapsUrlRule, NameRule, PhoneRule,
    PostalCodeRule, RatingCountRule, RatingRangeRule, RecordValidator, Rule, WebsiteRule,
};
