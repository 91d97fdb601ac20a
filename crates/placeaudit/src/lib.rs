//! placeaudit: data-quality audit for scraped place listings.
//!
//! Each record (one business listing as a flat JSON object) is checked by a
//! fixed, ordered set of rules. The per-record defects are then folded into a
//! dataset report: field fill rates, a defect frequency table, the record
//! count per search term, a sample of problem records and a clean/defective
//! summary.
//!
//! # Core Principles
//!
//! - **Advisory**: records are never modified or rejected
//! - **Deterministic**: the same records always render the same report
//! - **Configurable**: every threshold and pattern lives in [`AuditConfig`]
//!
//! # Example
//!
//! ```no_run
//! use placeaudit::Auditor;
//!
//! let auditor = Auditor::new().unwrap();
//! let outcome = auditor.audit("storage/datasets/default").unwrap();
//!
//! println!("{}", outcome.report);
//! ```

pub mod actor;
pub mod config;
pub mod error;
pub mod input;
pub mod report;
pub mod validation;
pub mod webhook;

mod auditor;

pub use crate::auditor::{AuditOutcome, Auditor};
pub use config::{AuditConfig, BoundingBox, DefectGranularity};
pub use error::{AuditError, Result};
pub use input::{LoadOutcome, Loader, Record};
pub use report::{render, Report};
pub use validation::{DefectKind, RecordValidator};
pub use webhook::WebhookClient;
