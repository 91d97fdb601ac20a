//! Dataset report: aggregation and text rendering.

mod aggregate;
mod render;

pub use aggregate::{DefectCount, FieldFill, ProblemRecord, Report, Summary, TermCount};
pub use render::{percentage, render};
