//! Record model and dataset loading.

mod loader;
mod record;

pub use loader::{
    default_dataset, resolve_source, LoadOutcome, Loader, SkippedSource, DATASETS_ROOT,
    DEFAULT_DATASET,
};
pub use record::{is_filled_value, value_text, Record};
