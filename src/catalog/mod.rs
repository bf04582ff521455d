//! Ingredient normalization, reference tables and file I/O.

pub mod adapter;
pub mod persistence;
pub mod tables;

pub use adapter::{merge_helpers, normalize_record, normalize_records, suggest};
pub use persistence::{load_records, load_request, save_json};
pub use tables::{HELPERS, NUTRITION_LOOKUP, helpers_for, lookup, normalize_name};
