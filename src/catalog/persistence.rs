use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::Result;
use crate::models::{IngredientRecord, MealRequest};

/// Load a full request (ingredients, target, meal time) from a JSON file.
pub fn load_request<P: AsRef<Path>>(path: P) -> Result<MealRequest> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Load a bare ingredient catalog (a JSON array of records).
///
/// Records are returned as written; deduplication happens during
/// normalization.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<IngredientRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write any serializable value as pretty JSON.
pub fn save_json<P: AsRef<Path>, T: Serialize + ?Sized>(path: P, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}
