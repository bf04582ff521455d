use std::collections::HashSet;

use strsim::jaro_winkler;
use tracing::{debug, warn};

use crate::catalog::tables::{self, NUTRITION_LOOKUP};
use crate::error::{OptimizerError, Result};
use crate::models::{Category, Ingredient, IngredientRecord, MacroVector};

/// Similarity above which a lookup name is offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Closest known ingredient name, if any is similar enough.
pub fn suggest(name: &str) -> Option<String> {
    let key = tables::normalize_name(name);
    NUTRITION_LOOKUP
        .keys()
        .map(|known| (*known, jaro_winkler(known, &key)))
        .filter(|(_, score)| *score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(known, _)| known.to_string())
}

fn checked(name: &str, field: &str, value: Option<f64>) -> Result<Option<f64>> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(OptimizerError::InvalidInput(format!(
            "{name}: {field} must be a non-negative number, got {v}"
        ))),
        other => Ok(other),
    }
}

/// Turn one caller record into a canonical ingredient.
///
/// Missing macros are filled from the nutrition lookup. Without a lookup hit,
/// a record lacking only calories gets them from Atwater factors; anything
/// else is rejected.
pub fn normalize_record(record: &IngredientRecord, default_max_quantity: f64) -> Result<Ingredient> {
    let name = record.name.trim();
    if name.is_empty() {
        return Err(OptimizerError::InvalidInput("ingredient name is empty".to_string()));
    }

    let calories = checked(name, "calories_per_100g", record.calories_per_100g)?;
    let protein = checked(name, "protein_per_100g", record.protein_per_100g)?;
    let carbs = checked(name, "carbs_per_100g", record.carbs_per_100g)?;
    let fat = checked(name, "fat_per_100g", record.fat_per_100g)?;

    let max_quantity = match record.max_quantity {
        Some(q) if !q.is_finite() || q <= 0.0 => {
            return Err(OptimizerError::InvalidInput(format!(
                "{name}: max_quantity must be positive, got {q}"
            )));
        }
        Some(q) => q,
        None => default_max_quantity,
    };

    let reference = tables::lookup(name);
    let profile = match (calories, protein, carbs, fat, reference) {
        (Some(c), Some(p), Some(cb), Some(f), _) => MacroVector::new(c, p, cb, f),
        (c, p, cb, f, Some(entry)) => {
            debug!(ingredient = name, "filling missing macros from lookup");
            MacroVector::new(
                c.unwrap_or(entry.profile.calories),
                p.unwrap_or(entry.profile.protein),
                cb.unwrap_or(entry.profile.carbs),
                f.unwrap_or(entry.profile.fat),
            )
        }
        (None, Some(p), Some(cb), Some(f), None) => MacroVector::new(4.0 * p + 4.0 * cb + 9.0 * f, p, cb, f),
        _ => {
            return Err(OptimizerError::UnknownIngredient {
                name: name.to_string(),
                suggestion: suggest(name),
            });
        }
    };

    let category = record
        .category
        .or(reference.map(|entry| entry.category))
        .unwrap_or(Category::Other);

    let mut ingredient = Ingredient::new(name, profile, max_quantity, category);
    if let Some(times) = record.meal_time_affinity.as_ref().filter(|t| !t.is_empty()) {
        ingredient.meal_time_affinity = times.iter().copied().collect();
    }
    Ok(ingredient)
}

/// Normalize a request's records, dropping case-insensitive duplicates.
///
/// The first occurrence of a name is kept.
pub fn normalize_records(records: &[IngredientRecord], default_max_quantity: f64) -> Result<Vec<Ingredient>> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(records.len());

    for record in records {
        let ingredient = normalize_record(record, default_max_quantity)?;
        if !seen.insert(ingredient.key()) {
            warn!(ingredient = %ingredient.name, "duplicate ingredient dropped");
            continue;
        }
        out.push(ingredient);
    }
    Ok(out)
}

/// Append helpers to a working list, skipping names already present.
pub fn merge_helpers(base: &[Ingredient], helpers: &[Ingredient]) -> Vec<Ingredient> {
    let mut merged = base.to_vec();
    for helper in helpers {
        if !merged.contains(helper) {
            merged.push(helper.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MealTime;

    #[test]
    fn test_complete_record_passes_through() {
        let record = IngredientRecord::complete("Chicken Breast", 165.0, 31.0, 0.0, 3.6).with_max_quantity(250.0);
        let ing = normalize_record(&record, 300.0).unwrap();
        assert_eq!(ing.name, "Chicken Breast");
        assert_eq!(ing.max_quantity, 250.0);
        assert_eq!(ing.profile.protein, 31.0);
        assert_eq!(ing.category, Category::WhiteMeat);
        assert!(!ing.is_helper);
    }

    #[test]
    fn test_missing_fields_filled_from_lookup() {
        let record = IngredientRecord {
            name: "salmon".to_string(),
            protein_per_100g: Some(22.0),
            ..Default::default()
        };
        let ing = normalize_record(&record, 300.0).unwrap();
        assert_eq!(ing.profile.protein, 22.0);
        assert_eq!(ing.profile.fat, 13.0);
        assert_eq!(ing.profile.calories, 208.0);
        assert_eq!(ing.category, Category::Fish);
        assert_eq!(ing.max_quantity, 300.0);
    }

    #[test]
    fn test_atwater_fallback_for_missing_calories() {
        let record = IngredientRecord {
            name: "mystery_bar".to_string(),
            protein_per_100g: Some(20.0),
            carbs_per_100g: Some(50.0),
            fat_per_100g: Some(10.0),
            ..Default::default()
        };
        let ing = normalize_record(&record, 300.0).unwrap();
        assert_eq!(ing.profile.calories, 370.0);
        assert_eq!(ing.category, Category::Other);
    }

    #[test]
    fn test_unknown_incomplete_record_is_rejected_with_suggestion() {
        let record = IngredientRecord {
            name: "chiken breast".to_string(),
            protein_per_100g: Some(30.0),
            ..Default::default()
        };
        match normalize_record(&record, 300.0) {
            Err(OptimizerError::UnknownIngredient { name, suggestion }) => {
                assert_eq!(name, "chiken breast");
                assert_eq!(suggestion.as_deref(), Some("chicken_breast"));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_values_rejected() {
        let negative = IngredientRecord::complete("rice", 130.0, -1.0, 28.0, 0.3);
        assert!(normalize_record(&negative, 300.0).unwrap_err().is_invalid_input());

        let nan = IngredientRecord::complete("rice", f64::NAN, 2.7, 28.0, 0.3);
        assert!(normalize_record(&nan, 300.0).is_err());

        let empty = IngredientRecord::complete("  ", 130.0, 2.7, 28.0, 0.3);
        assert!(normalize_record(&empty, 300.0).is_err());

        let zero_max = IngredientRecord::complete("rice", 130.0, 2.7, 28.0, 0.3).with_max_quantity(0.0);
        assert!(normalize_record(&zero_max, 300.0).is_err());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let records = vec![
            IngredientRecord::complete("Rice", 130.0, 2.7, 28.0, 0.3),
            IngredientRecord::complete("RICE", 999.0, 0.0, 0.0, 0.0),
            IngredientRecord::complete("tofu", 76.0, 8.0, 1.9, 4.8),
        ];
        let out = normalize_records(&records, 300.0).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "Rice");
        assert_eq!(out[0].profile.calories, 130.0);
    }

    #[test]
    fn test_merge_helpers_skips_present_names() {
        let base = vec![Ingredient::new("Egg_Whites", MacroVector::ZERO, 100.0, Category::DairyEgg)];
        let helpers: Vec<Ingredient> = tables::HELPERS.iter().take(2).cloned().collect();
        let merged = merge_helpers(&base, &helpers);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].name, "Egg_Whites");
    }

    #[test]
    fn test_spaced_names_match_helper_names() {
        let base = vec![Ingredient::new("Egg Whites", MacroVector::ZERO, 5.0, Category::DairyEgg)];
        let egg_whites = tables::HELPERS.iter().find(|h| h.name == "egg_whites").unwrap();
        let merged = merge_helpers(&base, std::slice::from_ref(egg_whites));
        assert_eq!(merged.len(), 1);
        assert!(!merged[0].is_helper);

        let records = vec![
            IngredientRecord::complete("Chicken Breast", 165.0, 31.0, 0.0, 3.6),
            IngredientRecord::complete("chicken-breast", 500.0, 1.0, 1.0, 1.0),
        ];
        assert_eq!(normalize_records(&records, 300.0).unwrap().len(), 1);
    }

    #[test]
    fn test_record_affinity_is_respected() {
        let record = IngredientRecord {
            meal_time_affinity: Some(vec![MealTime::Breakfast]),
            ..IngredientRecord::complete("oats", 389.0, 17.0, 66.0, 7.0)
        };
        let ing = normalize_record(&record, 300.0).unwrap();
        assert!(ing.suits(MealTime::Breakfast));
        assert!(!ing.suits(MealTime::Dinner));
    }
}
