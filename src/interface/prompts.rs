use dialoguer::{Confirm, Input, MultiSelect, Select};
use strsim::jaro_winkler;

use crate::error::{OptimizerError, Result};
use crate::models::{DietaryRestriction, IngredientRecord, MacroVector, MealTime, Preferences};

/// Prompt for one non-negative number.
fn prompt_amount(prompt: &str, default: &str) -> Result<f64> {
    let input: String = Input::new()
        .with_prompt(prompt)
        .default(default.to_string())
        .interact_text()?;

    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| OptimizerError::InvalidInput("Invalid number".to_string()))?;

    if !value.is_finite() || value < 0.0 {
        return Err(OptimizerError::InvalidInput(
            "Amounts must be non-negative".to_string(),
        ));
    }
    Ok(value)
}

/// Prompt for the meal's target macros.
pub fn prompt_target() -> Result<MacroVector> {
    let calories = prompt_amount("Target calories (kcal)", "600")?;
    let protein = prompt_amount("Target protein (g)", "40")?;
    let carbs = prompt_amount("Target carbs (g)", "60")?;
    let fat = prompt_amount("Target fat (g)", "20")?;
    Ok(MacroVector::new(calories, protein, carbs, fat))
}

/// Prompt for the meal time.
pub fn prompt_meal_time() -> Result<MealTime> {
    let options: Vec<&str> = MealTime::ALL.iter().map(|m| m.as_str()).collect();
    let selection = Select::new()
        .with_prompt("Which meal is this?")
        .items(&options)
        .default(2) // lunch
        .interact()?;

    Ok(MealTime::ALL[selection.min(MealTime::ALL.len() - 1)])
}

/// Prompt for dietary restrictions and allergies limiting the helpers.
pub fn prompt_preferences() -> Result<Preferences> {
    let options: Vec<&str> = DietaryRestriction::ALL.iter().map(|r| r.as_str()).collect();
    let picked = MultiSelect::new()
        .with_prompt("Dietary restrictions (space to toggle, Enter to confirm)")
        .items(&options)
        .interact()?;

    let allergies: String = Input::new()
        .with_prompt("Allergies, comma-separated (or press Enter for none)")
        .allow_empty(true)
        .interact_text()?;

    Ok(Preferences {
        dietary_restrictions: picked
            .into_iter()
            .filter_map(|i| DietaryRestriction::ALL.get(i).copied())
            .collect(),
        allergies: allergies
            .split(',')
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

/// Let the user pick ingredients from a catalog with fuzzy matching.
///
/// An empty first answer selects the whole catalog.
pub fn prompt_ingredients(catalog: &[IngredientRecord]) -> Result<Vec<IngredientRecord>> {
    let mut chosen: Vec<IngredientRecord> = Vec::new();

    loop {
        let input: String = Input::new()
            .with_prompt("Add an ingredient (or press Enter to finish)")
            .allow_empty(true)
            .interact_text()?;

        let input = input.trim().to_lowercase();
        if input.is_empty() {
            break;
        }

        if let Some(record) = catalog.iter().find(|r| r.name.to_lowercase() == input) {
            chosen.push(record.clone());
            println!("Added: {}", record.name);
            continue;
        }

        let mut candidates: Vec<(&IngredientRecord, f64)> = catalog
            .iter()
            .map(|r| (r, jaro_winkler(&r.name.to_lowercase(), &input)))
            .filter(|(_, score)| *score > 0.7)
            .collect();
        candidates.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        match candidates.as_slice() {
            [] => println!("No matching ingredient found for '{}'", input),
            [(record, _)] => {
                if prompt_yes_no(&format!("Did you mean '{}'?", record.name), true)? {
                    chosen.push((*record).clone());
                    println!("Added: {}", record.name);
                }
            }
            many => {
                let mut options: Vec<String> = many.iter().take(5).map(|(r, _)| r.name.clone()).collect();
                options.push("None of these".to_string());

                let selection = Select::new()
                    .with_prompt("Which did you mean?")
                    .items(&options)
                    .default(0)
                    .interact()?;

                if let Some((record, _)) = many.iter().take(5).nth(selection) {
                    chosen.push((*record).clone());
                    println!("Added: {}", record.name);
                }
            }
        }
    }

    if chosen.is_empty() {
        println!("Using the whole catalog ({} ingredients).", catalog.len());
        return Ok(catalog.to_vec());
    }
    Ok(chosen)
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
