use serde::{Deserialize, Serialize};

use crate::models::{IngredientRecord, Macro, MacroVector, MealTime, Preferences};

/// A single-meal optimization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealRequest {
    pub ingredients: Vec<IngredientRecord>,
    pub target: MacroVector,
    pub meal_time: MealTime,

    /// Restrictions on the helpers gap-fill may add.
    #[serde(default)]
    pub preferences: Preferences,
}

/// Per-macro pass/fail against the tolerance bands, plus the overall AND.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementVerdict {
    pub calories: bool,
    pub protein: bool,
    pub carbs: bool,
    pub fat: bool,
    pub overall: bool,
}

impl AchievementVerdict {
    pub fn get(&self, m: Macro) -> bool {
        match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }

    /// Macros that missed their band.
    pub fn missed(&self) -> Vec<Macro> {
        Macro::ALL.into_iter().filter(|&m| !self.get(m)).collect()
    }
}

/// One ingredient line of the final meal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealItem {
    /// Name of the ingredient.
    pub name: String,

    /// Optimized amount in grams.
    pub quantity_grams: f64,

    /// Macros contributed by this amount.
    pub macros: MacroVector,

    /// Whether the gap-fill step added this ingredient.
    pub is_helper: bool,
}

/// Result of a full optimize → gap-fill → re-optimize run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MealOutcome {
    /// Solver whose result was kept.
    pub method_used: String,

    /// False only when no solver produced a usable vector.
    pub success: bool,

    pub items: Vec<MealItem>,
    pub totals: MacroVector,
    pub verdict: AchievementVerdict,

    /// Names of helper ingredients that ended up in the meal.
    pub helpers_added: Vec<String>,

    /// Evaluator score of the kept result (lower is better).
    pub score: f64,

    pub recommendations: Vec<String>,

    /// Number of caller-supplied ingredients after normalization.
    pub input_count: usize,

    pub elapsed_ms: u128,
}

impl MealOutcome {
    /// Quantity of an ingredient by name (case-insensitive).
    pub fn quantity_of(&self, name: &str) -> Option<f64> {
        let key = name.to_lowercase();
        self.items
            .iter()
            .find(|item| item.name.to_lowercase() == key)
            .map(|item| item.quantity_grams)
    }
}
