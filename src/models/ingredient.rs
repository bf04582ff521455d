use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::tables::normalize_name;
use crate::error::OptimizerError;
use crate::models::MacroVector;

/// Macro-source category of an ingredient.
///
/// Two ingredients of the same category (other than `Other`) are considered
/// conflicting sources, e.g. a second red meat.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    RedMeat,
    WhiteMeat,
    Fish,
    PlantBased,
    DairyEgg,
    Grain,
    Fruit,
    Vegetable,
    NutSeed,
    FatOil,
    #[default]
    Other,
}

impl Category {
    /// Whether this category takes part in conflict avoidance.
    pub fn is_exclusive(self) -> bool {
        self != Category::Other
    }
}

/// Meal slot of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MealTime {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    EveningSnack,
    Dinner,
}

impl MealTime {
    pub const ALL: [MealTime; 6] = [
        MealTime::Breakfast,
        MealTime::MorningSnack,
        MealTime::Lunch,
        MealTime::AfternoonSnack,
        MealTime::EveningSnack,
        MealTime::Dinner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            MealTime::Breakfast => "breakfast",
            MealTime::MorningSnack => "morning_snack",
            MealTime::Lunch => "lunch",
            MealTime::AfternoonSnack => "afternoon_snack",
            MealTime::EveningSnack => "evening_snack",
            MealTime::Dinner => "dinner",
        }
    }
}

impl fmt::Display for MealTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical snake_case form of a free-form meal label.
///
/// "Morning Snack", "morning-snack" and "MorningSnack" all become
/// "morning_snack".
pub(crate) fn normalize_meal_label(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len() + 4);
    let mut prev_lower = false;
    for ch in raw.trim().chars() {
        if ch.is_uppercase() && prev_lower {
            out.push('_');
        }
        prev_lower = ch.is_lowercase();
        match ch {
            ' ' | '-' | '_' => {
                if !out.ends_with('_') {
                    out.push('_');
                }
            }
            c => out.extend(c.to_lowercase()),
        }
    }
    out.trim_matches('_').to_string()
}

impl FromStr for MealTime {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_meal_label(s);
        MealTime::ALL
            .into_iter()
            .find(|m| m.as_str() == key)
            .ok_or_else(|| OptimizerError::InvalidInput(format!("unknown meal time: {s:?}")))
    }
}

impl<'de> Deserialize<'de> for MealTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A canonical ingredient with a per-100g macro profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,

    /// Macros per 100 g.
    pub profile: MacroVector,

    /// Upper bound in grams used by every solver.
    pub max_quantity: f64,

    #[serde(default)]
    pub meal_time_affinity: BTreeSet<MealTime>,

    #[serde(default)]
    pub category: Category,

    /// Added by the gap-fill step rather than supplied by the caller.
    #[serde(default)]
    pub is_helper: bool,
}

impl Ingredient {
    pub fn new(name: &str, profile: MacroVector, max_quantity: f64, category: Category) -> Self {
        Self {
            name: name.to_string(),
            profile,
            max_quantity,
            meal_time_affinity: MealTime::ALL.into_iter().collect(),
            category,
            is_helper: false,
        }
    }

    /// Canonical key, the same form the nutrition lookup uses.
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn suits(&self, meal_time: MealTime) -> bool {
        self.meal_time_affinity.contains(&meal_time)
    }

    /// Debug string for logging.
    pub fn debug_string(&self) -> String {
        format!(
            "{}: {} cal, P:{} C:{} F:{} per 100g, max {}g, {:?}",
            self.name,
            self.profile.calories,
            self.profile.protein,
            self.profile.carbs,
            self.profile.fat,
            self.max_quantity,
            self.category
        )
    }
}

impl PartialEq for Ingredient {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Ingredient {}

/// Ingredient as supplied by a caller, before normalization.
///
/// Any macro field may be missing; see `catalog::adapter` for how gaps are
/// filled or rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    #[serde(default)]
    pub protein_per_100g: Option<f64>,
    #[serde(default)]
    pub carbs_per_100g: Option<f64>,
    #[serde(default)]
    pub fat_per_100g: Option<f64>,
    #[serde(default)]
    pub calories_per_100g: Option<f64>,
    #[serde(default)]
    pub max_quantity: Option<f64>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub meal_time_affinity: Option<Vec<MealTime>>,
}

impl IngredientRecord {
    /// Record with a complete profile.
    pub fn complete(name: &str, calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            name: name.to_string(),
            protein_per_100g: Some(protein),
            carbs_per_100g: Some(carbs),
            fat_per_100g: Some(fat),
            calories_per_100g: Some(calories),
            ..Default::default()
        }
    }

    pub fn with_max_quantity(mut self, grams: f64) -> Self {
        self.max_quantity = Some(grams);
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}
