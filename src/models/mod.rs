mod ingredient;
mod macros;
mod plan;
mod preferences;

pub use ingredient::{Category, Ingredient, IngredientRecord, MealTime};
pub use macros::{Macro, MacroVector};
pub use plan::{AchievementVerdict, MealItem, MealOutcome, MealRequest};
pub use preferences::{DietaryRestriction, Preferences};
