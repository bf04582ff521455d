use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::tables::normalize_name;
use crate::error::OptimizerError;
use crate::models::ingredient::normalize_meal_label;
use crate::models::{Category, Ingredient};

/// Name fragments that mark an ingredient as containing gluten.
const GLUTEN_MARKERS: [&str; 7] = ["wheat", "bread", "barley", "rye", "pasta", "couscous", "seitan"];

/// Diet rules applied to helper candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    GlutenFree,
}

impl DietaryRestriction {
    pub const ALL: [DietaryRestriction; 3] = [
        DietaryRestriction::Vegetarian,
        DietaryRestriction::Vegan,
        DietaryRestriction::GlutenFree,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DietaryRestriction::Vegetarian => "vegetarian",
            DietaryRestriction::Vegan => "vegan",
            DietaryRestriction::GlutenFree => "gluten_free",
        }
    }

    /// Whether `ingredient` is compatible with this restriction.
    pub fn allows(self, ingredient: &Ingredient) -> bool {
        let meat = matches!(
            ingredient.category,
            Category::RedMeat | Category::WhiteMeat | Category::Fish
        );
        match self {
            DietaryRestriction::Vegetarian => !meat,
            DietaryRestriction::Vegan => !meat && ingredient.category != Category::DairyEgg,
            DietaryRestriction::GlutenFree => {
                let key = ingredient.key();
                !GLUTEN_MARKERS.iter().any(|marker| key.contains(marker))
            }
        }
    }
}

impl fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DietaryRestriction {
    type Err = OptimizerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize_meal_label(s);
        DietaryRestriction::ALL
            .into_iter()
            .find(|r| r.as_str() == key)
            .ok_or_else(|| OptimizerError::InvalidInput(format!("unknown dietary restriction: {s:?}")))
    }
}

impl<'de> Deserialize<'de> for DietaryRestriction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Caller restrictions on which helpers gap-fill may add.
///
/// Ingredients the caller supplied are never filtered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub dietary_restrictions: Vec<DietaryRestriction>,

    /// Allergen name fragments, matched against the normalized ingredient name.
    pub allergies: Vec<String>,
}

impl Preferences {
    pub fn is_empty(&self) -> bool {
        self.dietary_restrictions.is_empty() && self.allergies.is_empty()
    }

    pub fn allows(&self, ingredient: &Ingredient) -> bool {
        if !self.dietary_restrictions.iter().all(|r| r.allows(ingredient)) {
            return false;
        }
        let key = ingredient.key();
        !self
            .allergies
            .iter()
            .map(|a| normalize_name(a))
            .any(|allergen| !allergen.is_empty() && key.contains(&allergen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MacroVector;

    fn ing(name: &str, category: Category) -> Ingredient {
        Ingredient::new(name, MacroVector::ZERO, 100.0, category)
    }

    #[test]
    fn test_vegetarian_drops_meat_and_fish() {
        let prefs = Preferences {
            dietary_restrictions: vec![DietaryRestriction::Vegetarian],
            ..Default::default()
        };
        assert!(!prefs.allows(&ing("chicken_breast", Category::WhiteMeat)));
        assert!(!prefs.allows(&ing("tuna", Category::Fish)));
        assert!(!prefs.allows(&ing("beef", Category::RedMeat)));
        assert!(prefs.allows(&ing("egg_whites", Category::DairyEgg)));
        assert!(prefs.allows(&ing("tofu", Category::PlantBased)));
    }

    #[test]
    fn test_vegan_also_drops_dairy_and_eggs() {
        let prefs = Preferences {
            dietary_restrictions: vec![DietaryRestriction::Vegan],
            ..Default::default()
        };
        assert!(!prefs.allows(&ing("greek_yogurt", Category::DairyEgg)));
        assert!(!prefs.allows(&ing("shrimp", Category::Fish)));
        assert!(prefs.allows(&ing("lentils", Category::PlantBased)));
    }

    #[test]
    fn test_gluten_free_matches_name_fragments() {
        let prefs = Preferences {
            dietary_restrictions: vec![DietaryRestriction::GlutenFree],
            ..Default::default()
        };
        assert!(!prefs.allows(&ing("Whole Wheat Bread", Category::Grain)));
        assert!(prefs.allows(&ing("white_rice", Category::Grain)));
    }

    #[test]
    fn test_allergies_match_normalized_names() {
        let prefs = Preferences {
            allergies: vec!["Peanut".to_string(), "  ".to_string()],
            ..Default::default()
        };
        assert!(!prefs.allows(&ing("peanut_butter", Category::NutSeed)));
        assert!(prefs.allows(&ing("almonds", Category::NutSeed)));
    }

    #[test]
    fn test_restriction_labels_parse_leniently() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"dietary_restrictions": ["Vegetarian", "gluten-free"]}"#).unwrap();
        assert_eq!(
            prefs.dietary_restrictions,
            vec![DietaryRestriction::Vegetarian, DietaryRestriction::GlutenFree]
        );
        assert!(prefs.allergies.is_empty());
        assert!(serde_json::from_str::<Preferences>(r#"{"dietary_restrictions": ["keto"]}"#).is_err());
    }
}
