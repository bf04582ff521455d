use std::collections::HashMap;
use std::sync::LazyLock;

use crate::models::MealTime::{AfternoonSnack, Breakfast, Dinner, EveningSnack, Lunch, MorningSnack};
use crate::models::{Category, Ingredient, MacroVector, MealTime};

/// Reference profile for a known ingredient.
#[derive(Debug, Clone, Copy)]
pub struct LookupEntry {
    pub profile: MacroVector,
    pub category: Category,
}

// name, kcal, protein, carbs, fat (per 100 g), category
const NUTRITION_ROWS: &[(&str, f64, f64, f64, f64, Category)] = &[
    ("chicken_breast", 165.0, 31.0, 0.0, 3.6, Category::WhiteMeat),
    ("turkey_breast", 135.0, 30.0, 0.0, 1.0, Category::WhiteMeat),
    ("beef_sirloin", 183.0, 27.0, 0.0, 8.0, Category::RedMeat),
    ("ground_beef", 254.0, 17.0, 0.0, 20.0, Category::RedMeat),
    ("pork_loin", 143.0, 26.0, 0.0, 3.5, Category::RedMeat),
    ("salmon", 208.0, 20.0, 0.0, 13.0, Category::Fish),
    ("tuna", 116.0, 26.0, 0.0, 1.0, Category::Fish),
    ("shrimp", 99.0, 24.0, 0.2, 0.3, Category::Fish),
    ("tofu", 144.0, 17.0, 3.0, 9.0, Category::PlantBased),
    ("lentils", 116.0, 9.0, 20.0, 0.4, Category::PlantBased),
    ("black_beans", 132.0, 8.9, 24.0, 0.5, Category::PlantBased),
    ("chickpeas", 164.0, 8.9, 27.0, 2.6, Category::PlantBased),
    ("eggs", 155.0, 13.0, 1.1, 11.0, Category::DairyEgg),
    ("egg_whites", 52.0, 11.0, 0.7, 0.2, Category::DairyEgg),
    ("greek_yogurt", 59.0, 10.0, 3.6, 0.4, Category::DairyEgg),
    ("cottage_cheese", 98.0, 11.0, 3.4, 4.3, Category::DairyEgg),
    ("milk", 42.0, 3.4, 5.0, 1.0, Category::DairyEgg),
    ("cheddar", 403.0, 25.0, 1.3, 33.0, Category::DairyEgg),
    ("butter", 717.0, 0.9, 0.1, 81.0, Category::DairyEgg),
    ("white_rice", 130.0, 2.7, 28.0, 0.3, Category::Grain),
    ("brown_rice", 112.0, 2.6, 24.0, 0.9, Category::Grain),
    ("quinoa", 120.0, 4.4, 21.0, 1.9, Category::Grain),
    ("oats", 389.0, 17.0, 66.0, 7.0, Category::Grain),
    ("pasta", 131.0, 5.0, 25.0, 1.1, Category::Grain),
    ("whole_wheat_bread", 247.0, 13.0, 41.0, 3.4, Category::Grain),
    ("rice_cakes", 387.0, 8.0, 81.0, 3.0, Category::Grain),
    ("potato", 77.0, 2.0, 17.0, 0.1, Category::Vegetable),
    ("sweet_potato", 86.0, 1.6, 20.0, 0.1, Category::Vegetable),
    ("broccoli", 34.0, 2.8, 7.0, 0.4, Category::Vegetable),
    ("spinach", 23.0, 2.9, 3.6, 0.4, Category::Vegetable),
    ("banana", 89.0, 1.1, 23.0, 0.3, Category::Fruit),
    ("apple", 52.0, 0.3, 14.0, 0.2, Category::Fruit),
    ("avocado", 160.0, 2.0, 8.5, 14.7, Category::Fruit),
    ("almonds", 579.0, 21.0, 22.0, 50.0, Category::NutSeed),
    ("walnuts", 654.0, 15.0, 14.0, 65.0, Category::NutSeed),
    ("peanut_butter", 588.0, 25.0, 20.0, 50.0, Category::NutSeed),
    ("olive_oil", 884.0, 0.0, 0.0, 100.0, Category::FatOil),
    ("whey_protein", 400.0, 80.0, 8.0, 6.0, Category::DairyEgg),
];

/// Lookup key: lowercase with spaces and hyphens folded to underscores.
pub fn normalize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

/// Per-100g reference profiles keyed by normalized name.
pub static NUTRITION_LOOKUP: LazyLock<HashMap<&'static str, LookupEntry>> = LazyLock::new(|| {
    NUTRITION_ROWS
        .iter()
        .map(|&(name, calories, protein, carbs, fat, category)| {
            (
                name,
                LookupEntry {
                    profile: MacroVector::new(calories, protein, carbs, fat),
                    category,
                },
            )
        })
        .collect()
});

pub fn lookup(name: &str) -> Option<LookupEntry> {
    NUTRITION_LOOKUP.get(normalize_name(name).as_str()).copied()
}

// name (must exist in the lookup), max grams, meal times
const HELPER_ROWS: &[(&str, f64, &[MealTime])] = &[
    ("egg_whites", 200.0, &[Breakfast, MorningSnack, AfternoonSnack, EveningSnack, Lunch, Dinner]),
    ("greek_yogurt", 250.0, &[Breakfast, MorningSnack, AfternoonSnack, EveningSnack]),
    ("cottage_cheese", 200.0, &[Breakfast, MorningSnack, AfternoonSnack, EveningSnack]),
    ("whey_protein", 40.0, &[Breakfast, MorningSnack, AfternoonSnack, EveningSnack]),
    ("chicken_breast", 250.0, &[Lunch, Dinner]),
    ("turkey_breast", 200.0, &[Lunch, Dinner]),
    ("tuna", 200.0, &[Lunch, Dinner]),
    ("shrimp", 200.0, &[Lunch, Dinner]),
    ("tofu", 250.0, &[Lunch, Dinner]),
    ("lentils", 250.0, &[Lunch, Dinner]),
    ("oats", 100.0, &[Breakfast]),
    ("banana", 200.0, &[Breakfast, MorningSnack, AfternoonSnack, EveningSnack]),
    ("apple", 200.0, &[Breakfast, MorningSnack, AfternoonSnack, EveningSnack]),
    ("rice_cakes", 50.0, &[MorningSnack, AfternoonSnack, EveningSnack]),
    ("whole_wheat_bread", 120.0, &[Breakfast, Lunch]),
    ("white_rice", 300.0, &[Lunch, Dinner]),
    ("sweet_potato", 300.0, &[Lunch, Dinner]),
    ("olive_oil", 30.0, &[Lunch, Dinner]),
    ("avocado", 150.0, &[Breakfast, Lunch, Dinner]),
    ("almonds", 50.0, &[Breakfast, MorningSnack, AfternoonSnack, EveningSnack]),
    ("peanut_butter", 40.0, &[Breakfast, MorningSnack, AfternoonSnack, EveningSnack]),
    ("butter", 20.0, &[Breakfast, Dinner]),
];

/// Supplemental ingredients the gap-fill step may add.
pub static HELPERS: LazyLock<Vec<Ingredient>> = LazyLock::new(|| {
    HELPER_ROWS
        .iter()
        .filter_map(|&(name, max_quantity, times)| {
            let entry = NUTRITION_LOOKUP.get(name)?;
            let mut helper = Ingredient::new(name, entry.profile, max_quantity, entry.category);
            helper.meal_time_affinity = times.iter().copied().collect();
            helper.is_helper = true;
            Some(helper)
        })
        .collect()
});

/// Indices into [`HELPERS`] per meal time.
static HELPERS_BY_MEAL_TIME: LazyLock<HashMap<MealTime, Vec<usize>>> = LazyLock::new(|| {
    let mut index: HashMap<MealTime, Vec<usize>> = HashMap::new();
    for (i, helper) in HELPERS.iter().enumerate() {
        for &meal_time in &helper.meal_time_affinity {
            index.entry(meal_time).or_default().push(i);
        }
    }
    index
});

/// Helpers suited to a meal time, in table order.
pub fn helpers_for(meal_time: MealTime) -> impl Iterator<Item = &'static Ingredient> {
    HELPERS_BY_MEAL_TIME
        .get(&meal_time)
        .into_iter()
        .flatten()
        .map(|&i| &HELPERS[i])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Chicken Breast"), "chicken_breast");
        assert_eq!(normalize_name("  chicken-breast "), "chicken_breast");
        assert_eq!(normalize_name("CHICKEN__BREAST"), "chicken_breast");
    }

    #[test]
    fn test_lookup_tolerates_spelling_variants() {
        let entry = lookup("Olive Oil").unwrap();
        assert_eq!(entry.profile.fat, 100.0);
        assert_eq!(entry.category, Category::FatOil);
        assert!(lookup("dragonfruit").is_none());
    }

    #[test]
    fn test_every_helper_row_resolves() {
        assert_eq!(HELPERS.len(), HELPER_ROWS.len());
        assert!(HELPERS.iter().all(|h| h.is_helper && h.max_quantity > 0.0));
    }

    #[test]
    fn test_every_meal_time_has_helpers_for_each_macro() {
        for meal_time in MealTime::ALL {
            let helpers: Vec<_> = helpers_for(meal_time).collect();
            assert!(helpers.iter().any(|h| h.profile.protein >= 10.0), "{meal_time}");
            assert!(helpers.iter().any(|h| h.profile.carbs >= 14.0), "{meal_time}");
            assert!(helpers.iter().any(|h| h.profile.fat >= 14.0), "{meal_time}");
        }
    }

    #[test]
    fn test_index_matches_affinity() {
        for helper in helpers_for(MealTime::Dinner) {
            assert!(helper.suits(MealTime::Dinner));
        }
    }
}
