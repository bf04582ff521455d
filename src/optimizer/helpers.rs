use std::collections::HashSet;

use tracing::debug;

use crate::catalog::tables::HELPERS;
use crate::models::{Category, Ingredient, Macro, MacroVector, MealTime, Preferences};
use crate::optimizer::config::HelperParams;

/// Meal times tried, in order, when the requested one has no helper for a macro.
const FALLBACK_MEAL_TIMES: [MealTime; 2] = [MealTime::Lunch, MealTime::Breakfast];

/// How well a helper covers `m` per calorie, penalizing incidental macros.
pub fn helper_score(helper: &Ingredient, m: Macro, balance_weight: f64) -> f64 {
    let cal = helper.profile.calories.max(1.0);
    let others: f64 = Macro::NUTRIENTS
        .iter()
        .filter(|&&o| o != m)
        .map(|&o| helper.profile.get(o))
        .sum();
    helper.profile.get(m) / cal - balance_weight * others / cal
}

/// Chooses helper ingredients for one meal.
///
/// Candidates come from `table` (the built-in [`HELPERS`] by default) and must
/// suit the meal time and the caller's preferences.
pub struct HelperSelector<'a> {
    table: &'a [Ingredient],
    meal_time: MealTime,
    preferences: &'a Preferences,
    params: &'a HelperParams,
}

impl<'a> HelperSelector<'a> {
    pub fn new(meal_time: MealTime, preferences: &'a Preferences, params: &'a HelperParams) -> Self {
        Self {
            table: HELPERS.as_slice(),
            meal_time,
            preferences,
            params,
        }
    }

    pub fn with_table(mut self, table: &'a [Ingredient]) -> Self {
        self.table = table;
        self
    }

    /// Helpers offering `m`, from the requested meal time or else lunch then
    /// breakfast.
    fn candidates(&self, m: Macro) -> Vec<&'a Ingredient> {
        let table = self.table;
        std::iter::once(self.meal_time)
            .chain(FALLBACK_MEAL_TIMES)
            .map(|t| {
                table
                    .iter()
                    .filter(|h| h.suits(t) && h.profile.get(m) > 0.0 && self.preferences.allows(h))
                    .collect::<Vec<_>>()
            })
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    /// Pick up to `max_helpers` helpers for the macros still short of target.
    ///
    /// Deficits under `min_deficit_grams` are ignored. A helper is skipped when
    /// its name is already in the meal, or its category is already covered by a
    /// meaningful amount of another ingredient or by an earlier pick.
    pub fn select(
        &self,
        ingredients: &[Ingredient],
        quantities: &[f64],
        achieved: &MacroVector,
        target: &MacroVector,
    ) -> Vec<Ingredient> {
        let params = self.params;
        let deficit = achieved.deficit(target);
        let mut lacking: Vec<Macro> = Macro::NUTRIENTS
            .into_iter()
            .filter(|&m| deficit.get(m) > params.min_deficit_grams)
            .collect();
        lacking.sort_by(|&a, &b| {
            let rel = |m: Macro| deficit.get(m) / target.get(m).max(1.0);
            rel(b).total_cmp(&rel(a))
        });

        let mut taken: HashSet<Category> = ingredients
            .iter()
            .zip(quantities)
            .filter(|(ing, q)| **q >= params.meaningful_quantity && ing.category.is_exclusive())
            .map(|(ing, _)| ing.category)
            .collect();
        let mut names: HashSet<String> = ingredients.iter().map(Ingredient::key).collect();

        let mut picks = Vec::new();
        for m in lacking {
            if picks.len() >= params.max_helpers {
                break;
            }

            let pool = self.candidates(m);
            if pool.is_empty() {
                debug!(macro_name = m.name(), meal_time = %self.meal_time, "no helper available");
                continue;
            }

            let best = pool
                .into_iter()
                .filter(|h| !names.contains(&h.key()))
                .filter(|h| !h.category.is_exclusive() || !taken.contains(&h.category))
                .map(|h| (h, helper_score(h, m, params.balance_weight)))
                .fold(None, |best: Option<(&Ingredient, f64)>, (h, s)| match best {
                    Some((_, bs)) if bs >= s => best,
                    _ => Some((h, s)),
                });

            match best {
                Some((helper, score)) => {
                    debug!(helper = %helper.name, macro_name = m.name(), score, "helper selected");
                    taken.insert(helper.category);
                    names.insert(helper.key());
                    let mut pick = helper.clone();
                    pick.is_helper = true;
                    picks.push(pick);
                }
                None => debug!(macro_name = m.name(), "every helper conflicts with the meal"),
            }
        }
        picks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DietaryRestriction;

    fn rice() -> Ingredient {
        Ingredient::new(
            "white_rice",
            MacroVector::new(130.0, 2.7, 28.0, 0.3),
            300.0,
            Category::Grain,
        )
    }

    fn only_at(name: &str, profile: MacroVector, meal_time: MealTime) -> Ingredient {
        let mut helper = Ingredient::new(name, profile, 100.0, Category::Other);
        helper.meal_time_affinity = [meal_time].into_iter().collect();
        helper.is_helper = true;
        helper
    }

    fn names(picks: &[Ingredient]) -> Vec<&str> {
        picks.iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_protein_helper_for_protein_deficit() {
        let params = HelperParams::default();
        let prefs = Preferences::default();
        let picks = HelperSelector::new(MealTime::Lunch, &prefs, &params).select(
            &[rice()],
            &[200.0],
            &MacroVector::new(260.0, 5.4, 56.0, 0.6),
            &MacroVector::new(500.0, 40.0, 56.0, 0.6),
        );
        assert_eq!(picks.len(), 1);
        assert!(picks[0].is_helper);
        assert!(picks[0].profile.protein > 20.0);
    }

    #[test]
    fn test_small_deficits_ignored() {
        let params = HelperParams::default();
        let prefs = Preferences::default();
        let target = MacroVector::new(500.0, 40.0, 56.0, 10.0);
        let achieved = MacroVector::new(495.0, 39.5, 55.5, 9.2);
        let picks = HelperSelector::new(MealTime::Dinner, &prefs, &params).select(&[rice()], &[200.0], &achieved, &target);
        assert!(picks.is_empty());
    }

    #[test]
    fn test_category_conflict_avoided() {
        let params = HelperParams::default();
        let prefs = Preferences::default();
        let chicken = Ingredient::new("chicken_thigh", MacroVector::new(209.0, 26.0, 0.0, 10.9), 300.0, Category::WhiteMeat);
        let picks = HelperSelector::new(MealTime::Dinner, &prefs, &params).select(
            &[chicken],
            &[50.0],
            &MacroVector::new(104.0, 13.0, 0.0, 5.5),
            &MacroVector::new(400.0, 60.0, 0.0, 5.5),
        );
        assert_eq!(picks.len(), 1);
        assert_ne!(picks[0].category, Category::WhiteMeat);
    }

    #[test]
    fn test_trace_amounts_do_not_block_category() {
        let params = HelperParams::default();
        let prefs = Preferences::default();
        let prawns = Ingredient::new("prawns", MacroVector::new(99.0, 24.0, 0.2, 0.3), 300.0, Category::Fish);
        let picks = HelperSelector::new(MealTime::Dinner, &prefs, &params).select(
            &[prawns],
            &[5.0],
            &MacroVector::new(4.95, 1.2, 0.01, 0.015),
            &MacroVector::new(300.0, 60.0, 0.0, 1.0),
        );
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].name, "shrimp");
    }

    #[test]
    fn test_same_food_under_spaced_name_is_not_added_again() {
        let params = HelperParams::default();
        let prefs = Preferences::default();
        let spaced = Ingredient::new("Egg Whites", MacroVector::new(52.0, 11.0, 0.7, 0.2), 5.0, Category::DairyEgg);
        let oats = Ingredient::new("oats", MacroVector::new(389.0, 17.0, 66.0, 7.0), 80.0, Category::Grain);
        let ingredients = [spaced, oats];
        let achieved = MacroVector::new(314.0, 14.2, 52.8, 5.6);
        let target = MacroVector::new(500.0, 40.0, 55.0, 6.0);

        let egg_whites: Vec<Ingredient> = HELPERS.iter().filter(|h| h.name == "egg_whites").cloned().collect();
        let selector = HelperSelector::new(MealTime::Breakfast, &prefs, &params);
        assert!(selector.with_table(&egg_whites).select(&ingredients, &[5.0, 80.0], &achieved, &target).is_empty());

        let picks = HelperSelector::new(MealTime::Breakfast, &prefs, &params).select(&ingredients, &[5.0, 80.0], &achieved, &target);
        assert!(!picks.is_empty());
        assert!(picks.iter().all(|h| h.key() != "egg_whites"));
    }

    #[test]
    fn test_vegetarian_meal_gets_no_meat_or_fish() {
        let params = HelperParams::default();
        let prefs = Preferences {
            dietary_restrictions: vec![DietaryRestriction::Vegetarian],
            allergies: vec!["egg".to_string()],
        };
        let picks = HelperSelector::new(MealTime::Dinner, &prefs, &params).select(
            &[rice()],
            &[200.0],
            &MacroVector::new(260.0, 5.4, 56.0, 0.6),
            &MacroVector::new(500.0, 40.0, 56.0, 0.6),
        );
        assert_eq!(picks.len(), 1);
        assert_eq!(picks[0].category, Category::PlantBased);
        assert!(picks.iter().all(|h| prefs.allows(h)));
    }

    #[test]
    fn test_allergen_helper_is_skipped() {
        let params = HelperParams::default();
        let prefs = Preferences {
            allergies: vec!["shrimp".to_string()],
            ..Default::default()
        };
        let prawns = Ingredient::new("prawns", MacroVector::new(99.0, 24.0, 0.2, 0.3), 300.0, Category::Fish);
        let picks = HelperSelector::new(MealTime::Dinner, &prefs, &params).select(
            &[prawns],
            &[5.0],
            &MacroVector::new(4.95, 1.2, 0.01, 0.015),
            &MacroVector::new(300.0, 60.0, 0.0, 1.0),
        );
        assert_eq!(picks.len(), 1);
        assert_ne!(picks[0].name, "shrimp");
    }

    #[test]
    fn test_meal_time_falls_back_to_lunch_then_breakfast() {
        let params = HelperParams::default();
        let prefs = Preferences::default();
        let table = vec![
            only_at("lunch_protein", MacroVector::new(100.0, 20.0, 0.0, 0.0), MealTime::Lunch),
            only_at("breakfast_protein", MacroVector::new(100.0, 25.0, 0.0, 0.0), MealTime::Breakfast),
            only_at("breakfast_fat", MacroVector::new(880.0, 0.0, 0.0, 100.0), MealTime::Breakfast),
        ];
        let target = MacroVector::new(0.0, 40.0, 0.0, 20.0);

        let picks = HelperSelector::new(MealTime::Dinner, &prefs, &params)
            .with_table(&table)
            .select(&[], &[], &MacroVector::ZERO, &target);
        let mut picked = names(&picks);
        picked.sort_unstable();
        // Lunch wins for protein even though breakfast has a leaner source.
        assert_eq!(picked, vec!["breakfast_fat", "lunch_protein"]);
    }

    #[test]
    fn test_macro_without_any_helper_is_skipped() {
        let params = HelperParams::default();
        let prefs = Preferences::default();
        let table = vec![only_at("breakfast_fat", MacroVector::new(880.0, 0.0, 0.0, 100.0), MealTime::Breakfast)];
        let target = MacroVector::new(0.0, 40.0, 0.0, 20.0);

        let picks = HelperSelector::new(MealTime::EveningSnack, &prefs, &params)
            .with_table(&table)
            .select(&[], &[], &MacroVector::ZERO, &target);
        assert_eq!(names(&picks), vec!["breakfast_fat"]);

        let empty: Vec<Ingredient> = Vec::new();
        let picks = HelperSelector::new(MealTime::Dinner, &prefs, &params)
            .with_table(&empty)
            .select(&[rice()], &[100.0], &MacroVector::new(130.0, 2.7, 28.0, 0.3), &target);
        assert!(picks.is_empty());
    }

    #[test]
    fn test_at_most_max_helpers_and_distinct_categories() {
        let params = HelperParams::default();
        let prefs = Preferences::default();
        let picks = HelperSelector::new(MealTime::Lunch, &prefs, &params).select(
            &[],
            &[],
            &MacroVector::ZERO,
            &MacroVector::new(800.0, 60.0, 90.0, 30.0),
        );
        assert_eq!(picks.len(), 3);
        let categories: HashSet<_> = picks.iter().map(|h| h.category).filter(|c| c.is_exclusive()).collect();
        assert_eq!(categories.len(), picks.iter().filter(|h| h.category.is_exclusive()).count());
    }

    #[test]
    fn test_score_prefers_lean_sources() {
        let lean = Ingredient::new("lean", MacroVector::new(100.0, 25.0, 0.0, 0.0), 100.0, Category::Other);
        let fatty = Ingredient::new("fatty", MacroVector::new(100.0, 25.0, 0.0, 5.0), 100.0, Category::Other);
        assert!(helper_score(&lean, Macro::Protein, 0.25) > helper_score(&fatty, Macro::Protein, 0.25));
    }
}
