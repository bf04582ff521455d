use crate::models::{Macro, MacroVector};
use crate::optimizer::config::RecommendationParams;

fn advice(m: Macro) -> &'static str {
    match m {
        Macro::Calories => "Increase portion sizes or add an energy-dense side to reach the calorie target",
        Macro::Protein => "Consider adding more protein-rich foods like lean meats, fish, or legumes",
        Macro::Carbs => "Include more whole grains, fruits, and vegetables for carbohydrates",
        Macro::Fat => "Add healthy fats from nuts, avocados, or olive oil",
    }
}

/// One line of advice per macro that fell short of `threshold` of its target.
pub fn recommend(totals: &MacroVector, target: &MacroVector, params: &RecommendationParams) -> Vec<String> {
    Macro::ALL
        .iter()
        .filter(|&&m| totals.get(m) < target.get(m) * params.threshold)
        .map(|&m| advice(m).to_string())
        .collect()
}
