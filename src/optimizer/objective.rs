use crate::models::{Ingredient, Macro, MacroVector};
use crate::optimizer::config::ObjectiveWeights;

/// Achieved macros for a quantity vector.
///
/// Σ(profile × quantity / 100). Extra quantities or ingredients beyond the
/// shorter of the two slices are ignored.
pub fn totals(quantities: &[f64], ingredients: &[Ingredient]) -> MacroVector {
    let mut acc = MacroVector::ZERO;
    for (q, ingredient) in quantities.iter().zip(ingredients) {
        let factor = q / 100.0;
        acc.calories += ingredient.profile.calories * factor;
        acc.protein += ingredient.profile.protein * factor;
        acc.carbs += ingredient.profile.carbs * factor;
        acc.fat += ingredient.profile.fat * factor;
    }
    acc
}

/// Signed deviation relative to the target; targets under 1 are scaled as 1.
#[inline]
pub fn relative_deviation(achieved: f64, target: f64) -> f64 {
    (achieved - target) / target.max(1.0)
}

/// Weighted squared deviation of the achieved totals from the target.
pub fn deviation_penalty(achieved: &MacroVector, target: &MacroVector, weights: &ObjectiveWeights) -> f64 {
    Macro::ALL
        .iter()
        .map(|&m| {
            let dev = relative_deviation(achieved.get(m), target.get(m));
            let mut term = weights.weight(m) * dev * dev;
            if m == Macro::Calories && dev > 0.0 {
                term *= weights.calorie_overshoot_factor;
            }
            term
        })
        .sum()
}

/// Scalar cost of a candidate quantity vector (lower is better).
#[inline]
pub fn objective(
    quantities: &[f64],
    ingredients: &[Ingredient],
    target: &MacroVector,
    weights: &ObjectiveWeights,
) -> f64 {
    deviation_penalty(&totals(quantities, ingredients), target, weights)
}
