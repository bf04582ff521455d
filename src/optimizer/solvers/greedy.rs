use std::cmp::Ordering;

use super::{Problem, Solver, SolverResult};
use crate::models::Macro;
use crate::optimizer::objective::totals;

/// Deterministic fallback that fills the largest relative deficit first.
///
/// Each step adds a fixed increment of the ingredient densest in the lacking
/// macro, skipping anything that would push calories past the upper band.
/// Always reports success.
pub struct GreedySolver;

impl GreedySolver {
    pub const NAME: &'static str = "greedy";

    /// Macros still below their lower band, largest relative deficit first.
    fn deficits(problem: &Problem, quantities: &[f64]) -> Vec<Macro> {
        let achieved = totals(quantities, problem.ingredients);
        let tol = &problem.config.tolerances;

        let mut lacking: Vec<(Macro, f64)> = Macro::ALL
            .iter()
            .filter_map(|&m| {
                let t = problem.target.get(m);
                let lower = t - (t * tol.band(m)).max(tol.floor(m));
                let a = achieved.get(m);
                (a < lower).then(|| (m, (t - a) / t.max(1.0)))
            })
            .collect();
        lacking.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        lacking.into_iter().map(|(m, _)| m).collect()
    }

    /// Ingredient index that best covers `m` without breaking the calorie cap.
    fn pick(problem: &Problem, quantities: &[f64], m: Macro, calorie_cap: f64) -> Option<(usize, f64)> {
        let increment = problem.config.greedy.increment;
        let calories_now = totals(quantities, problem.ingredients).calories;

        let mut best: Option<(usize, f64, f64)> = None;
        for (i, ing) in problem.ingredients.iter().enumerate() {
            let headroom = ing.max_quantity - quantities[i];
            if headroom <= 1e-9 || ing.profile.get(m) <= 0.0 {
                continue;
            }
            let step = increment.min(headroom);
            if calories_now + ing.profile.calories * step / 100.0 > calorie_cap {
                continue;
            }
            let density = match m {
                Macro::Calories => ing.profile.calories,
                _ => ing.profile.get(m) / ing.profile.calories.max(1.0),
            };
            if best.is_none_or(|(_, _, d)| density > d) {
                best = Some((i, step, density));
            }
        }
        best.map(|(i, step, _)| (i, step))
    }
}

impl Solver for GreedySolver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn solve(&self, problem: &Problem) -> SolverResult {
        let tol = &problem.config.tolerances;
        let t_cal = problem.target.calories;
        let calorie_cap = t_cal + (t_cal * tol.band(Macro::Calories)).max(tol.floor(Macro::Calories));

        let mut quantities = vec![0.0; problem.dims()];
        if problem.config.greedy.increment <= 0.0 {
            return SolverResult::success(Self::NAME, quantities);
        }

        for _ in 0..problem.config.greedy.max_steps {
            let step = Self::deficits(problem, &quantities)
                .into_iter()
                .find_map(|m| Self::pick(problem, &quantities, m, calorie_cap));

            match step {
                Some((i, grams)) => quantities[i] += grams,
                None => break,
            }
        }

        SolverResult::success(Self::NAME, quantities)
    }
}
