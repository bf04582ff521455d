use crate::models::{AchievementVerdict, Ingredient, Macro, MacroVector};
use crate::optimizer::achievement;
use crate::optimizer::config::OptimizerConfig;
use crate::optimizer::objective::{relative_deviation, totals};
use crate::optimizer::solvers::SolverResult;

/// A solver result together with what the evaluator computed for it.
#[derive(Debug, Clone)]
pub struct ScoredResult {
    pub result: SolverResult,
    pub totals: MacroVector,
    pub verdict: AchievementVerdict,
    pub score: f64,
}

/// Tolerance-aware score of achieved totals (lower is better).
///
/// Deviations inside the soft band cost `light_penalty` per unit, larger ones
/// `heavy_penalty`. Full achievement multiplies the score by the bonus.
pub fn score_totals(
    achieved: &MacroVector,
    target: &MacroVector,
    verdict: &AchievementVerdict,
    config: &OptimizerConfig,
) -> f64 {
    let scoring = &config.scoring;
    let raw: f64 = Macro::ALL
        .iter()
        .map(|&m| {
            let dev = relative_deviation(achieved.get(m), target.get(m)).abs();
            let penalty = if dev <= scoring.soft_band {
                scoring.light_penalty
            } else {
                scoring.heavy_penalty
            };
            config.weights.weight(m) * penalty * dev
        })
        .sum();

    if verdict.overall {
        raw * scoring.achievement_bonus
    } else {
        raw
    }
}

/// Score one result, successful or not.
pub fn score_result(
    result: &SolverResult,
    ingredients: &[Ingredient],
    target: &MacroVector,
    config: &OptimizerConfig,
) -> ScoredResult {
    let achieved = totals(&result.quantities, ingredients);
    let verdict = achievement::check(&achieved, target, &config.tolerances);
    let score = score_totals(&achieved, target, &verdict, config);
    ScoredResult {
        result: result.clone(),
        totals: achieved,
        verdict,
        score,
    }
}

/// Pick the best successful result.
///
/// Ties keep the earlier result. Returns `None` when every solver failed.
pub fn evaluate(
    results: &[SolverResult],
    ingredients: &[Ingredient],
    target: &MacroVector,
    config: &OptimizerConfig,
) -> Option<ScoredResult> {
    results
        .iter()
        .filter(|r| r.success)
        .map(|r| score_result(r, ingredients, target, config))
        .fold(None, |best: Option<ScoredResult>, candidate| match best {
            Some(b) if b.score <= candidate.score => Some(b),
            _ => Some(candidate),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn chicken() -> Vec<Ingredient> {
        vec![Ingredient::new(
            "chicken_breast",
            MacroVector::new(165.0, 31.0, 0.0, 3.6),
            300.0,
            Category::WhiteMeat,
        )]
    }

    fn target() -> MacroVector {
        MacroVector::new(330.0, 62.0, 0.0, 7.2)
    }

    #[test]
    fn test_evaluate_none_when_all_failed() {
        let results = vec![
            SolverResult::failure("a", 1),
            SolverResult::failure("b", 1),
        ];
        let config = OptimizerConfig::default();
        assert!(evaluate(&results, &chicken(), &target(), &config).is_none());
    }

    #[test]
    fn test_evaluate_prefers_closer_result() {
        let results = vec![
            SolverResult::success("far", vec![120.0]),
            SolverResult::success("close", vec![199.0]),
            SolverResult::failure("broken", 1),
        ];
        let config = OptimizerConfig::default();
        let best = evaluate(&results, &chicken(), &target(), &config).unwrap();
        assert_eq!(best.result.method, "close");
        assert!(best.verdict.overall);
    }

    #[test]
    fn test_achievement_bonus_beats_marginal_objective_gain() {
        let config = OptimizerConfig::default();
        let t = MacroVector::new(100.0, 100.0, 100.0, 100.0);

        // Everything inside the band.
        let inside = MacroVector::new(104.0, 104.0, 104.0, 104.0);
        // Three macros perfect, protein just outside.
        let outside = MacroVector::new(100.0, 94.0, 100.0, 100.0);

        let v_in = achievement::check(&inside, &t, &config.tolerances);
        let v_out = achievement::check(&outside, &t, &config.tolerances);
        assert!(v_in.overall && !v_out.overall);
        assert!(score_totals(&inside, &t, &v_in, &config) < score_totals(&outside, &t, &v_out, &config));
    }

    #[test]
    fn test_ties_keep_portfolio_order() {
        let results = vec![
            SolverResult::success("first", vec![200.0]),
            SolverResult::success("second", vec![200.0]),
        ];
        let config = OptimizerConfig::default();
        let best = evaluate(&results, &chicken(), &target(), &config).unwrap();
        assert_eq!(best.result.method, "first");
    }
}
