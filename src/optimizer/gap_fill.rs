//! optimize → gap-fill → re-optimize.
//!
//! ```text
//! INITIAL_SOLVE → CHECK → DONE                                   (target met)
//! CHECK → SELECT_HELPERS → MERGE → RESOLVE → FINAL_CHECK → DONE  (target not met)
//! ```

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::catalog::{merge_helpers, normalize_records};
use crate::error::{OptimizerError, Result};
use crate::models::{Ingredient, MacroVector, MealItem, MealOutcome, MealRequest};
use crate::optimizer::config::OptimizerConfig;
use crate::optimizer::evaluator::{ScoredResult, evaluate, score_result};
use crate::optimizer::helpers::HelperSelector;
use crate::optimizer::recommendations::recommend;
use crate::optimizer::solvers::{GreedySolver, Portfolio, Problem, Solver, SolverResult, sanitize};

/// Runs the solver portfolio and, when the target is missed, adds helper
/// ingredients and solves again.
pub struct GapFillController {
    config: OptimizerConfig,
    portfolio: Portfolio,
}

impl GapFillController {
    pub fn new(config: OptimizerConfig) -> Self {
        let portfolio = Portfolio::standard(&config);
        Self { config, portfolio }
    }

    /// Controller racing a custom set of solvers.
    pub fn with_portfolio(config: OptimizerConfig, portfolio: Portfolio) -> Self {
        Self { config, portfolio }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Best result of the portfolio, or the greedy fallback when every member
    /// failed.
    pub fn solve(&self, ingredients: &[Ingredient], target: &MacroVector) -> ScoredResult {
        let problem = Problem::new(ingredients, *target, &self.config);
        let results = self.portfolio.run(&problem);

        match evaluate(&results, ingredients, target, &self.config) {
            Some(best) => best,
            None => {
                warn!("no solver succeeded, falling back to greedy");
                let fallback = sanitize(GreedySolver.solve(&problem), &problem);
                score_result(&fallback, ingredients, target, &self.config)
            }
        }
    }

    /// Optimize one meal request.
    ///
    /// Fails only on invalid input; an unmet target is reported through the
    /// verdict.
    pub fn optimize(&self, request: &MealRequest) -> Result<MealOutcome> {
        let started = Instant::now();
        self.config.validate()?;
        let target = request.target;
        if !target.is_valid() {
            return Err(OptimizerError::InvalidInput(
                "target macros must be finite and non-negative".to_string(),
            ));
        }

        let ingredients = normalize_records(&request.ingredients, self.config.default_max_quantity)?;
        if ingredients.is_empty() {
            return Err(OptimizerError::InvalidInput("ingredient list is empty".to_string()));
        }
        let input_count = ingredients.len();

        info!(ingredients = input_count, meal_time = %request.meal_time, "optimizing meal");
        for ingredient in &ingredients {
            debug!("{}", ingredient.debug_string());
        }
        if !request.preferences.is_empty() {
            debug!(preferences = ?request.preferences, "helper candidates restricted");
        }

        let initial = self.solve(&ingredients, &target);
        if initial.verdict.overall {
            info!(method = initial.result.method, "target met on first pass");
            return Ok(self.outcome(&ingredients, initial, &target, input_count, started));
        }

        let helpers = HelperSelector::new(request.meal_time, &request.preferences, &self.config.helpers).select(
            &ingredients,
            &initial.result.quantities,
            &initial.totals,
            &target,
        );
        if helpers.is_empty() {
            info!(missed = ?initial.verdict.missed(), "target missed, no helper applicable");
            return Ok(self.outcome(&ingredients, initial, &target, input_count, started));
        }

        let merged = merge_helpers(&ingredients, &helpers);
        info!(helpers = helpers.len(), "re-solving with helper ingredients");
        let resolved = self.solve(&merged, &target);
        let (kept, resolved) = self.prune_helpers(merged, resolved, &target);

        info!(
            method = resolved.result.method,
            achieved = resolved.verdict.overall,
            "gap fill finished"
        );
        Ok(self.outcome(&kept, resolved, &target, input_count, started))
    }

    /// Drop helpers that ended below the minimum amount and rescore.
    fn prune_helpers(
        &self,
        ingredients: Vec<Ingredient>,
        scored: ScoredResult,
        target: &MacroVector,
    ) -> (Vec<Ingredient>, ScoredResult) {
        let min = self.config.helpers.min_helper_quantity;
        let keep = |ing: &Ingredient, q: f64| !ing.is_helper || q >= min;

        if ingredients
            .iter()
            .zip(&scored.result.quantities)
            .all(|(ing, &q)| keep(ing, q))
        {
            return (ingredients, scored);
        }

        let (kept, quantities): (Vec<Ingredient>, Vec<f64>) = ingredients
            .into_iter()
            .zip(scored.result.quantities.iter().copied())
            .filter(|(ing, q)| {
                let ok = keep(ing, *q);
                if !ok {
                    debug!(helper = %ing.name, grams = q, "pruning negligible helper");
                }
                ok
            })
            .unzip();

        let result = SolverResult {
            quantities,
            ..scored.result
        };
        let rescored = score_result(&result, &kept, target, &self.config);
        (kept, rescored)
    }

    fn outcome(
        &self,
        ingredients: &[Ingredient],
        scored: ScoredResult,
        target: &MacroVector,
        input_count: usize,
        started: Instant,
    ) -> MealOutcome {
        let items = ingredients
            .iter()
            .zip(&scored.result.quantities)
            .map(|(ing, &q)| MealItem {
                name: ing.name.clone(),
                quantity_grams: q,
                macros: ing.profile.for_grams(q),
                is_helper: ing.is_helper,
            })
            .collect();

        MealOutcome {
            method_used: scored.result.method.to_string(),
            success: scored.result.success,
            items,
            totals: scored.totals,
            verdict: scored.verdict,
            helpers_added: ingredients
                .iter()
                .filter(|i| i.is_helper)
                .map(|i| i.name.clone())
                .collect(),
            score: scored.score,
            recommendations: recommend(&scored.totals, target, &self.config.recommendations),
            input_count,
            elapsed_ms: started.elapsed().as_millis(),
        }
    }
}
