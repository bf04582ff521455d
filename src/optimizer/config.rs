use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OptimizerError, Result};
use crate::models::Macro;
use crate::optimizer::constants::*;

/// Tolerance bands for the achievement checker.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub calories: f64,
    pub macros: f64,
    pub calorie_abs_floor: f64,
    pub macro_abs_floor: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            calories: CALORIE_TOLERANCE,
            macros: MACRO_TOLERANCE,
            calorie_abs_floor: CALORIE_ABS_FLOOR,
            macro_abs_floor: MACRO_ABS_FLOOR,
        }
    }
}

impl Tolerances {
    /// Relative band for one macro.
    pub fn band(&self, m: Macro) -> f64 {
        match m {
            Macro::Calories => self.calories,
            _ => self.macros,
        }
    }

    /// Absolute floor for one macro.
    pub fn floor(&self, m: Macro) -> f64 {
        match m {
            Macro::Calories => self.calorie_abs_floor,
            _ => self.macro_abs_floor,
        }
    }
}

/// Per-macro weights shared by the objective and the evaluator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectiveWeights {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub calorie_overshoot_factor: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            calories: CALORIE_WEIGHT,
            protein: PROTEIN_WEIGHT,
            carbs: CARBS_WEIGHT,
            fat: FAT_WEIGHT,
            calorie_overshoot_factor: CALORIE_OVERSHOOT_FACTOR,
        }
    }
}

impl ObjectiveWeights {
    #[inline]
    pub fn weight(&self, m: Macro) -> f64 {
        match m {
            Macro::Calories => self.calories,
            Macro::Protein => self.protein,
            Macro::Carbs => self.carbs,
            Macro::Fat => self.fat,
        }
    }
}

/// Result-evaluator knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringParams {
    pub soft_band: f64,
    pub light_penalty: f64,
    pub heavy_penalty: f64,
    pub achievement_bonus: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            soft_band: SCORE_SOFT_BAND,
            light_penalty: LIGHT_PENALTY,
            heavy_penalty: HEAVY_PENALTY,
            achievement_bonus: ACHIEVEMENT_BONUS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearParams {
    pub macro_floor: f64,
    pub calorie_low: f64,
    pub calorie_high: f64,
    pub max_pivots: usize,
}

impl Default for LinearParams {
    fn default() -> Self {
        Self {
            macro_floor: LP_MACRO_FLOOR,
            calorie_low: LP_CALORIE_LOW,
            calorie_high: LP_CALORIE_HIGH,
            max_pivots: LP_MAX_PIVOTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneticParams {
    pub population: usize,
    pub generations: usize,
    pub crossover_prob: f64,
    pub blend_alpha: f64,
    pub mutation_gene_prob: f64,
    pub mutation_sigma: f64,
    pub tournament_size: usize,
}

impl Default for GeneticParams {
    fn default() -> Self {
        Self {
            population: GA_POPULATION,
            generations: GA_GENERATIONS,
            crossover_prob: GA_CROSSOVER_PROB,
            blend_alpha: GA_BLEND_ALPHA,
            mutation_gene_prob: GA_MUTATION_GENE_PROB,
            mutation_sigma: GA_MUTATION_SIGMA,
            tournament_size: GA_TOURNAMENT_SIZE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DifferentialParams {
    pub pop_per_dim: usize,
    pub min_population: usize,
    pub max_population: usize,
    pub generations: usize,
    pub differential_weight: f64,
    pub crossover_prob: f64,
    pub rel_tol: f64,
    pub abs_tol: f64,
}

impl Default for DifferentialParams {
    fn default() -> Self {
        Self {
            pop_per_dim: DE_POP_PER_DIM,
            min_population: DE_MIN_POPULATION,
            max_population: DE_MAX_POPULATION,
            generations: DE_GENERATIONS,
            differential_weight: DE_DIFFERENTIAL_WEIGHT,
            crossover_prob: DE_CROSSOVER_PROB,
            rel_tol: DE_REL_TOL,
            abs_tol: DE_ABS_TOL,
        }
    }
}

impl DifferentialParams {
    /// Population size for a problem with `dims` ingredients.
    pub fn population_for(&self, dims: usize) -> usize {
        (self.pop_per_dim * dims).clamp(self.min_population, self.max_population.max(self.min_population))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GreedyParams {
    pub increment: f64,
    pub max_steps: usize,
}

impl Default for GreedyParams {
    fn default() -> Self {
        Self {
            increment: GREEDY_INCREMENT,
            max_steps: GREEDY_MAX_STEPS,
        }
    }
}

/// Helper selection and gap-fill knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HelperParams {
    pub min_deficit_grams: f64,
    pub meaningful_quantity: f64,
    pub max_helpers: usize,
    pub balance_weight: f64,
    pub min_helper_quantity: f64,
}

impl Default for HelperParams {
    fn default() -> Self {
        Self {
            min_deficit_grams: MIN_DEFICIT_GRAMS,
            meaningful_quantity: MEANINGFUL_QUANTITY,
            max_helpers: MAX_HELPERS,
            balance_weight: HELPER_BALANCE_WEIGHT,
            min_helper_quantity: MIN_HELPER_QUANTITY,
        }
    }
}

/// Outcome advice knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationParams {
    /// Share of a target under which a macro gets a recommendation.
    pub threshold: f64,
}

impl Default for RecommendationParams {
    fn default() -> Self {
        Self {
            threshold: RECOMMENDATION_THRESHOLD,
        }
    }
}

/// Every tunable value of the engine.
///
/// Missing fields in a JSON override fall back to the defaults in
/// `constants.rs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    pub tolerances: Tolerances,
    pub weights: ObjectiveWeights,
    pub scoring: ScoringParams,
    pub linear: LinearParams,
    pub genetic: GeneticParams,
    pub differential: DifferentialParams,
    pub greedy: GreedyParams,
    pub helpers: HelperParams,
    pub recommendations: RecommendationParams,
    pub default_max_quantity: f64,
    pub rng_seed: u64,
    /// Run portfolio members on a thread pool.
    pub parallel: bool,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            tolerances: Tolerances::default(),
            weights: ObjectiveWeights::default(),
            scoring: ScoringParams::default(),
            linear: LinearParams::default(),
            genetic: GeneticParams::default(),
            differential: DifferentialParams::default(),
            greedy: GreedyParams::default(),
            helpers: HelperParams::default(),
            recommendations: RecommendationParams::default(),
            default_max_quantity: DEFAULT_MAX_QUANTITY,
            rng_seed: DEFAULT_RNG_SEED,
            parallel: true,
        }
    }
}

impl OptimizerConfig {
    /// Load overrides from a JSON file and validate them.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the solvers cannot run with.
    pub fn validate(&self) -> Result<()> {
        if !(self.default_max_quantity.is_finite() && self.default_max_quantity > 0.0) {
            return Err(invalid("default_max_quantity", self.default_max_quantity, "must be positive"));
        }

        let t = &self.tolerances;
        let w = &self.weights;
        let sc = &self.scoring;
        let h = &self.helpers;
        let non_negative = [
            ("tolerances.calories", t.calories),
            ("tolerances.macros", t.macros),
            ("tolerances.calorie_abs_floor", t.calorie_abs_floor),
            ("tolerances.macro_abs_floor", t.macro_abs_floor),
            ("weights.calories", w.calories),
            ("weights.protein", w.protein),
            ("weights.carbs", w.carbs),
            ("weights.fat", w.fat),
            ("weights.calorie_overshoot_factor", w.calorie_overshoot_factor),
            ("scoring.soft_band", sc.soft_band),
            ("scoring.light_penalty", sc.light_penalty),
            ("scoring.heavy_penalty", sc.heavy_penalty),
            ("scoring.achievement_bonus", sc.achievement_bonus),
            ("linear.calorie_low", self.linear.calorie_low),
            ("linear.calorie_high", self.linear.calorie_high),
            ("genetic.blend_alpha", self.genetic.blend_alpha),
            ("genetic.mutation_sigma", self.genetic.mutation_sigma),
            ("differential.differential_weight", self.differential.differential_weight),
            ("differential.rel_tol", self.differential.rel_tol),
            ("differential.abs_tol", self.differential.abs_tol),
            ("helpers.min_deficit_grams", h.min_deficit_grams),
            ("helpers.meaningful_quantity", h.meaningful_quantity),
            ("helpers.balance_weight", h.balance_weight),
            ("helpers.min_helper_quantity", h.min_helper_quantity),
            ("recommendations.threshold", self.recommendations.threshold),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(field, value, "must be a non-negative number"));
            }
        }

        let probabilities = [
            ("linear.macro_floor", self.linear.macro_floor),
            ("genetic.crossover_prob", self.genetic.crossover_prob),
            ("genetic.mutation_gene_prob", self.genetic.mutation_gene_prob),
            ("differential.crossover_prob", self.differential.crossover_prob),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(field, value, "must be within [0, 1]"));
            }
        }

        if self.linear.calorie_low > self.linear.calorie_high {
            return Err(invalid(
                "linear.calorie_low",
                self.linear.calorie_low,
                "must not exceed linear.calorie_high",
            ));
        }
        if !(self.greedy.increment.is_finite() && self.greedy.increment > 0.0) {
            return Err(invalid("greedy.increment", self.greedy.increment, "must be positive"));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }
}

fn invalid(field: &str, value: f64, rule: &str) -> OptimizerError {
    OptimizerError::InvalidInput(format!("config {field} {rule}, got {value}"))
}
