// ─────────────────────────────────────────────────────────────────────────────
// Tolerance bands
// ─────────────────────────────────────────────────────────────────────────────

/// Allowed relative deviation for calories (a derived, summed quantity).
pub const CALORIE_TOLERANCE: f64 = 0.10;

/// Allowed relative deviation for protein, carbs and fat.
pub const MACRO_TOLERANCE: f64 = 0.05;

/// Absolute slack in kcal, so tiny targets are not held to sub-calorie precision.
pub const CALORIE_ABS_FLOOR: f64 = 5.0;

/// Absolute slack in grams for protein, carbs and fat.
pub const MACRO_ABS_FLOOR: f64 = 0.5;

// ─────────────────────────────────────────────────────────────────────────────
// Objective and scoring
// ─────────────────────────────────────────────────────────────────────────────

pub const CALORIE_WEIGHT: f64 = 1.0;
pub const PROTEIN_WEIGHT: f64 = 2.0;
pub const CARBS_WEIGHT: f64 = 1.0;
pub const FAT_WEIGHT: f64 = 0.8;

/// Multiplier on the calorie term when the target is exceeded.
pub const CALORIE_OVERSHOOT_FACTOR: f64 = 2.0;

/// Relative deviation under which the evaluator applies the light penalty.
pub const SCORE_SOFT_BAND: f64 = 0.05;
pub const LIGHT_PENALTY: f64 = 1.0;
pub const HEAVY_PENALTY: f64 = 10.0;

/// Score multiplier for results that pass every tolerance band.
pub const ACHIEVEMENT_BONUS: f64 = 0.5;

// ─────────────────────────────────────────────────────────────────────────────
// Solver budgets
// ─────────────────────────────────────────────────────────────────────────────

/// Fraction of each gram target the LP must reach.
pub const LP_MACRO_FLOOR: f64 = 0.95;
pub const LP_CALORIE_LOW: f64 = 0.90;
pub const LP_CALORIE_HIGH: f64 = 1.10;
pub const LP_MAX_PIVOTS: usize = 2_000;

pub const GA_POPULATION: usize = 60;
pub const GA_GENERATIONS: usize = 80;
pub const GA_CROSSOVER_PROB: f64 = 0.7;
pub const GA_BLEND_ALPHA: f64 = 0.5;
pub const GA_MUTATION_GENE_PROB: f64 = 0.15;
/// Mutation sigma as a fraction of the ingredient's upper bound.
pub const GA_MUTATION_SIGMA: f64 = 0.10;
pub const GA_TOURNAMENT_SIZE: usize = 3;

pub const DE_POP_PER_DIM: usize = 15;
pub const DE_MIN_POPULATION: usize = 20;
pub const DE_MAX_POPULATION: usize = 150;
pub const DE_GENERATIONS: usize = 150;
pub const DE_DIFFERENTIAL_WEIGHT: f64 = 0.7;
pub const DE_CROSSOVER_PROB: f64 = 0.8;
pub const DE_REL_TOL: f64 = 0.01;
pub const DE_ABS_TOL: f64 = 1e-6;

/// Grams added per greedy step.
pub const GREEDY_INCREMENT: f64 = 10.0;
pub const GREEDY_MAX_STEPS: usize = 1_000;

/// Seed shared by the stochastic solvers.
pub const DEFAULT_RNG_SEED: u64 = 42;

// ─────────────────────────────────────────────────────────────────────────────
// Gap fill
// ─────────────────────────────────────────────────────────────────────────────

/// Deficits at or below this many grams are left alone.
pub const MIN_DEFICIT_GRAMS: f64 = 1.0;

/// Quantity from which an ingredient "occupies" its category.
pub const MEANINGFUL_QUANTITY: f64 = 10.0;

pub const MAX_HELPERS: usize = 3;

/// Weight of the incidental-macro penalty when ranking helpers.
pub const HELPER_BALANCE_WEIGHT: f64 = 0.25;

/// Helpers below this final amount are pruned from the meal.
pub const MIN_HELPER_QUANTITY: f64 = 5.0;

/// Upper bound for caller ingredients that do not specify one.
pub const DEFAULT_MAX_QUANTITY: f64 = 300.0;

/// Share of a target under which a recommendation is emitted.
pub const RECOMMENDATION_THRESHOLD: f64 = 0.9;
