//! Independent quantity solvers behind one interface.
//!
//! The racing portfolio is fixed: linear programming, genetic algorithm,
//! differential evolution and the GA→DE hybrid. The greedy solver is kept out
//! of the race and used when none of them succeeds.

mod differential;
mod genetic;
mod greedy;
mod hybrid;
mod linear;
mod simplex;

use rand::Rng;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use crate::models::{Ingredient, MacroVector};
use crate::optimizer::config::OptimizerConfig;
use crate::optimizer::objective::objective;

pub use differential::DifferentialEvolutionSolver;
pub use genetic::GeneticSolver;
pub use greedy::GreedySolver;
pub use hybrid::HybridSolver;
pub use linear::LinearProgrammingSolver;
pub use simplex::{LinearProgram, LpError, Relation};

/// Everything a solver needs for one run.
pub struct Problem<'a> {
    pub ingredients: &'a [Ingredient],
    pub target: MacroVector,
    pub config: &'a OptimizerConfig,
}

impl<'a> Problem<'a> {
    pub fn new(ingredients: &'a [Ingredient], target: MacroVector, config: &'a OptimizerConfig) -> Self {
        Self {
            ingredients,
            target,
            config,
        }
    }

    pub fn dims(&self) -> usize {
        self.ingredients.len()
    }

    /// Upper bound of ingredient `i`.
    #[inline]
    pub fn bound(&self, i: usize) -> f64 {
        self.ingredients[i].max_quantity
    }

    /// Objective value of a candidate.
    #[inline]
    pub fn cost(&self, quantities: &[f64]) -> f64 {
        objective(quantities, self.ingredients, &self.target, &self.config.weights)
    }

    /// Clamp every entry into `[0, max_quantity]`.
    pub fn clamp(&self, quantities: &mut [f64]) {
        for (q, ingredient) in quantities.iter_mut().zip(self.ingredients) {
            *q = q.clamp(0.0, ingredient.max_quantity);
        }
    }

    /// Uniform random point inside the bounds.
    pub fn random_point(&self, rng: &mut impl Rng) -> Vec<f64> {
        self.ingredients
            .iter()
            .map(|i| rng.gen_range(0.0..=i.max_quantity))
            .collect()
    }
}

/// Output of one solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverResult {
    pub method: &'static str,
    pub quantities: Vec<f64>,
    pub success: bool,
}

impl SolverResult {
    pub fn success(method: &'static str, quantities: Vec<f64>) -> Self {
        Self {
            method,
            quantities,
            success: true,
        }
    }

    /// A failed run with an all-zero vector of the right length.
    pub fn failure(method: &'static str, dims: usize) -> Self {
        Self {
            method,
            quantities: vec![0.0; dims],
            success: false,
        }
    }
}

/// Common solver contract.
///
/// Implementations report failure through `SolverResult::success` and never
/// panic on a well-formed problem.
pub trait Solver: Send + Sync {
    fn name(&self) -> &'static str;

    fn solve(&self, problem: &Problem) -> SolverResult;
}

/// Make a result safe to evaluate: non-finite or misaligned vectors fail,
/// stray values are clamped into bounds.
pub fn sanitize(mut result: SolverResult, problem: &Problem) -> SolverResult {
    if result.quantities.len() != problem.dims() || result.quantities.iter().any(|q| !q.is_finite()) {
        if result.success {
            warn!(method = result.method, "discarding malformed solver output");
        }
        return SolverResult::failure(result.method, problem.dims());
    }
    problem.clamp(&mut result.quantities);
    result
}

/// The fixed set of racing solvers.
pub struct Portfolio {
    solvers: Vec<Box<dyn Solver>>,
    pool: Option<ThreadPool>,
}

impl Portfolio {
    /// LP, GA, DE and hybrid, in that order.
    pub fn standard(config: &OptimizerConfig) -> Self {
        let solvers: Vec<Box<dyn Solver>> = vec![
            Box::new(LinearProgrammingSolver),
            Box::new(GeneticSolver::new(config.rng_seed)),
            Box::new(DifferentialEvolutionSolver::new(config.rng_seed.wrapping_add(1))),
            Box::new(HybridSolver::new(config.rng_seed.wrapping_add(2))),
        ];
        Self::with_solvers(solvers, config.parallel)
    }

    pub fn with_solvers(solvers: Vec<Box<dyn Solver>>, parallel: bool) -> Self {
        let pool = if parallel && solvers.len() > 1 {
            match ThreadPoolBuilder::new().num_threads(solvers.len()).build() {
                Ok(pool) => Some(pool),
                Err(e) => {
                    warn!("solver pool unavailable, running sequentially: {e}");
                    None
                }
            }
        } else {
            None
        };
        Self { solvers, pool }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.solvers.iter().map(|s| s.name()).collect()
    }

    /// Run every member; results come back in portfolio order.
    pub fn run(&self, problem: &Problem) -> Vec<SolverResult> {
        let run_one = |solver: &Box<dyn Solver>| {
            let result = sanitize(solver.solve(problem), problem);
            debug!(
                method = result.method,
                success = result.success,
                "solver finished"
            );
            result
        };

        match &self.pool {
            Some(pool) => pool.install(|| self.solvers.par_iter().map(run_one).collect()),
            None => self.solvers.iter().map(run_one).collect(),
        }
    }
}
