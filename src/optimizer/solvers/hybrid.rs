use rand::SeedableRng;
use rand::rngs::StdRng;

use super::differential::DifferentialEvolutionSolver;
use super::genetic::GeneticSolver;
use super::{Problem, Solver, SolverResult};

/// GA for a global sweep, then DE started from the GA's best individual.
pub struct HybridSolver {
    seed: u64,
}

impl HybridSolver {
    pub const NAME: &'static str = "hybrid";

    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Solver for HybridSolver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn solve(&self, problem: &Problem) -> SolverResult {
        if problem.dims() == 0 {
            return SolverResult::failure(Self::NAME, 0);
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let ga = GeneticSolver::evolve(problem, &mut rng);
        let de = DifferentialEvolutionSolver::evolve(problem, &mut rng, std::slice::from_ref(&ga.best));

        let ga_ok = ga.cost.is_finite();
        let quantities = if de.cost <= ga.cost { de.best } else { ga.best };

        SolverResult {
            method: Self::NAME,
            quantities,
            success: ga_ok || de.converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Ingredient, MacroVector};
    use crate::optimizer::config::OptimizerConfig;

    #[test]
    fn test_hybrid_not_worse_than_its_ga_phase() {
        let config = OptimizerConfig::default();
        let ing = vec![
            Ingredient::new("chicken_breast", MacroVector::new(165.0, 31.0, 0.0, 3.6), 300.0, Category::WhiteMeat),
            Ingredient::new("white_rice", MacroVector::new(130.0, 2.7, 28.0, 0.3), 300.0, Category::Grain),
            Ingredient::new("olive_oil", MacroVector::new(884.0, 0.0, 0.0, 100.0), 30.0, Category::FatOil),
        ];
        let problem = Problem::new(&ing, MacroVector::new(700.0, 60.0, 60.0, 20.0), &config);

        let mut rng = StdRng::seed_from_u64(11);
        let ga = GeneticSolver::evolve(&problem, &mut rng);

        let result = HybridSolver::new(11).solve(&problem);
        assert!(result.success);
        assert!(problem.cost(&result.quantities) <= ga.cost + 1e-12);
    }
}
