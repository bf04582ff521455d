use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use super::{Problem, Solver, SolverResult};
use crate::optimizer::config::GeneticParams;

/// Best individual found by one evolutionary run.
#[derive(Debug, Clone)]
pub struct Evolved {
    pub best: Vec<f64>,
    pub cost: f64,
}

/// Real-coded genetic algorithm: tournament selection, blend crossover,
/// Gaussian mutation and single-individual elitism.
pub struct GeneticSolver {
    seed: u64,
}

impl GeneticSolver {
    pub const NAME: &'static str = "genetic_algorithm";

    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn evolve(problem: &Problem, rng: &mut StdRng) -> Evolved {
        let params = &problem.config.genetic;
        let pop_size = params.population.max(2);

        let mut population: Vec<Vec<f64>> = (0..pop_size).map(|_| problem.random_point(rng)).collect();
        let mut fitness: Vec<f64> = population.iter().map(|x| problem.cost(x)).collect();

        let mut best = Evolved {
            best: population[0].clone(),
            cost: f64::INFINITY,
        };
        track_best(&population, &fitness, &mut best);

        for _ in 0..params.generations {
            let mut next = Vec::with_capacity(pop_size);
            next.push(best.best.clone());

            while next.len() < pop_size {
                let a = tournament(&fitness, params.tournament_size, rng);
                let b = tournament(&fitness, params.tournament_size, rng);
                let mut c1 = population[a].clone();
                let mut c2 = population[b].clone();

                if rng.gen_bool(params.crossover_prob.clamp(0.0, 1.0)) {
                    blend(&mut c1, &mut c2, params.blend_alpha, rng);
                }
                mutate(&mut c1, problem, params, rng);
                mutate(&mut c2, problem, params, rng);
                problem.clamp(&mut c1);
                problem.clamp(&mut c2);

                next.push(c1);
                if next.len() < pop_size {
                    next.push(c2);
                }
            }

            population = next;
            fitness = population.iter().map(|x| problem.cost(x)).collect();
            track_best(&population, &fitness, &mut best);
        }

        best
    }
}

fn track_best(population: &[Vec<f64>], fitness: &[f64], best: &mut Evolved) {
    for (individual, &f) in population.iter().zip(fitness) {
        if f < best.cost {
            best.cost = f;
            best.best = individual.clone();
        }
    }
}

fn tournament(fitness: &[f64], size: usize, rng: &mut StdRng) -> usize {
    let mut winner = rng.gen_range(0..fitness.len());
    for _ in 1..size.max(1) {
        let challenger = rng.gen_range(0..fitness.len());
        if fitness[challenger] < fitness[winner] {
            winner = challenger;
        }
    }
    winner
}

/// BLX-α: each child gene is drawn on the segment stretched by α on both sides.
fn blend(c1: &mut [f64], c2: &mut [f64], alpha: f64, rng: &mut StdRng) {
    for (x1, x2) in c1.iter_mut().zip(c2.iter_mut()) {
        let u: f64 = rng.gen_range(0.0..1.0);
        let gamma = (1.0 + 2.0 * alpha) * u - alpha;
        let (a, b) = (*x1, *x2);
        *x1 = (1.0 - gamma) * a + gamma * b;
        *x2 = gamma * a + (1.0 - gamma) * b;
    }
}

fn mutate(individual: &mut [f64], problem: &Problem, params: &GeneticParams, rng: &mut StdRng) {
    let p = params.mutation_gene_prob.clamp(0.0, 1.0);
    for (i, gene) in individual.iter_mut().enumerate() {
        if !rng.gen_bool(p) {
            continue;
        }
        if let Ok(normal) = Normal::new(0.0, params.mutation_sigma * problem.bound(i)) {
            *gene += normal.sample(rng);
        }
    }
}

impl Solver for GeneticSolver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn solve(&self, problem: &Problem) -> SolverResult {
        if problem.dims() == 0 {
            return SolverResult::failure(Self::NAME, 0);
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let evolved = Self::evolve(problem, &mut rng);
        if evolved.cost.is_finite() {
            SolverResult::success(Self::NAME, evolved.best)
        } else {
            SolverResult::failure(Self::NAME, problem.dims())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Ingredient, MacroVector};
    use crate::optimizer::config::OptimizerConfig;

    fn setup() -> (Vec<Ingredient>, MacroVector) {
        (
            vec![
                Ingredient::new("chicken_breast", MacroVector::new(165.0, 31.0, 0.0, 3.6), 300.0, Category::WhiteMeat),
                Ingredient::new("white_rice", MacroVector::new(130.0, 2.7, 28.0, 0.3), 300.0, Category::Grain),
            ],
            MacroVector::new(590.0, 67.4, 56.0, 7.8),
        )
    }

    #[test]
    fn test_same_seed_same_answer() {
        let config = OptimizerConfig::default();
        let (ing, target) = setup();
        let problem = Problem::new(&ing, target, &config);

        let a = GeneticSolver::new(5).solve(&problem);
        let b = GeneticSolver::new(5).solve(&problem);
        assert_eq!(a, b);
    }

    #[test]
    fn test_improves_on_empty_plate() {
        let config = OptimizerConfig::default();
        let (ing, target) = setup();
        let problem = Problem::new(&ing, target, &config);

        let result = GeneticSolver::new(42).solve(&problem);
        assert!(result.success);
        assert!(problem.cost(&result.quantities) < problem.cost(&[0.0, 0.0]));
        for (q, i) in result.quantities.iter().zip(&ing) {
            assert!(*q >= 0.0 && *q <= i.max_quantity);
        }
    }

    #[test]
    fn test_blend_keeps_gene_sum() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut c1 = vec![10.0, 50.0];
        let mut c2 = vec![30.0, 70.0];
        blend(&mut c1, &mut c2, 0.5, &mut rng);
        assert!((c1[0] + c2[0] - 40.0).abs() < 1e-9);
        assert!((c1[1] + c2[1] - 120.0).abs() < 1e-9);
    }
}
