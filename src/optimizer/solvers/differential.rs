use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Problem, Solver, SolverResult};

/// Outcome of a DE run.
#[derive(Debug, Clone)]
pub struct DeOutcome {
    pub best: Vec<f64>,
    pub cost: f64,
    /// Population energies settled within tolerance.
    pub converged: bool,
}

/// `rand/1/bin` differential evolution with bound clipping.
pub struct DifferentialEvolutionSolver {
    seed: u64,
}

impl DifferentialEvolutionSolver {
    pub const NAME: &'static str = "differential_evolution";

    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Run DE. `seeds` (clamped into bounds) take the first population slots;
    /// the rest is drawn uniformly.
    pub fn evolve(problem: &Problem, rng: &mut StdRng, seeds: &[Vec<f64>]) -> DeOutcome {
        let params = &problem.config.differential;
        let n = problem.dims();
        let np = params.population_for(n).max(4);

        let mut population: Vec<Vec<f64>> = seeds
            .iter()
            .filter(|s| s.len() == n)
            .take(np)
            .map(|s| {
                let mut s = s.clone();
                problem.clamp(&mut s);
                s
            })
            .collect();
        while population.len() < np {
            population.push(problem.random_point(rng));
        }
        let mut energies: Vec<f64> = population.iter().map(|x| problem.cost(x)).collect();

        let cr = params.crossover_prob.clamp(0.0, 1.0);
        let mut converged = false;

        for _ in 0..params.generations {
            for i in 0..np {
                let [r1, r2, r3] = distinct_others(i, np, rng);
                let forced = rng.gen_range(0..n);

                let mut trial = population[i].clone();
                for (j, gene) in trial.iter_mut().enumerate() {
                    if j == forced || rng.gen_bool(cr) {
                        let mutant = population[r1][j]
                            + params.differential_weight * (population[r2][j] - population[r3][j]);
                        *gene = mutant.clamp(0.0, problem.bound(j));
                    }
                }

                let energy = problem.cost(&trial);
                if energy <= energies[i] {
                    population[i] = trial;
                    energies[i] = energy;
                }
            }

            if settled(&energies, params.abs_tol, params.rel_tol) {
                converged = true;
                break;
            }
        }

        let (best_idx, &cost) = energies
            .iter()
            .enumerate()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .unwrap_or((0, &f64::INFINITY));

        DeOutcome {
            best: population.swap_remove(best_idx),
            cost,
            converged,
        }
    }
}

fn distinct_others(i: usize, np: usize, rng: &mut StdRng) -> [usize; 3] {
    let mut picked = [i; 3];
    for k in 0..3 {
        loop {
            let r = rng.gen_range(0..np);
            if r != i && !picked[..k].contains(&r) {
                picked[k] = r;
                break;
            }
        }
    }
    picked
}

/// std(energies) <= atol + tol * |mean(energies)|
fn settled(energies: &[f64], abs_tol: f64, rel_tol: f64) -> bool {
    let n = energies.len() as f64;
    let mean = energies.iter().sum::<f64>() / n;
    let var = energies.iter().map(|e| (e - mean).powi(2)).sum::<f64>() / n;
    var.sqrt() <= abs_tol + rel_tol * mean.abs()
}

impl Solver for DifferentialEvolutionSolver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn solve(&self, problem: &Problem) -> SolverResult {
        if problem.dims() == 0 {
            return SolverResult::failure(Self::NAME, 0);
        }
        let mut rng = StdRng::seed_from_u64(self.seed);
        let outcome = Self::evolve(problem, &mut rng, &[]);
        SolverResult {
            method: Self::NAME,
            quantities: outcome.best,
            success: outcome.converged,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Ingredient, MacroVector};
    use crate::optimizer::config::OptimizerConfig;

    #[test]
    fn test_converges_on_single_ingredient() {
        let config = OptimizerConfig::default();
        let ing = vec![Ingredient::new(
            "chicken_breast",
            MacroVector::new(165.0, 31.0, 0.0, 3.6),
            300.0,
            Category::WhiteMeat,
        )];
        let problem = Problem::new(&ing, MacroVector::new(330.0, 62.0, 0.0, 7.2), &config);

        let result = DifferentialEvolutionSolver::new(43).solve(&problem);
        assert!(result.success);
        assert!((result.quantities[0] - 200.0).abs() < 5.0);
    }

    #[test]
    fn test_seeded_population_never_gets_worse() {
        let config = OptimizerConfig::default();
        let ing = vec![
            Ingredient::new("chicken_breast", MacroVector::new(165.0, 31.0, 0.0, 3.6), 300.0, Category::WhiteMeat),
            Ingredient::new("white_rice", MacroVector::new(130.0, 2.7, 28.0, 0.3), 300.0, Category::Grain),
        ];
        let problem = Problem::new(&ing, MacroVector::new(590.0, 67.4, 56.0, 7.8), &config);
        let seed = vec![200.0, 200.0];

        let mut rng = StdRng::seed_from_u64(9);
        let outcome = DifferentialEvolutionSolver::evolve(&problem, &mut rng, &[seed.clone()]);
        assert!(outcome.cost <= problem.cost(&seed));
    }

    #[test]
    fn test_settled() {
        assert!(settled(&[1.0, 1.0, 1.0], 1e-6, 0.01));
        assert!(!settled(&[1.0, 2.0, 3.0], 1e-6, 0.01));
    }
}
