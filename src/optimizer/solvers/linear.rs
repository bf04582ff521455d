use tracing::debug;

use super::simplex::{LinearProgram, Relation};
use super::{Problem, Solver, SolverResult};
use crate::models::Macro;

/// Exact solver over a linearised version of the problem.
///
/// Variables are the ingredient quantities followed by one deviation variable
/// per macro with `|achieved - target| <= d`. The objective minimises the
/// weighted relative deviations; protein, carbs and fat must reach a floor
/// share of their target and calories must stay inside a band.
pub struct LinearProgrammingSolver;

impl LinearProgrammingSolver {
    pub const NAME: &'static str = "linear_programming";

    fn build(problem: &Problem) -> LinearProgram {
        let n = problem.dims();
        let params = &problem.config.linear;
        let target = problem.target;

        let mut cost = vec![0.0; n + Macro::ALL.len()];
        for (k, &m) in Macro::ALL.iter().enumerate() {
            cost[n + k] = problem.config.weights.weight(m) / target.get(m).max(1.0);
        }
        let mut lp = LinearProgram::minimize(cost);

        for i in 0..n {
            let mut row = vec![0.0; i + 1];
            row[i] = 1.0;
            lp.constrain(row, Relation::LessEq, problem.bound(i));
        }

        for (k, &m) in Macro::ALL.iter().enumerate() {
            let content: Vec<f64> = problem
                .ingredients
                .iter()
                .map(|ing| ing.profile.get(m) / 100.0)
                .collect();
            let t = target.get(m);

            // achieved - d <= t   and   achieved + d >= t
            let mut upper = content.clone();
            upper.resize(n + Macro::ALL.len(), 0.0);
            upper[n + k] = -1.0;
            lp.constrain(upper, Relation::LessEq, t);

            let mut lower = content.clone();
            lower.resize(n + Macro::ALL.len(), 0.0);
            lower[n + k] = 1.0;
            lp.constrain(lower, Relation::GreaterEq, t);

            match m {
                Macro::Calories => {
                    lp.constrain(content.clone(), Relation::GreaterEq, t * params.calorie_low);
                    lp.constrain(content, Relation::LessEq, t * params.calorie_high);
                }
                _ if t > 0.0 => lp.constrain(content, Relation::GreaterEq, t * params.macro_floor),
                _ => {}
            }
        }
        lp
    }
}

impl Solver for LinearProgrammingSolver {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn solve(&self, problem: &Problem) -> SolverResult {
        let n = problem.dims();
        if n == 0 {
            return SolverResult::failure(Self::NAME, 0);
        }

        match Self::build(problem).solve(problem.config.linear.max_pivots) {
            Ok(solution) => SolverResult::success(Self::NAME, solution.values[..n].to_vec()),
            Err(e) => {
                debug!("linear program gave up: {e}");
                SolverResult::failure(Self::NAME, n)
            }
        }
    }
}
