//! Dense two-phase simplex for small linear programs.
//!
//! All variables are non-negative. Bland's rule is used for both the entering
//! and leaving choice, so the method cannot cycle; the pivot cap bounds the
//! work regardless.

use thiserror::Error;

const EPS: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

impl Relation {
    fn flipped(self) -> Self {
        match self {
            Relation::LessEq => Relation::GreaterEq,
            Relation::GreaterEq => Relation::LessEq,
            Relation::Equal => Relation::Equal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LpError {
    #[error("linear program is infeasible")]
    Infeasible,

    #[error("linear program is unbounded")]
    Unbounded,

    #[error("pivot limit reached")]
    IterationLimit,
}

#[derive(Debug, Clone)]
struct Constraint {
    coeffs: Vec<f64>,
    relation: Relation,
    rhs: f64,
}

/// `minimize c·x` subject to linear constraints and `x >= 0`.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    objective: Vec<f64>,
    constraints: Vec<Constraint>,
}

/// Optimal point and objective value.
#[derive(Debug, Clone)]
pub struct LpSolution {
    pub values: Vec<f64>,
    pub objective: f64,
}

impl LinearProgram {
    pub fn minimize(objective: Vec<f64>) -> Self {
        Self {
            objective,
            constraints: Vec::new(),
        }
    }

    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }

    /// Add `coeffs·x (relation) rhs`. Short coefficient vectors are zero-padded.
    pub fn constrain(&mut self, mut coeffs: Vec<f64>, relation: Relation, rhs: f64) {
        coeffs.resize(self.num_vars(), 0.0);
        self.constraints.push(Constraint {
            coeffs,
            relation,
            rhs,
        });
    }

    pub fn solve(&self, max_pivots: usize) -> Result<LpSolution, LpError> {
        let n = self.num_vars();
        let m = self.constraints.len();

        // Make every right-hand side non-negative.
        let rows: Vec<Constraint> = self
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    Constraint {
                        coeffs: c.coeffs.iter().map(|v| -v).collect(),
                        relation: c.relation.flipped(),
                        rhs: -c.rhs,
                    }
                } else {
                    c.clone()
                }
            })
            .collect();

        let n_slack = rows.iter().filter(|r| r.relation != Relation::Equal).count();
        let n_art = rows.iter().filter(|r| r.relation != Relation::LessEq).count();
        let art_start = n + n_slack;
        let width = art_start + n_art;

        let mut tableau = Tableau {
            rows: vec![vec![0.0; width + 1]; m],
            basis: vec![0; m],
            rhs: width,
            pivots: 0,
            max_pivots,
        };

        let (mut slack, mut art) = (n, art_start);
        for (i, row) in rows.iter().enumerate() {
            tableau.rows[i][..n].copy_from_slice(&row.coeffs);
            tableau.rows[i][width] = row.rhs;
            match row.relation {
                Relation::LessEq => {
                    tableau.rows[i][slack] = 1.0;
                    tableau.basis[i] = slack;
                    slack += 1;
                }
                Relation::GreaterEq => {
                    tableau.rows[i][slack] = -1.0;
                    slack += 1;
                    tableau.rows[i][art] = 1.0;
                    tableau.basis[i] = art;
                    art += 1;
                }
                Relation::Equal => {
                    tableau.rows[i][art] = 1.0;
                    tableau.basis[i] = art;
                    art += 1;
                }
            }
        }

        if n_art > 0 {
            let mut phase_one = vec![0.0; width];
            phase_one[art_start..].fill(1.0);
            match tableau.optimize(&phase_one, width) {
                Ok(()) => {}
                // Phase one is bounded below by zero.
                Err(LpError::Unbounded) => return Err(LpError::Infeasible),
                Err(e) => return Err(e),
            }

            let scale = 1.0 + rows.iter().map(|r| r.rhs).fold(0.0, f64::max);
            if tableau.value(&phase_one) > 1e-7 * scale {
                return Err(LpError::Infeasible);
            }
            tableau.drive_out_artificials(art_start);
        }

        let mut cost = vec![0.0; width];
        cost[..n].copy_from_slice(&self.objective);
        tableau.optimize(&cost, art_start)?;

        let mut values = vec![0.0; n];
        for (i, &b) in tableau.basis.iter().enumerate() {
            if b < n {
                values[b] = tableau.rows[i][width].max(0.0);
            }
        }
        let objective = self.objective.iter().zip(&values).map(|(c, x)| c * x).sum();

        Ok(LpSolution { values, objective })
    }
}

struct Tableau {
    rows: Vec<Vec<f64>>,
    basis: Vec<usize>,
    /// Column index of the right-hand side.
    rhs: usize,
    pivots: usize,
    max_pivots: usize,
}

impl Tableau {
    fn value(&self, cost: &[f64]) -> f64 {
        self.basis
            .iter()
            .zip(&self.rows)
            .map(|(&b, row)| cost[b] * row[self.rhs])
            .sum()
    }

    fn reduced_cost(&self, cost: &[f64], col: usize) -> f64 {
        let z: f64 = self
            .basis
            .iter()
            .zip(&self.rows)
            .map(|(&b, row)| cost[b] * row[col])
            .sum();
        cost[col] - z
    }

    /// Primal simplex; only columns below `enter_limit` may enter the basis.
    fn optimize(&mut self, cost: &[f64], enter_limit: usize) -> Result<(), LpError> {
        loop {
            let entering = (0..enter_limit)
                .filter(|j| !self.basis.contains(j))
                .find(|&j| self.reduced_cost(cost, j) < -EPS);

            let Some(col) = entering else {
                return Ok(());
            };

            if self.pivots >= self.max_pivots {
                return Err(LpError::IterationLimit);
            }

            let mut leaving: Option<(usize, f64)> = None;
            for (i, row) in self.rows.iter().enumerate() {
                let a = row[col];
                if a <= EPS {
                    continue;
                }
                let ratio = row[self.rhs] / a;
                leaving = match leaving {
                    Some((li, lr))
                        if ratio > lr + EPS || (ratio >= lr - EPS && self.basis[li] < self.basis[i]) =>
                    {
                        Some((li, lr))
                    }
                    _ => Some((i, ratio)),
                };
            }

            let Some((row, _)) = leaving else {
                return Err(LpError::Unbounded);
            };
            self.pivot(row, col);
        }
    }

    fn pivot(&mut self, r: usize, c: usize) {
        let p = self.rows[r][c];
        for v in self.rows[r].iter_mut() {
            *v /= p;
        }
        let pivot_row = self.rows[r].clone();
        for (i, row) in self.rows.iter_mut().enumerate() {
            if i == r {
                continue;
            }
            let factor = row[c];
            if factor != 0.0 {
                for (v, pv) in row.iter_mut().zip(&pivot_row) {
                    *v -= factor * pv;
                }
            }
        }
        self.basis[r] = c;
        self.pivots += 1;
    }

    /// Replace zero-valued artificial basics by real columns where possible.
    fn drive_out_artificials(&mut self, art_start: usize) {
        for r in 0..self.rows.len() {
            if self.basis[r] < art_start {
                continue;
            }
            if let Some(c) = (0..art_start).find(|&c| self.rows[r][c].abs() > EPS) {
                self.pivot(r, c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_minimum() {
        // min x + y  s.t. x + 2y >= 4, 3x + y >= 6
        let mut lp = LinearProgram::minimize(vec![1.0, 1.0]);
        lp.constrain(vec![1.0, 2.0], Relation::GreaterEq, 4.0);
        lp.constrain(vec![3.0, 1.0], Relation::GreaterEq, 6.0);
        let sol = lp.solve(100).unwrap();
        assert!((sol.values[0] - 1.6).abs() < 1e-6);
        assert!((sol.values[1] - 1.2).abs() < 1e-6);
        assert!((sol.objective - 2.8).abs() < 1e-6);
    }

    #[test]
    fn test_upper_bounds_and_equality() {
        // min -x - 2y  s.t. x <= 3, y <= 2, x + y = 4
        let mut lp = LinearProgram::minimize(vec![-1.0, -2.0]);
        lp.constrain(vec![1.0], Relation::LessEq, 3.0);
        lp.constrain(vec![0.0, 1.0], Relation::LessEq, 2.0);
        lp.constrain(vec![1.0, 1.0], Relation::Equal, 4.0);
        let sol = lp.solve(100).unwrap();
        assert!((sol.values[0] - 2.0).abs() < 1e-6);
        assert!((sol.values[1] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_infeasible() {
        let mut lp = LinearProgram::minimize(vec![1.0]);
        lp.constrain(vec![1.0], Relation::LessEq, 3.0);
        lp.constrain(vec![1.0], Relation::GreaterEq, 5.0);
        assert_eq!(lp.solve(100).unwrap_err(), LpError::Infeasible);
    }

    #[test]
    fn test_unbounded() {
        let mut lp = LinearProgram::minimize(vec![-1.0]);
        lp.constrain(vec![1.0], Relation::GreaterEq, 1.0);
        assert_eq!(lp.solve(100).unwrap_err(), LpError::Unbounded);
    }

    #[test]
    fn test_negative_rhs_is_normalized() {
        // -x <= -2  ==  x >= 2
        let mut lp = LinearProgram::minimize(vec![1.0]);
        lp.constrain(vec![-1.0], Relation::LessEq, -2.0);
        let sol = lp.solve(100).unwrap();
        assert!((sol.values[0] - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_pivot_cap() {
        let mut lp = LinearProgram::minimize(vec![1.0, 1.0]);
        lp.constrain(vec![1.0, 2.0], Relation::GreaterEq, 4.0);
        lp.constrain(vec![3.0, 1.0], Relation::GreaterEq, 6.0);
        assert_eq!(lp.solve(0).unwrap_err(), LpError::IterationLimit);
    }
}
