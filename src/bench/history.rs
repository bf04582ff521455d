use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::models::MealRequest;
use crate::optimizer::{GapFillController, OptimizerConfig};

/// One controller run in the history.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub request: String,
    pub seed: u64,
    pub method_used: String,
    pub achieved: bool,
    pub helpers_added: usize,
    pub score: f64,
    pub elapsed_ms: u128,
}

/// How often a solver's result was the one kept.
#[derive(Debug, Clone, Serialize)]
pub struct MethodStats {
    pub method: String,
    pub wins: usize,
    /// Wins that also met the target.
    pub achieved: usize,
}

impl MethodStats {
    /// Wins first, then achieved wins. Higher is better.
    pub fn cmp_score(&self, other: &Self) -> Ordering {
        self.wins
            .cmp(&other.wins)
            .then(self.achieved.cmp(&other.achieved))
            .then_with(|| other.method.cmp(&self.method))
    }
}

/// Aggregate view over a history.
#[derive(Debug, Clone, Serialize)]
pub struct BenchSummary {
    pub runs: usize,
    pub achieved_rate: f64,
    pub avg_score: f64,
    pub avg_elapsed_ms: f64,
    pub helper_rate: f64,
    /// Sorted best first.
    pub per_method: Vec<MethodStats>,
}

/// Run every request once per seed.
///
/// Requests rejected as invalid are logged and skipped.
pub fn run_bench(requests: &[(String, MealRequest)], seeds: &[u64], base: &OptimizerConfig) -> Vec<RunRecord> {
    let mut records = Vec::with_capacity(requests.len() * seeds.len());

    for &seed in seeds {
        let controller = GapFillController::new(base.clone().with_seed(seed));
        for (label, request) in requests {
            match controller.optimize(request) {
                Ok(outcome) => records.push(RunRecord {
                    request: label.clone(),
                    seed,
                    method_used: outcome.method_used,
                    achieved: outcome.verdict.overall,
                    helpers_added: outcome.helpers_added.len(),
                    score: outcome.score,
                    elapsed_ms: outcome.elapsed_ms,
                }),
                Err(e) => warn!(request = %label, seed, "skipping request: {e}"),
            }
        }
        info!(seed, runs = records.len(), "seed finished");
    }
    records
}

pub fn summarize(records: &[RunRecord]) -> BenchSummary {
    let runs = records.len();
    let share = |count: usize| if runs == 0 { 0.0 } else { count as f64 / runs as f64 };
    let mean = |sum: f64| if runs == 0 { 0.0 } else { sum / runs as f64 };

    let mut by_method: BTreeMap<&str, MethodStats> = BTreeMap::new();
    for record in records {
        let stats = by_method
            .entry(record.method_used.as_str())
            .or_insert_with(|| MethodStats {
                method: record.method_used.clone(),
                wins: 0,
                achieved: 0,
            });
        stats.wins += 1;
        if record.achieved {
            stats.achieved += 1;
        }
    }
    let mut per_method: Vec<MethodStats> = by_method.into_values().collect();
    per_method.sort_by(|a, b| b.cmp_score(a));

    BenchSummary {
        runs,
        achieved_rate: share(records.iter().filter(|r| r.achieved).count()),
        avg_score: mean(records.iter().map(|r| r.score).sum()),
        avg_elapsed_ms: mean(records.iter().map(|r| r.elapsed_ms as f64).sum()),
        helper_rate: share(records.iter().filter(|r| r.helpers_added > 0).count()),
        per_method,
    }
}
