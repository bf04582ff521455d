//! Optimization history: run the controller across requests and seeds and
//! record which solver won.

pub mod history;
pub mod output;

pub use history::{BenchSummary, MethodStats, RunRecord, run_bench, summarize};
pub use output::{print_summary, write_csv, write_summary_json};
