pub mod achievement;
pub mod config;
pub mod constants;
pub mod evaluator;
pub mod gap_fill;
pub mod helpers;
pub mod objective;
pub mod recommendations;
pub mod solvers;

pub use config::OptimizerConfig;
pub use evaluator::{ScoredResult, evaluate};
pub use gap_fill::GapFillController;
pub use objective::{objective, totals};
