pub mod bench;
pub mod catalog;
pub mod cli;
pub mod error;
pub mod interface;
pub mod logging;
pub mod models;
pub mod optimizer;

pub use error::{OptimizerError, Result};
pub use models::{Ingredient, MacroVector, MealOutcome, MealRequest};
pub use optimizer::{GapFillController, OptimizerConfig};
