use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Meal optimizer: races several solvers to hit a macro target and fills
/// remaining gaps with helper ingredients.
#[derive(Parser, Debug)]
#[command(name = "meal_optimizer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Optional JSON file overriding tolerances, weights and solver budgets.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for the stochastic solvers (overrides the config file).
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Optimize a request file (ingredients, target, meal time).
    Optimize {
        /// Path to the request JSON.
        request: PathBuf,

        /// Print the outcome as JSON instead of a table.
        #[arg(long)]
        json: bool,

        /// Also write the outcome JSON to this path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Interactively pick ingredients from a catalog and a target.
    Plan {
        /// Path to a JSON array of ingredient records.
        #[arg(default_value = "ingredients.json")]
        catalog: PathBuf,
    },

    /// List the helper ingredients available for a meal time.
    Helpers {
        /// Meal time, e.g. "lunch" or "Morning Snack".
        #[arg(default_value = "lunch")]
        meal_time: String,
    },
}
