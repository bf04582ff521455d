use std::path::Path;

use clap::Parser;

use meal_optimizer_rs::catalog::{helpers_for, load_records, load_request, save_json};
use meal_optimizer_rs::cli::{Cli, Command};
use meal_optimizer_rs::error::Result;
use meal_optimizer_rs::interface::{
    display_helper_list, display_outcome, prompt_ingredients, prompt_meal_time, prompt_preferences,
    prompt_target, prompt_yes_no,
};
use meal_optimizer_rs::logging;
use meal_optimizer_rs::models::{Ingredient, MealRequest, MealTime};
use meal_optimizer_rs::optimizer::{GapFillController, OptimizerConfig};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => OptimizerConfig::load(path)?,
        None => OptimizerConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }

    match cli.command {
        Command::Optimize {
            request,
            json,
            output,
        } => cmd_optimize(config, &request, json, output.as_deref()),
        Command::Plan { catalog } => cmd_plan(config, &catalog),
        Command::Helpers { meal_time } => cmd_helpers(&meal_time),
    }
}

/// Optimize a request file and print the outcome.
fn cmd_optimize(config: OptimizerConfig, path: &Path, json: bool, output: Option<&Path>) -> Result<()> {
    let request = load_request(path)?;
    let controller = GapFillController::new(config);
    let outcome = controller.optimize(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        display_outcome(&outcome, &request.target);
    }

    if let Some(out) = output {
        save_json(out, &outcome)?;
        println!("Outcome written to {}", out.display());
    }
    Ok(())
}

/// Interactive planning over a catalog file.
fn cmd_plan(config: OptimizerConfig, catalog_path: &Path) -> Result<()> {
    if !catalog_path.exists() {
        eprintln!("Catalog file not found: {}", catalog_path.display());
        eprintln!("Provide a JSON array of ingredient records.");
        return Ok(());
    }

    let catalog = load_records(catalog_path)?;
    println!("Loaded {} ingredients", catalog.len());
    println!();

    let ingredients = prompt_ingredients(&catalog)?;
    let target = prompt_target()?;
    let meal_time = prompt_meal_time()?;
    let preferences = prompt_preferences()?;

    println!();
    println!("Optimizing {} for {} ingredients...", meal_time, ingredients.len());

    let request = MealRequest {
        ingredients,
        target,
        meal_time,
        preferences,
    };
    let controller = GapFillController::new(config);
    let outcome = controller.optimize(&request)?;
    display_outcome(&outcome, &target);

    if prompt_yes_no("Save this meal as JSON?", false)? {
        let out = catalog_path.with_file_name("meal_outcome.json");
        save_json(&out, &outcome)?;
        println!("Meal saved to {}", out.display());
    }
    Ok(())
}

/// Show the helper table for one meal time.
fn cmd_helpers(raw: &str) -> Result<()> {
    let meal_time: MealTime = raw.parse()?;
    let helpers: Vec<&Ingredient> = helpers_for(meal_time).collect();
    display_helper_list(meal_time, &helpers);
    Ok(())
}
