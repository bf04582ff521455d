use std::path::PathBuf;

use clap::Parser;

use meal_optimizer_rs::bench::{print_summary, run_bench, summarize, write_csv, write_summary_json};
use meal_optimizer_rs::catalog::load_request;
use meal_optimizer_rs::logging;
use meal_optimizer_rs::optimizer::OptimizerConfig;

#[derive(Parser, Debug)]
#[command(name = "portfolio_bench")]
#[command(about = "Record which solver wins across requests and seeds")]
struct Args {
    /// Request JSON files to optimize
    #[arg(required = true)]
    requests: Vec<PathBuf>,

    /// RNG seeds to run (comma-separated)
    #[arg(long, default_value = "42,43,44,45,46")]
    seeds: String,

    /// Optional config override JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output CSV file for every run
    #[arg(long, default_value = "bench_history.csv")]
    csv: PathBuf,

    /// Output JSON file for the summary
    #[arg(long, default_value = "bench_summary.json")]
    json: PathBuf,

    /// Increase log verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn parse_seeds(s: &str) -> Vec<u64> {
    s.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

fn main() {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = match &args.config {
        Some(path) => match OptimizerConfig::load(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error reading config {:?}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => OptimizerConfig::default(),
    };

    let seeds = parse_seeds(&args.seeds);
    if seeds.is_empty() {
        eprintln!("Error: no valid seeds provided");
        std::process::exit(1);
    }

    let mut requests = Vec::with_capacity(args.requests.len());
    for path in &args.requests {
        match load_request(path) {
            Ok(request) => requests.push((path.display().to_string(), request)),
            Err(e) => {
                eprintln!("Error reading request {:?}: {}", path, e);
                std::process::exit(1);
            }
        }
    }
    println!("Loaded {} requests, seeds {:?}", requests.len(), seeds);

    let records = run_bench(&requests, &seeds, &config);
    let summary = summarize(&records);
    print_summary(&summary);

    if let Err(e) = write_csv(&records, &args.csv) {
        eprintln!("Error writing CSV: {}", e);
    } else {
        println!("Wrote run history to {:?}", args.csv);
    }

    if let Err(e) = write_summary_json(&summary, &args.json) {
        eprintln!("Error writing JSON: {}", e);
    } else {
        println!("Wrote summary to {:?}", args.json);
    }
}
