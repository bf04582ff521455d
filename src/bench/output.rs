use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::bench::history::{BenchSummary, RunRecord};
use crate::error::Result;

/// Round a float to n decimal places.
fn truncate(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Write every run to a CSV file.
pub fn write_csv(records: &[RunRecord], path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "request",
        "seed",
        "method_used",
        "achieved",
        "helpers_added",
        "score",
        "elapsed_ms",
    ])?;

    for record in records {
        wtr.write_record([
            record.request.clone(),
            record.seed.to_string(),
            record.method_used.clone(),
            record.achieved.to_string(),
            record.helpers_added.to_string(),
            format!("{:.4}", record.score),
            record.elapsed_ms.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the summary to a JSON file with rounded floats.
pub fn write_summary_json(summary: &BenchSummary, path: &Path) -> Result<()> {
    let json = serde_json::json!({
        "runs": summary.runs,
        "achieved_rate": truncate(summary.achieved_rate, 3),
        "helper_rate": truncate(summary.helper_rate, 3),
        "avg_score": truncate(summary.avg_score, 4),
        "avg_elapsed_ms": truncate(summary.avg_elapsed_ms, 1),
        "per_method": summary.per_method,
    });

    let mut file = File::create(path)?;
    file.write_all(serde_json::to_string_pretty(&json)?.as_bytes())?;
    Ok(())
}

/// Print the per-method table to stdout.
pub fn print_summary(summary: &BenchSummary) {
    println!("\n=== Portfolio history ({} runs) ===\n", summary.runs);

    for (i, stats) in summary.per_method.iter().enumerate() {
        let rate = if stats.wins > 0 {
            stats.achieved as f64 / stats.wins as f64 * 100.0
        } else {
            0.0
        };
        println!(
            "#{}: {:<24} wins={:<4} achieved={:<4} ({:.1}%)",
            i + 1,
            stats.method,
            stats.wins,
            stats.achieved,
            rate
        );
    }

    println!();
    println!("Target achieved: {:.1}%", summary.achieved_rate * 100.0);
    println!("Needed helpers:  {:.1}%", summary.helper_rate * 100.0);
    println!("Average score:   {:.4}", summary.avg_score);
    println!("Average time:    {:.1} ms", summary.avg_elapsed_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::history::summarize;
    use tempfile::NamedTempFile;

    #[test]
    fn test_write_csv_and_json() {
        let records = vec![RunRecord {
            request: "lunch.json".to_string(),
            seed: 42,
            method_used: "linear_programming".to_string(),
            achieved: true,
            helpers_added: 0,
            score: 0.012345,
            elapsed_ms: 7,
        }];

        let csv_file = NamedTempFile::new().unwrap();
        write_csv(&records, csv_file.path()).unwrap();
        let text = std::fs::read_to_string(csv_file.path()).unwrap();
        assert!(text.starts_with("request,seed,method_used"));
        assert!(text.contains("lunch.json,42,linear_programming,true,0,0.0123,7"));

        let json_file = NamedTempFile::new().unwrap();
        write_summary_json(&summarize(&records), json_file.path()).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(json_file.path()).unwrap()).unwrap();
        assert_eq!(value["runs"], 1);
        assert_eq!(value["per_method"][0]["method"], "linear_programming");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate(0.12345, 3), 0.123);
        assert_eq!(truncate(2.0, 1), 2.0);
    }
}
