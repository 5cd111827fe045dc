//! Run every scenario in a CSV file and write one outcome line per scenario
//!
//! Environment:
//! - `SCENARIO_CSV`: input file (default `scenarios.csv`)
//! - `HORIZON`: shared horizon as YYYY-MM (default: each scenario's own default)
//! - `OUTPUT_CSV`: output file (default `scenario_outcomes.csv`)

use std::env;
use std::fs::File;
use std::time::Instant;

use anyhow::{Context, Result};
use log::warn;

use pension_projection::calendar::Month;
use pension_projection::report::write_outcome_summary;
use pension_projection::scheme::load_scenarios;
use pension_projection::ScenarioRunner;

fn main() -> Result<()> {
    env_logger::init();

    let input_path = env::var("SCENARIO_CSV").unwrap_or_else(|_| "scenarios.csv".to_string());
    let output_path = env::var("OUTPUT_CSV").unwrap_or_else(|_| "scenario_outcomes.csv".to_string());
    let horizon = match env::var("HORIZON") {
        Ok(text) => Some(
            text.parse::<Month>()
                .with_context(|| format!("HORIZON={} is not a valid month", text))?,
        ),
        Err(_) => None,
    };

    let start = Instant::now();
    println!("Loading scenarios from {}...", input_path);

    let labeled = load_scenarios(&input_path)
        .with_context(|| format!("Failed to load scenarios from {}", input_path))?;
    println!("Loaded {} scenarios in {:?}", labeled.len(), start.elapsed());

    if let Some(h) = horizon {
        for item in labeled.iter().filter(|item| h < item.scenario.minimum_horizon()) {
            warn!(
                "scenario {}: horizon {} is before its minimum {}",
                item.id,
                h,
                item.scenario.minimum_horizon()
            );
        }
    }

    println!("Running projections...");
    let run_start = Instant::now();

    let scenarios: Vec<_> = labeled.iter().map(|item| item.scenario.clone()).collect();
    let outcomes = ScenarioRunner::new().run_batch(&scenarios, horizon);

    println!("Projections complete in {:?}", run_start.elapsed());

    let file = File::create(&output_path)
        .with_context(|| format!("Failed to create output file {}", output_path))?;
    write_outcome_summary(
        labeled.iter().map(|item| item.id.as_str()).zip(outcomes.iter()),
        file,
    )?;

    println!("Output written to {}", output_path);
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
