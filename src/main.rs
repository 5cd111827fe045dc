//! Pension Projection CLI
//!
//! Projects the early-pension and late-pension schemes (and optionally a
//! growth fund) through a horizon, then prints how they compare.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use pension_projection::calendar::Month;
use pension_projection::projection::{RecordView, SimulationResult};
use pension_projection::report::{
    format_currency, overtake_lines, ranking_lines, write_growth_records, write_merged_table,
    write_record_table, write_records, DEFAULT_CURRENCY,
};
use pension_projection::scenario::{maximum_horizon, shift_horizon, GrowthFund};
use pension_projection::scheme::load_scenario_json;
use pension_projection::{ComparisonScenario, ScenarioOutcome, ScenarioRunner};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ViewArg {
    Summary,
    Pension,
    Investment,
    Tax,
}

impl From<ViewArg> for RecordView {
    fn from(view: ViewArg) -> Self {
        match view {
            ViewArg::Summary => RecordView::Summary,
            ViewArg::Pension => RecordView::Pension,
            ViewArg::Investment => RecordView::Investment,
            ViewArg::Tax => RecordView::Tax,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "pension_projection", version, about = "Compare pension schemes month by month")]
struct Cli {
    /// Scenario JSON file; omitted fields take their defaults
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Last month to project (YYYY-MM); defaults to two years past the last start date
    #[arg(long)]
    horizon: Option<Month>,

    /// Move the horizon by this many months (e.g. -12, -3, 3, 12)
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    shift_months: i32,

    /// Also project the default growth fund when the scenario has none
    #[arg(long)]
    growth_fund: bool,

    /// Write record and comparison CSV files to this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the full outcome as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Currency symbol for text output
    #[arg(long, default_value = DEFAULT_CURRENCY)]
    currency: String,

    /// Record view printed per scheme
    #[arg(long, value_enum, default_value_t = ViewArg::Summary)]
    view: ViewArg,

    /// Number of monthly rows printed per scheme
    #[arg(long, default_value_t = 12)]
    rows: usize,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut scenario = match &cli.scenario {
        Some(path) => load_scenario_json(path)
            .with_context(|| format!("Failed to load scenario from {}", path.display()))?,
        None => ComparisonScenario::default(),
    };
    if cli.growth_fund && scenario.growth_fund.is_none() {
        scenario.growth_fund = Some(GrowthFund::default());
    }

    let mut horizon = scenario.resolve_horizon(cli.horizon);
    if cli.shift_months != 0 {
        let today = Month::from_date(chrono::Local::now().date_naive());
        let max = maximum_horizon(today).max(horizon);
        horizon = shift_horizon(horizon, cli.shift_months, scenario.minimum_horizon(), max);
    }
    info!("projecting through {}", horizon);

    let outcome = ScenarioRunner::new().run(&scenario, horizon);

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        );
    } else {
        print_outcome(&cli, &scenario, &outcome);
    }

    if let Some(dir) = &cli.output_dir {
        write_outputs(dir, &scenario, &outcome)?;
        println!("\nOutput written to {}", dir.display());
    }

    Ok(())
}

fn print_outcome(cli: &Cli, scenario: &ComparisonScenario, outcome: &ScenarioOutcome) {
    let money = |v: f64| format_currency(v, &cli.currency);

    println!("Calculations up to: {}", outcome.horizon.long_label());
    println!("{}", "=".repeat(40));

    for (name, result) in [
        (&scenario.early.name, &outcome.early),
        (&scenario.late.name, &outcome.late),
    ] {
        println!("\n{}", name);
        println!("  Total value:    {}", money(result.final_value));
        println!("  Total interest: {}", money(result.total_interest));
        if result.total_tax() > 0.0 {
            println!("  Tax withheld:   {}", money(result.total_tax()));
        }
        print_table(cli, scenario, result);
    }

    if let (Some(growth), Some(fund)) = (&outcome.growth, &scenario.growth_fund) {
        println!("\n{}", fund.name);
        println!("  Total value:    {}", money(growth.final_value));
        println!("  Total interest: {}", money(growth.total_interest));
    }

    println!("\nOvertakes:");
    for line in overtake_lines(&outcome.comparison.overtakes) {
        println!("  {}", line);
    }

    println!("\nRanking at {}:", outcome.horizon.long_label());
    for line in ranking_lines(&outcome.comparison.ranking, &cli.currency) {
        println!("  {}", line);
    }
}

fn print_table(cli: &Cli, scenario: &ComparisonScenario, result: &SimulationResult) {
    let table = result.view(cli.view.into(), scenario.tax.enabled);
    if table.is_empty() {
        println!("  (no data for this view)");
        return;
    }

    print!("  {:>7}", "Month");
    for header in table.headers() {
        print!(" {:>18}", header);
    }
    println!();

    for row in table.rows.iter().take(cli.rows) {
        print!("  {:>7}", row.month.label());
        for value in &row.values {
            print!(" {:>18.2}", value);
        }
        println!();
    }

    if table.rows.len() > cli.rows {
        println!("  ... ({} more months)", table.rows.len() - cli.rows);
    }
}

fn write_outputs(dir: &Path, scenario: &ComparisonScenario, outcome: &ScenarioOutcome) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("Unable to create {}", dir.display()))?;

    let create = |name: String| -> Result<File> {
        let path = dir.join(name);
        File::create(&path).with_context(|| format!("Unable to create {}", path.display()))
    };

    for (name, result) in [
        (&scenario.early.name, &outcome.early),
        (&scenario.late.name, &outcome.late),
    ] {
        write_records(result, create(format!("{}_records.csv", file_stem(name)))?)?;
        write_record_table(
            &result.view(RecordView::Summary, scenario.tax.enabled),
            create(format!("{}_summary.csv", file_stem(name)))?,
        )?;
    }

    if let (Some(growth), Some(fund)) = (&outcome.growth, &scenario.growth_fund) {
        write_growth_records(&growth.records, create(format!("{}_records.csv", file_stem(&fund.name)))?)?;
    }

    write_merged_table(&outcome.merged, create("comparison.csv".to_string())?)?;
    Ok(())
}

/// `Scheme 58` -> `scheme_58`
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect()
}
