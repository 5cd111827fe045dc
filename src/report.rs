//! Text and CSV rendering of projection results

use std::io::Write;

use csv::Writer;

use crate::comparison::{MergedTable, OvertakeEvent, Ranking};
use crate::error::Result;
use crate::projection::{GrowthRecord, RecordTable, SimulationResult};
use crate::scenario::ScenarioOutcome;

pub const DEFAULT_CURRENCY: &str = "₹";

pub const NO_RANKING: &str = "No data to determine ranking.";
pub const NO_OVERTAKES: &str = "No overtakes within the selected period.";

/// Format an amount with a currency symbol, thousands separators and two
/// decimals, e.g. `₹5,500,000.00` or `-₹1,000.00`
pub fn format_currency(value: f64, symbol: &str) -> String {
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}{symbol}{grouped}.{cents}")
}

/// One line per ranked scheme, e.g. `1. Scheme 58 (₹1,234.00)`
pub fn ranking_lines(ranking: &Ranking, symbol: &str) -> Vec<String> {
    if ranking.is_empty() {
        return vec![NO_RANKING.to_string()];
    }

    ranking
        .entries
        .iter()
        .map(|e| format!("{}. {} ({})", e.rank, e.scheme, format_currency(e.final_value, symbol)))
        .collect()
}

/// One line per overtake, e.g. `Scheme 60 overtakes Scheme 58 on June 2028`
pub fn overtake_lines(overtakes: &[OvertakeEvent]) -> Vec<String> {
    if overtakes.is_empty() {
        return vec![NO_OVERTAKES.to_string()];
    }
    overtakes.iter().map(ToString::to_string).collect()
}

/// Write a record view as CSV with a leading `Month` column
pub fn write_record_table<W: Write>(table: &RecordTable, out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);

    let mut header = vec!["Month"];
    header.extend(table.headers());
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut fields = vec![row.month.label()];
        fields.extend(row.values.iter().map(|v| format!("{:.2}", v)));
        wtr.write_record(&fields)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write every month of a scheme run with all record fields
pub fn write_records<W: Write>(result: &SimulationResult, out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    for record in &result.records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_growth_records<W: Write>(records: &[GrowthRecord], out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);
    wtr.write_record([
        "Month",
        "Start Balance",
        "Added Amount",
        "Monthly Rate",
        "Interest Earned",
        "End Balance",
        "Total Value",
    ])?;

    for r in records {
        wtr.write_record(&[
            r.month.label(),
            format!("{:.2}", r.start_balance),
            format!("{:.2}", r.added_amount),
            format!("{:.8}", r.monthly_rate),
            format!("{:.2}", r.interest),
            format!("{:.2}", r.end_balance),
            format!("{:.2}", r.total_value),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the month-aligned total values of every scheme
pub fn write_merged_table<W: Write>(table: &MergedTable, out: W) -> Result<()> {
    let mut wtr = Writer::from_writer(out);

    let mut header = vec!["Month".to_string()];
    header.extend(table.names.iter().map(|n| format!("{n} Value")));
    wtr.write_record(&header)?;

    for row in &table.rows {
        let mut fields = vec![row.month.label()];
        fields.extend(row.values.iter().map(|v| format!("{:.2}", v)));
        wtr.write_record(&fields)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Header of the per-scenario batch summary
pub const OUTCOME_HEADER: [&str; 12] = [
    "ScenarioID",
    "Horizon",
    "EarlyFinalValue",
    "EarlyInterest",
    "EarlyTax",
    "LateFinalValue",
    "LateInterest",
    "LateTax",
    "Leader",
    "LeaderValue",
    "Overtakes",
    "LastOvertake",
];

/// One summary line per scenario outcome
pub fn write_outcome_summary<'a, W, I>(outcomes: I, out: W) -> Result<()>
where
    W: Write,
    I: IntoIterator<Item = (&'a str, &'a ScenarioOutcome)>,
{
    let mut wtr = Writer::from_writer(out);
    wtr.write_record(OUTCOME_HEADER)?;

    for (id, outcome) in outcomes {
        let leader = outcome.comparison.ranking.leader();
        wtr.write_record(&[
            id.to_string(),
            outcome.horizon.label(),
            format!("{:.2}", outcome.early.final_value),
            format!("{:.2}", outcome.early.total_interest),
            format!("{:.2}", outcome.early.total_tax()),
            format!("{:.2}", outcome.late.final_value),
            format!("{:.2}", outcome.late.total_interest),
            format!("{:.2}", outcome.late.total_tax()),
            leader.map(|e| e.scheme.clone()).unwrap_or_default(),
            leader.map(|e| format!("{:.2}", e.final_value)).unwrap_or_default(),
            outcome.comparison.overtakes.len().to_string(),
            outcome
                .comparison
                .overtakes
                .last()
                .map(ToString::to_string)
                .unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
