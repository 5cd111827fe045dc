//! Load comparison scenarios from JSON documents and batch CSV files

use std::fs;
use std::io::Read;
use std::path::Path;

use csv::Reader;
use log::debug;
use serde::Deserialize;

use crate::calendar::Month;
use crate::error::Result;
use crate::rates::CompoundingFrequency;
use crate::scenario::{ComparisonScenario, EarlyScheme, LateScheme};
use crate::scheme::TaxConfig;

/// A scenario read from one batch row, tagged with the row's identifier
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledScenario {
    pub id: String,
    pub scenario: ComparisonScenario,
}

/// Raw CSV row, one scenario per line
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "ScenarioID")]
    scenario_id: String,
    #[serde(rename = "LumpSum")]
    lump_sum: f64,
    #[serde(rename = "LumpSumMonth")]
    lump_sum_month: String,
    #[serde(rename = "MonthlyContribution")]
    monthly_contribution: f64,
    #[serde(rename = "ContributionStart", default)]
    contribution_start: Option<String>,
    #[serde(rename = "TaxEnabled")]
    tax_enabled: bool,
    #[serde(rename = "TaxRate")]
    tax_rate: f64,
    #[serde(rename = "EarlyPension")]
    early_pension: f64,
    #[serde(rename = "EarlyPensionStart")]
    early_pension_start: String,
    #[serde(rename = "EarlyContributionEnd")]
    early_contribution_end: String,
    #[serde(rename = "EarlyReinvestRate")]
    early_reinvest_rate: f64,
    #[serde(rename = "EarlyReinvestCompounding")]
    early_reinvest_compounding: String,
    #[serde(rename = "SideFundRate")]
    side_fund_rate: f64,
    #[serde(rename = "SideFundCompounding")]
    side_fund_compounding: String,
    #[serde(rename = "LatePension")]
    late_pension: f64,
    #[serde(rename = "LatePensionStart")]
    late_pension_start: String,
    #[serde(rename = "LateContributionEnd")]
    late_contribution_end: String,
    #[serde(rename = "LateReinvestRate")]
    late_reinvest_rate: f64,
    #[serde(rename = "LateReinvestCompounding")]
    late_reinvest_compounding: String,
}

impl CsvRow {
    fn to_scenario(self) -> Result<LabeledScenario> {
        let contribution_start_month = match self.contribution_start.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(text) => Some(text.parse::<Month>()?),
        };

        let scenario = ComparisonScenario {
            initial_lump_sum: self.lump_sum,
            lump_sum_month: self.lump_sum_month.parse()?,
            monthly_contribution: self.monthly_contribution,
            contribution_start_month,
            tax: TaxConfig {
                enabled: self.tax_enabled,
                rate: self.tax_rate,
            },
            early: EarlyScheme {
                pension_amount: self.early_pension,
                pension_start_month: self.early_pension_start.parse()?,
                contribution_end_month: self.early_contribution_end.parse()?,
                reinvestment_rate: self.early_reinvest_rate,
                reinvestment_compounding: self.early_reinvest_compounding.parse::<CompoundingFrequency>()?,
                side_fund_rate: self.side_fund_rate,
                side_fund_compounding: self.side_fund_compounding.parse::<CompoundingFrequency>()?,
                ..EarlyScheme::default()
            },
            late: LateScheme {
                pension_amount: self.late_pension,
                pension_start_month: self.late_pension_start.parse()?,
                contribution_end_month: self.late_contribution_end.parse()?,
                reinvestment_rate: self.late_reinvest_rate,
                reinvestment_compounding: self.late_reinvest_compounding.parse::<CompoundingFrequency>()?,
                ..LateScheme::default()
            },
            growth_fund: None,
        };
        scenario.validate()?;

        Ok(LabeledScenario {
            id: self.scenario_id,
            scenario,
        })
    }
}

/// Load all scenarios from a CSV file
pub fn load_scenarios<P: AsRef<Path>>(path: P) -> Result<Vec<LabeledScenario>> {
    let reader = Reader::from_path(path)?;
    read_rows(reader)
}

/// Load scenarios from any reader (e.g., string buffer, request body)
pub fn load_scenarios_from_reader<R: Read>(reader: R) -> Result<Vec<LabeledScenario>> {
    read_rows(Reader::from_reader(reader))
}

fn read_rows<R: Read>(mut reader: Reader<R>) -> Result<Vec<LabeledScenario>> {
    let mut scenarios = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        scenarios.push(row.to_scenario()?);
    }

    debug!("loaded {} scenarios", scenarios.len());
    Ok(scenarios)
}

/// Load a single scenario from a JSON file
pub fn load_scenario_json<P: AsRef<Path>>(path: P) -> Result<ComparisonScenario> {
    let text = fs::read_to_string(path)?;
    ComparisonScenario::from_json(&text)
}
