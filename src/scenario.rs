//! Comparison scenarios and the runner that projects them
//!
//! A scenario carries the shared inputs (lump sum, contributions, tax) and the
//! per-scheme inputs for the early-pension and late-pension schemes, plus an
//! optional growth fund. It is turned into per-scheme parameters for a chosen
//! horizon, simulated, and compared.

use chrono::NaiveDate;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::calendar::Month;
use crate::comparison::{compare, merge_series, ComparisonResult, MergedTable, NamedSeries};
use crate::error::{ProjectionError, Result};
use crate::projection::{simulate, simulate_growth_fund, GrowthFundResult, SimulationResult};
use crate::rates::CompoundingFrequency;
use crate::scheme::{GrowthFundParameters, SideFundConfig, SimulationParameters, TaxConfig};

/// Months past the minimum horizon used when no horizon is requested
pub const DEFAULT_HORIZON_EXTENSION: u32 = 24;

/// How far past the reference month a horizon may be pushed
pub const MAX_HORIZON_YEARS: u32 = 30;

/// Navigation steps for moving a horizon back and forth
pub const QUARTER_STEP: i32 = 3;
pub const YEAR_STEP: i32 = 12;

fn ym(year: i32, month: u32) -> Month {
    Month::new(year, month).unwrap_or_else(|| Month::from_date(NaiveDate::MIN))
}

/// Scheme whose pension starts first; diverts contributions into a side fund
/// until the late scheme's pension starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EarlyScheme {
    pub name: String,
    pub pension_amount: f64,
    pub pension_start_month: Month,
    pub contribution_end_month: Month,
    pub reinvestment_rate: f64,
    pub reinvestment_compounding: CompoundingFrequency,
    pub side_fund_rate: f64,
    pub side_fund_compounding: CompoundingFrequency,
}

impl Default for EarlyScheme {
    fn default() -> Self {
        Self {
            name: "Scheme 58".to_string(),
            pension_amount: 85_000.0,
            pension_start_month: ym(2026, 6),
            contribution_end_month: ym(2026, 5),
            reinvestment_rate: 0.07,
            reinvestment_compounding: CompoundingFrequency::Quarterly,
            side_fund_rate: 0.083,
            side_fund_compounding: CompoundingFrequency::Monthly,
        }
    }
}

/// Scheme with the later, larger pension and no side fund
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LateScheme {
    pub name: String,
    pub pension_amount: f64,
    pub pension_start_month: Month,
    pub contribution_end_month: Month,
    pub reinvestment_rate: f64,
    pub reinvestment_compounding: CompoundingFrequency,
}

impl Default for LateScheme {
    fn default() -> Self {
        Self {
            name: "Scheme 60".to_string(),
            pension_amount: 127_000.0,
            pension_start_month: ym(2028, 6),
            contribution_end_month: ym(2028, 5),
            reinvestment_rate: 0.07,
            reinvestment_compounding: CompoundingFrequency::Quarterly,
        }
    }
}

/// Single-balance fund compared alongside the pension schemes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthFund {
    pub name: String,
    pub contribution_start_month: Option<Month>,
    pub contribution_end_month: Month,
    pub phase_one_rate: f64,
    pub phase_one_compounding: CompoundingFrequency,
    pub transition_month: Month,
    pub phase_two_rate: f64,
    pub phase_two_compounding: CompoundingFrequency,
}

impl Default for GrowthFund {
    fn default() -> Self {
        Self {
            name: "Growth Fund".to_string(),
            contribution_start_month: Some(ym(2025, 4)),
            contribution_end_month: ym(2028, 5),
            phase_one_rate: 0.083,
            phase_one_compounding: CompoundingFrequency::Monthly,
            transition_month: ym(2028, 5),
            phase_two_rate: 0.07,
            phase_two_compounding: CompoundingFrequency::Quarterly,
        }
    }
}

/// Everything needed to compare the schemes; any field left out of a JSON
/// document takes its default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonScenario {
    pub initial_lump_sum: f64,
    pub lump_sum_month: Month,
    pub monthly_contribution: f64,
    pub contribution_start_month: Option<Month>,
    pub tax: TaxConfig,
    pub early: EarlyScheme,
    pub late: LateScheme,
    pub growth_fund: Option<GrowthFund>,
}

impl Default for ComparisonScenario {
    fn default() -> Self {
        Self {
            initial_lump_sum: 5_500_000.0,
            lump_sum_month: ym(2025, 3),
            monthly_contribution: 30_000.0,
            contribution_start_month: None,
            tax: TaxConfig::flat(0.30),
            early: EarlyScheme::default(),
            late: LateScheme::default(),
            growth_fund: None,
        }
    }
}

impl ComparisonScenario {
    /// Load a scenario from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let scenario: ComparisonScenario = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Per-scheme parameters up to `horizon`, early scheme first.
    ///
    /// The early scheme merges its side fund and stops withholding tax in the
    /// month the late scheme's pension starts.
    pub fn parameters(&self, horizon: Month) -> (SimulationParameters, SimulationParameters) {
        let early = SimulationParameters {
            initial_lump_sum: self.initial_lump_sum,
            lump_sum_month: self.lump_sum_month,
            monthly_contribution: self.monthly_contribution,
            contribution_start_month: self.contribution_start_month,
            contribution_end_month: self.early.contribution_end_month,
            pension_amount: self.early.pension_amount,
            pension_start_month: self.early.pension_start_month,
            reinvestment_annual_rate: self.early.reinvestment_rate,
            reinvestment_compounding: self.early.reinvestment_compounding,
            side_fund: Some(SideFundConfig {
                growth_rate: self.early.side_fund_rate,
                compounding: self.early.side_fund_compounding,
            }),
            transition_month: Some(self.late.pension_start_month),
            tax: self.tax,
            display_end_month: horizon,
        };

        let late = SimulationParameters {
            initial_lump_sum: self.initial_lump_sum,
            lump_sum_month: self.lump_sum_month,
            monthly_contribution: self.monthly_contribution,
            contribution_start_month: self.contribution_start_month,
            contribution_end_month: self.late.contribution_end_month,
            pension_amount: self.late.pension_amount,
            pension_start_month: self.late.pension_start_month,
            reinvestment_annual_rate: self.late.reinvestment_rate,
            reinvestment_compounding: self.late.reinvestment_compounding,
            side_fund: None,
            transition_month: None,
            tax: TaxConfig::disabled(),
            display_end_month: horizon,
        };

        (early, late)
    }

    /// Growth fund parameters up to `horizon`, if the scenario has one
    pub fn growth_parameters(&self, horizon: Month) -> Option<GrowthFundParameters> {
        self.growth_fund.as_ref().map(|fund| GrowthFundParameters {
            initial_lump_sum: self.initial_lump_sum,
            lump_sum_month: self.lump_sum_month,
            monthly_contribution: self.monthly_contribution,
            contribution_start_month: fund.contribution_start_month,
            contribution_end_month: fund.contribution_end_month,
            phase_one_rate: fund.phase_one_rate,
            phase_one_compounding: fund.phase_one_compounding,
            transition_month: fund.transition_month,
            phase_two_rate: fund.phase_two_rate,
            phase_two_compounding: fund.phase_two_compounding,
            display_end_month: horizon,
        })
    }

    /// Scheme names in comparison order
    pub fn scheme_names(&self) -> Vec<&str> {
        let mut names = vec![self.early.name.as_str(), self.late.name.as_str()];
        if let Some(fund) = &self.growth_fund {
            names.push(fund.name.as_str());
        }
        names
    }

    /// Earliest horizon showing at least one month after every start date
    pub fn minimum_horizon(&self) -> Month {
        let latest_start = self
            .lump_sum_month
            .max(self.early.pension_start_month)
            .max(self.late.pension_start_month);
        latest_start.next().unwrap_or(latest_start)
    }

    /// Horizon used when the caller does not pick one
    pub fn default_horizon(&self) -> Month {
        let minimum = self.minimum_horizon();
        minimum.add_months(DEFAULT_HORIZON_EXTENSION).unwrap_or(minimum)
    }

    /// The requested horizon, or the default when none is given or the
    /// requested one is before the minimum
    pub fn resolve_horizon(&self, requested: Option<Month>) -> Month {
        match requested {
            Some(horizon) if horizon >= self.minimum_horizon() => horizon,
            Some(horizon) => {
                debug!(
                    "horizon {} is before the minimum {}, using the default",
                    horizon,
                    self.minimum_horizon()
                );
                self.default_horizon()
            }
            None => self.default_horizon(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let (early, late) = self.parameters(self.default_horizon());
        early.validate()?;
        late.validate()?;
        if let Some(growth) = self.growth_parameters(self.default_horizon()) {
            growth.validate()?;
        }

        let names = self.scheme_names();
        for (i, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ProjectionError::invalid("name", "scheme names must not be blank"));
            }
            if names[..i].contains(name) {
                return Err(ProjectionError::invalid(
                    "name",
                    format!("scheme name {:?} is used twice", name),
                ));
            }
        }

        Ok(())
    }
}

/// Latest horizon reachable from `reference` (normally the current month)
pub fn maximum_horizon(reference: Month) -> Month {
    reference.add_months(MAX_HORIZON_YEARS * 12).unwrap_or(reference)
}

/// Move a horizon by `months` and keep it within `min..=max`
pub fn shift_horizon(current: Month, months: i32, min: Month, max: Month) -> Month {
    let target = current
        .offset(months)
        .unwrap_or(if months < 0 { min } else { max });

    if target < min || max < min {
        min
    } else if target > max {
        max
    } else {
        target
    }
}

/// Everything produced by one scenario run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioOutcome {
    pub horizon: Month,
    pub early: SimulationResult,
    pub late: SimulationResult,
    pub growth: Option<GrowthFundResult>,
    pub comparison: ComparisonResult,
    pub merged: MergedTable,
}

impl ScenarioOutcome {
    /// Total value series for every scheme, in comparison order
    pub fn series(&self, scenario: &ComparisonScenario) -> Vec<NamedSeries> {
        value_series(scenario, &self.early, &self.late, self.growth.as_ref())
    }
}

fn value_series(
    scenario: &ComparisonScenario,
    early: &SimulationResult,
    late: &SimulationResult,
    growth: Option<&GrowthFundResult>,
) -> Vec<NamedSeries> {
    let mut series = vec![
        early.value_series(scenario.early.name.clone()),
        late.value_series(scenario.late.name.clone()),
    ];
    if let (Some(result), Some(fund)) = (growth, &scenario.growth_fund) {
        series.push(result.value_series(fund.name.clone()));
    }
    series
}

/// Runs scenarios; schemes within a scenario and scenarios within a batch are
/// projected in parallel
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner;

impl ScenarioRunner {
    pub fn new() -> Self {
        Self
    }

    /// Project every scheme of `scenario` through `horizon` and compare them
    pub fn run(&self, scenario: &ComparisonScenario, horizon: Month) -> ScenarioOutcome {
        let (early_params, late_params) = scenario.parameters(horizon);
        let growth_params = scenario.growth_parameters(horizon);

        let ((early, late), growth) = rayon::join(
            || rayon::join(|| simulate(&early_params), || simulate(&late_params)),
            || growth_params.as_ref().map(simulate_growth_fund),
        );

        let series = value_series(scenario, &early, &late, growth.as_ref());
        let comparison = compare(&series);
        let merged = merge_series(&series);
        debug!(
            "scenario through {}: {} overtakes, leader {:?}",
            horizon,
            comparison.overtakes.len(),
            comparison.ranking.leader().map(|e| e.scheme.as_str())
        );

        ScenarioOutcome {
            horizon,
            early,
            late,
            growth,
            comparison,
            merged,
        }
    }

    /// Run at the scenario's default horizon
    pub fn run_default(&self, scenario: &ComparisonScenario) -> ScenarioOutcome {
        self.run(scenario, scenario.default_horizon())
    }

    /// Run many scenarios; `None` runs each at its own default horizon
    pub fn run_batch(&self, scenarios: &[ComparisonScenario], horizon: Option<Month>) -> Vec<ScenarioOutcome> {
        info!("running {} scenarios", scenarios.len());
        scenarios
            .par_iter()
            .map(|scenario| self.run(scenario, horizon.unwrap_or_else(|| scenario.default_horizon())))
            .collect()
    }

    /// Run one scenario at several horizons
    pub fn run_horizons(&self, scenario: &ComparisonScenario, horizons: &[Month]) -> Vec<ScenarioOutcome> {
        horizons.par_iter().map(|&h| self.run(scenario, h)).collect()
    }
}
