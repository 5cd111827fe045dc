//! Parameter sets describing a single pension scheme run

use serde::{Deserialize, Serialize};

use crate::calendar::Month;
use crate::error::{ProjectionError, Result};
use crate::rates::CompoundingFrequency;

/// Interim investment used for contributions made after provider
/// contributions end and before the transition month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideFundConfig {
    /// Nominal annual growth rate
    pub growth_rate: f64,
    pub compounding: CompoundingFrequency,
}

impl SideFundConfig {
    pub fn monthly_rate(&self) -> f64 {
        self.compounding.monthly_rate(self.growth_rate)
    }
}

/// Flat-rate withholding applied before the transition month
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TaxConfig {
    pub enabled: bool,
    /// Fraction withheld (0-1)
    pub rate: f64,
}

impl TaxConfig {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn flat(rate: f64) -> Self {
        Self { enabled: true, rate }
    }
}

/// Input for one scheme simulation
///
/// A scheme with a `side_fund` and `transition_month` is the early-pension
/// variant; without them it is the plain late-pension variant, which never
/// withholds tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// One-time contribution
    pub initial_lump_sum: f64,

    /// Month the lump sum is paid; also the first simulated month
    pub lump_sum_month: Month,

    /// Recurring contribution
    pub monthly_contribution: f64,

    /// First month contributions go to the provider (None = from the start)
    #[serde(default)]
    pub contribution_start_month: Option<Month>,

    /// Last month contributions go to the provider
    pub contribution_end_month: Month,

    /// Monthly pension paid once eligible
    pub pension_amount: f64,

    pub pension_start_month: Month,

    /// Nominal annual growth rate of the reinvestment pot
    pub reinvestment_annual_rate: f64,

    pub reinvestment_compounding: CompoundingFrequency,

    #[serde(default)]
    pub side_fund: Option<SideFundConfig>,

    /// Side-fund merger and tax-exemption boundary
    #[serde(default)]
    pub transition_month: Option<Month>,

    #[serde(default)]
    pub tax: TaxConfig,

    /// Last simulated month (inclusive)
    pub display_end_month: Month,
}

impl SimulationParameters {
    /// Monthly growth rate of the reinvestment pot
    pub fn reinvestment_monthly_rate(&self) -> f64 {
        self.reinvestment_compounding.monthly_rate(self.reinvestment_annual_rate)
    }

    /// Whether a contribution this month goes to the provider
    pub fn in_contribution_window(&self, month: Month) -> bool {
        month <= self.contribution_end_month
            && self.contribution_start_month.map_or(true, |start| month >= start)
    }

    /// Whether a contribution this month is diverted into the side fund
    pub fn in_side_fund_window(&self, month: Month) -> bool {
        match (self.side_fund, self.transition_month) {
            (Some(_), Some(transition)) => month > self.contribution_end_month && month < transition,
            _ => false,
        }
    }

    /// Whether income earned this month is subject to withholding
    pub fn is_taxable(&self, month: Month) -> bool {
        self.tax.enabled && self.transition_month.map_or(false, |transition| month < transition)
    }

    /// Reject values the engine would happily compute nonsense from
    pub fn validate(&self) -> Result<()> {
        non_negative("initial_lump_sum", self.initial_lump_sum)?;
        non_negative("monthly_contribution", self.monthly_contribution)?;
        non_negative("pension_amount", self.pension_amount)?;
        rate_at_least_minus_one("reinvestment_annual_rate", self.reinvestment_annual_rate)?;

        if let Some(side_fund) = &self.side_fund {
            rate_at_least_minus_one("side_fund.growth_rate", side_fund.growth_rate)?;
            if self.transition_month.is_none() {
                return Err(ProjectionError::invalid(
                    "side_fund",
                    "a side fund needs a transition month to merge into the reinvestment pot",
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.tax.rate) {
            return Err(ProjectionError::invalid(
                "tax.rate",
                format!("{} is outside 0-1", self.tax.rate),
            ));
        }

        if let Some(start) = self.contribution_start_month {
            if start > self.contribution_end_month {
                return Err(ProjectionError::invalid(
                    "contribution_start_month",
                    format!("{} is after contribution end {}", start, self.contribution_end_month),
                ));
            }
        }

        Ok(())
    }
}

/// Single-balance scheme growing at one rate up to a transition month and
/// another rate afterwards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthFundParameters {
    pub initial_lump_sum: f64,
    pub lump_sum_month: Month,
    pub monthly_contribution: f64,
    #[serde(default)]
    pub contribution_start_month: Option<Month>,
    pub contribution_end_month: Month,

    /// Rate applied up to and including the transition month
    pub phase_one_rate: f64,
    pub phase_one_compounding: CompoundingFrequency,

    /// Last month of phase one
    pub transition_month: Month,

    /// Rate applied after the transition month
    pub phase_two_rate: f64,
    pub phase_two_compounding: CompoundingFrequency,

    pub display_end_month: Month,
}

impl GrowthFundParameters {
    pub fn in_contribution_window(&self, month: Month) -> bool {
        month <= self.contribution_end_month
            && self.contribution_start_month.map_or(true, |start| month >= start)
    }

    /// Monthly growth rate in force for the given month
    pub fn monthly_rate_for(&self, month: Month) -> f64 {
        if month <= self.transition_month {
            self.phase_one_compounding.monthly_rate(self.phase_one_rate)
        } else {
            self.phase_two_compounding.monthly_rate(self.phase_two_rate)
        }
    }

    pub fn validate(&self) -> Result<()> {
        non_negative("growth_fund.initial_lump_sum", self.initial_lump_sum)?;
        non_negative("growth_fund.monthly_contribution", self.monthly_contribution)?;
        rate_at_least_minus_one("growth_fund.phase_one_rate", self.phase_one_rate)?;
        rate_at_least_minus_one("growth_fund.phase_two_rate", self.phase_two_rate)?;
        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProjectionError::invalid(field, format!("{} must be a non-negative amount", value)))
    }
}

fn rate_at_least_minus_one(field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= -1.0 {
        Ok(())
    } else {
        Err(ProjectionError::invalid(field, format!("{} is below -100%", value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn early_scheme() -> SimulationParameters {
        SimulationParameters {
            initial_lump_sum: 5_500_000.0,
            lump_sum_month: month(2025, 3),
            monthly_contribution: 30_000.0,
            contribution_start_month: None,
            contribution_end_month: month(2026, 5),
            pension_amount: 85_000.0,
            pension_start_month: month(2026, 6),
            reinvestment_annual_rate: 0.07,
            reinvestment_compounding: CompoundingFrequency::Quarterly,
            side_fund: Some(SideFundConfig {
                growth_rate: 0.083,
                compounding: CompoundingFrequency::Monthly,
            }),
            transition_month: Some(month(2028, 6)),
            tax: TaxConfig::flat(0.3),
            display_end_month: month(2030, 6),
        }
    }

    #[test]
    fn test_windows() {
        let params = early_scheme();

        assert!(params.in_contribution_window(month(2025, 3)));
        assert!(params.in_contribution_window(month(2026, 5)));
        assert!(!params.in_contribution_window(month(2026, 6)));

        assert!(!params.in_side_fund_window(month(2026, 5)));
        assert!(params.in_side_fund_window(month(2026, 6)));
        assert!(params.in_side_fund_window(month(2028, 5)));
        assert!(!params.in_side_fund_window(month(2028, 6)));

        assert!(params.is_taxable(month(2028, 5)));
        assert!(!params.is_taxable(month(2028, 6)));
    }

    #[test]
    fn test_contribution_start_limits_window() {
        let mut params = early_scheme();
        params.contribution_start_month = Some(month(2025, 4));
        assert!(!params.in_contribution_window(month(2025, 3)));
        assert!(params.in_contribution_window(month(2025, 4)));
    }

    #[test]
    fn test_no_transition_means_no_tax() {
        let mut params = early_scheme();
        params.side_fund = None;
        params.transition_month = None;
        assert!(!params.is_taxable(month(2025, 3)));
        assert!(!params.in_side_fund_window(month(2027, 1)));
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(early_scheme().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut params = early_scheme();
        params.tax.rate = 1.5;
        assert!(matches!(
            params.validate(),
            Err(ProjectionError::InvalidConfiguration { field: "tax.rate", .. })
        ));

        let mut params = early_scheme();
        params.transition_month = None;
        assert!(matches!(
            params.validate(),
            Err(ProjectionError::InvalidConfiguration { field: "side_fund", .. })
        ));

        let mut params = early_scheme();
        params.monthly_contribution = -1.0;
        assert!(params.validate().is_err());

        let mut params = early_scheme();
        params.reinvestment_annual_rate = -1.5;
        assert!(params.validate().is_err());
    }
}
