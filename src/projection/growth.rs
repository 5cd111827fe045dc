//! Single-balance growth fund projection
//!
//! Lump sum and contributions go straight into one balance that grows at the
//! phase-one rate through the transition month and at the phase-two rate
//! afterwards. There is no pension, side fund or tax.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::calendar::Month;
use crate::comparison::{NamedSeries, ValuePoint};
use crate::scheme::GrowthFundParameters;

/// One month of a growth fund projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub month: Month,
    pub start_balance: f64,
    pub added_amount: f64,
    pub monthly_rate: f64,
    pub interest: f64,
    pub end_balance: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthFundResult {
    pub records: Vec<GrowthRecord>,
    pub total_interest: f64,
    pub final_value: f64,
}

impl GrowthFundResult {
    pub fn value_series(&self, name: impl Into<String>) -> NamedSeries {
        NamedSeries::new(
            name,
            self.records
                .iter()
                .map(|r| ValuePoint::new(r.month, r.total_value))
                .collect(),
        )
    }

    pub fn total_added(&self) -> f64 {
        self.records.iter().map(|r| r.added_amount).sum()
    }
}

/// Project a growth fund through its display horizon
pub fn simulate_growth_fund(params: &GrowthFundParameters) -> GrowthFundResult {
    let start = params.lump_sum_month;
    let end = params.display_end_month;

    let mut records = Vec::new();
    let mut balance = 0.0;
    let mut total_interest = 0.0;

    if start > end {
        warn!("growth fund horizon {} is before the first month {}", end, start);
    } else {
        debug!("projecting growth fund from {} to {}, transition {}", start, end, params.transition_month);
    }

    for month in Month::range_inclusive(start, end) {
        let start_balance = balance;
        let mut added_amount = 0.0;

        if month == params.lump_sum_month {
            balance += params.initial_lump_sum;
            added_amount += params.initial_lump_sum;
        }

        if params.in_contribution_window(month) {
            balance += params.monthly_contribution;
            added_amount += params.monthly_contribution;
        }

        let monthly_rate = params.monthly_rate_for(month);
        let interest = balance * monthly_rate;
        balance += interest;
        total_interest += interest;

        records.push(GrowthRecord {
            month,
            start_balance,
            added_amount,
            monthly_rate,
            interest,
            end_balance: balance,
            total_value: balance,
        });
    }

    GrowthFundResult {
        final_value: records.last().map(|r| r.end_balance).unwrap_or(0.0),
        records,
        total_interest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::{monthly_rate, CompoundingFrequency};
    use approx::assert_relative_eq;

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn params() -> GrowthFundParameters {
        GrowthFundParameters {
            initial_lump_sum: 10_000.0,
            lump_sum_month: month(2025, 1),
            monthly_contribution: 500.0,
            contribution_start_month: Some(month(2025, 2)),
            contribution_end_month: month(2025, 6),
            phase_one_rate: 0.083,
            phase_one_compounding: CompoundingFrequency::Monthly,
            transition_month: month(2025, 6),
            phase_two_rate: 0.07,
            phase_two_compounding: CompoundingFrequency::Quarterly,
            display_end_month: month(2025, 12),
        }
    }

    #[test]
    fn test_rate_switches_after_transition() {
        let result = simulate_growth_fund(&params());
        let phase_one = monthly_rate(0.083, 12);
        let phase_two = monthly_rate(0.07, 4);

        let june = &result.records[5];
        let july = &result.records[6];
        assert_eq!(june.month, month(2025, 6));
        assert_relative_eq!(june.monthly_rate, phase_one);
        assert_relative_eq!(july.monthly_rate, phase_two);
        assert_relative_eq!(july.interest, july.start_balance * phase_two, epsilon = 1e-9);
    }

    #[test]
    fn test_first_month_grows_lump_sum() {
        let result = simulate_growth_fund(&params());
        let first = &result.records[0];
        assert_eq!(first.start_balance, 0.0);
        assert_eq!(first.added_amount, 10_000.0);
        assert_relative_eq!(first.end_balance, 10_000.0 * (1.0 + monthly_rate(0.083, 12)), epsilon = 1e-9);
    }

    #[test]
    fn test_balance_rolls_forward() {
        let result = simulate_growth_fund(&params());
        for pair in result.records.windows(2) {
            assert_eq!(pair[1].start_balance, pair[0].end_balance);
        }
        assert_relative_eq!(result.total_added(), 10_000.0 + 5.0 * 500.0);
        assert_relative_eq!(
            result.final_value,
            result.total_added() + result.total_interest,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_empty_horizon() {
        let mut p = params();
        p.display_end_month = month(2024, 12);
        let result = simulate_growth_fund(&p);
        assert!(result.records.is_empty());
        assert_eq!(result.final_value, 0.0);
        assert_eq!(result.total_interest, 0.0);
    }
}
