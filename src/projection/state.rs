//! Per-month phase derivation and running balances for a scheme

use serde::{Deserialize, Serialize};

use crate::calendar::Month;
use crate::scheme::SimulationParameters;

/// Where a scheme is in its life cycle for a given month
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Contributions still go to the provider
    Contribution,
    /// Contributions are diverted into the side fund
    SideFund,
    /// No contributions; only pension and reinvestment activity
    Payout,
    /// At or after the transition month, side fund folded into the pot
    Merged,
}

/// Everything that triggers in a month, derived purely from date comparisons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthSchedule {
    pub phase: Phase,
    pub lump_sum_due: bool,
    pub contribution_to_provider: bool,
    pub contribution_to_side_fund: bool,
    pub pension_due: bool,
    pub taxable: bool,
    pub merge_due: bool,
}

impl MonthSchedule {
    pub fn for_month(params: &SimulationParameters, month: Month) -> Self {
        let contribution_to_provider = params.in_contribution_window(month);
        let contribution_to_side_fund = !contribution_to_provider && params.in_side_fund_window(month);
        let merge_window = params.side_fund.is_some()
            && params.transition_month.map_or(false, |transition| month >= transition);

        let phase = if contribution_to_provider {
            Phase::Contribution
        } else if contribution_to_side_fund {
            Phase::SideFund
        } else if merge_window {
            Phase::Merged
        } else {
            Phase::Payout
        };

        Self {
            phase,
            lump_sum_due: month == params.lump_sum_month,
            contribution_to_provider,
            contribution_to_side_fund,
            pension_due: month >= params.pension_start_month,
            taxable: params.is_taxable(month),
            merge_due: params.side_fund.is_some() && params.transition_month == Some(month),
        }
    }
}

/// Running balances carried from one month to the next
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SchemeState {
    /// Lump sum plus contributions paid to the provider so far
    pub cumulative_contributions: f64,

    /// Pension payouts (net of tax) and their compounded interest
    pub reinvestment_pot: f64,

    /// Balance of the interim side fund (zero outside its window)
    pub side_fund_balance: f64,

    /// Net interest credited to the reinvestment pot so far
    pub reinvestment_interest_earned: f64,

    /// Untaxed interest credited to the side fund so far
    pub side_fund_interest_earned: f64,

    pub tax_on_pension: f64,
    pub tax_on_interest: f64,
}

impl SchemeState {
    /// Value the member holds: reinvestment pot plus any unmerged side fund
    pub fn total_value(&self) -> f64 {
        self.reinvestment_pot + self.side_fund_balance
    }

    pub fn total_interest(&self) -> f64 {
        self.reinvestment_interest_earned + self.side_fund_interest_earned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rates::CompoundingFrequency;
    use crate::scheme::{SideFundConfig, TaxConfig};

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn params() -> SimulationParameters {
        SimulationParameters {
            initial_lump_sum: 1000.0,
            lump_sum_month: month(2025, 1),
            monthly_contribution: 100.0,
            contribution_start_month: None,
            contribution_end_month: month(2025, 6),
            pension_amount: 500.0,
            pension_start_month: month(2025, 7),
            reinvestment_annual_rate: 0.05,
            reinvestment_compounding: CompoundingFrequency::Monthly,
            side_fund: Some(SideFundConfig {
                growth_rate: 0.08,
                compounding: CompoundingFrequency::Monthly,
            }),
            transition_month: Some(month(2026, 1)),
            tax: TaxConfig::flat(0.2),
            display_end_month: month(2026, 6),
        }
    }

    #[test]
    fn test_phase_sequence() {
        let p = params();
        let phases: Vec<Phase> = [month(2025, 1), month(2025, 6), month(2025, 7), month(2025, 12), month(2026, 1), month(2026, 3)]
            .iter()
            .map(|&m| MonthSchedule::for_month(&p, m).phase)
            .collect();

        assert_eq!(
            phases,
            vec![Phase::Contribution, Phase::Contribution, Phase::SideFund, Phase::SideFund, Phase::Merged, Phase::Merged]
        );
    }

    #[test]
    fn test_triggers_are_independent() {
        let mut p = params();
        p.pension_start_month = month(2025, 1);
        let schedule = MonthSchedule::for_month(&p, month(2025, 1));

        assert!(schedule.lump_sum_due);
        assert!(schedule.contribution_to_provider);
        assert!(schedule.pension_due);
        assert!(schedule.taxable);
        assert!(!schedule.merge_due);
    }

    #[test]
    fn test_merge_only_at_transition() {
        let p = params();
        assert!(MonthSchedule::for_month(&p, month(2026, 1)).merge_due);
        assert!(!MonthSchedule::for_month(&p, month(2026, 2)).merge_due);
        assert!(!MonthSchedule::for_month(&p, month(2026, 1)).taxable);
    }

    #[test]
    fn test_plain_scheme_never_merges() {
        let mut p = params();
        p.side_fund = None;
        p.transition_month = None;
        let schedule = MonthSchedule::for_month(&p, month(2026, 1));
        assert_eq!(schedule.phase, Phase::Payout);
        assert!(!schedule.merge_due);
        assert!(!schedule.contribution_to_side_fund);
    }
}
