//! Monthly projection engine for a single pension scheme

use log::{debug, trace, warn};

use super::records::{MonthlyRecord, SimulationResult};
use super::state::{MonthSchedule, SchemeState};
use crate::calendar::Month;
use crate::scheme::SimulationParameters;

/// Runs one scheme from its lump-sum month through the display horizon
#[derive(Debug, Clone)]
pub struct SchemeSimulator {
    params: SimulationParameters,
    reinvestment_rate: f64,
    side_fund_rate: f64,
}

impl SchemeSimulator {
    pub fn new(params: SimulationParameters) -> Self {
        let reinvestment_rate = params.reinvestment_monthly_rate();
        let side_fund_rate = params.side_fund.map(|sf| sf.monthly_rate()).unwrap_or(0.0);

        Self {
            params,
            reinvestment_rate,
            side_fund_rate,
        }
    }

    pub fn parameters(&self) -> &SimulationParameters {
        &self.params
    }

    /// Run the full projection
    pub fn run(&self) -> SimulationResult {
        let mut result = SimulationResult::new(self.params.side_fund.is_some());
        let start = self.params.lump_sum_month;
        let end = self.params.display_end_month;

        if start > end {
            warn!("horizon {} is before the first month {}; nothing to project", end, start);
            return result;
        }

        debug!(
            "projecting {} months from {} to {} (reinvestment {:.6}/month, side fund {:.6}/month)",
            start.months_until(end) + 1,
            start,
            end,
            self.reinvestment_rate,
            self.side_fund_rate,
        );

        let mut state = SchemeState::default();
        for month in Month::range_inclusive(start, end) {
            let (next, record) = self.step(&state, month);
            trace!("{} {:?} total={:.2}", record.month, record.phase, record.total_value);
            result.add_record(record);
            state = next;
        }

        result.total_interest = state.total_interest();
        result.final_value = result.records.last().map(|r| r.total_value).unwrap_or(0.0);
        result.tax_on_pension = state.tax_on_pension;
        result.tax_on_interest = state.tax_on_interest;

        result
    }

    /// Advance one month: (previous state, month) -> (new state, record)
    pub fn step(&self, previous: &SchemeState, month: Month) -> (SchemeState, MonthlyRecord) {
        let schedule = MonthSchedule::for_month(&self.params, month);
        let mut state = *previous;
        let mut record = MonthlyRecord::new(month, schedule.phase);

        self.apply_contributions(&schedule, &mut state, &mut record);
        self.apply_pension(&schedule, &mut state, &mut record);

        if schedule.merge_due {
            state.reinvestment_pot += state.side_fund_balance;
            state.side_fund_balance = 0.0;
        }

        self.apply_reinvestment_growth(&schedule, &mut state, &mut record);

        record.cumulative_contributions = state.cumulative_contributions;
        record.side_fund_balance = state.side_fund_balance;
        record.reinvestment_pot = state.reinvestment_pot;
        record.total_value = state.total_value();

        (state, record)
    }

    /// Lump sum, then the recurring contribution to the provider or the side fund
    fn apply_contributions(&self, schedule: &MonthSchedule, state: &mut SchemeState, record: &mut MonthlyRecord) {
        let contribution = self.params.monthly_contribution;

        if schedule.lump_sum_due {
            state.cumulative_contributions += self.params.initial_lump_sum;
            record.contribution_paid += self.params.initial_lump_sum;
        }

        if schedule.contribution_to_provider {
            state.cumulative_contributions += contribution;
            record.contribution_paid += contribution;
        } else if schedule.contribution_to_side_fund {
            state.side_fund_balance += contribution;
            record.side_fund_contribution = contribution;

            // Side fund growth is never taxed
            let interest = state.side_fund_balance * self.side_fund_rate;
            state.side_fund_balance += interest;
            state.side_fund_interest_earned += interest;
            record.side_fund_interest = interest;
        }
    }

    fn apply_pension(&self, schedule: &MonthSchedule, state: &mut SchemeState, record: &mut MonthlyRecord) {
        if !schedule.pension_due {
            return;
        }

        let gross = self.params.pension_amount;
        let (tax, net) = self.withhold(gross, schedule.taxable);

        state.reinvestment_pot += net;
        state.tax_on_pension += tax;

        record.pension_gross = gross;
        record.pension_tax = tax;
        record.pension_net = net;
    }

    /// Interest on the pot after all of this month's inflows
    fn apply_reinvestment_growth(&self, schedule: &MonthSchedule, state: &mut SchemeState, record: &mut MonthlyRecord) {
        if state.reinvestment_pot <= 0.0 {
            return;
        }

        let gross = state.reinvestment_pot * self.reinvestment_rate;
        let (tax, net) = self.withhold(gross, schedule.taxable);

        state.reinvestment_pot += net;
        state.reinvestment_interest_earned += net;
        state.tax_on_interest += tax;

        record.reinvestment_interest_gross = gross;
        record.reinvestment_tax = tax;
        record.reinvestment_interest_net = net;
    }

    /// Split an amount into (tax withheld, net)
    fn withhold(&self, gross: f64, taxable: bool) -> (f64, f64) {
        if taxable {
            let tax = gross * self.params.tax.rate;
            (tax, gross - tax)
        } else {
            (0.0, gross)
        }
    }
}

/// Project a single scheme
pub fn simulate(params: &SimulationParameters) -> SimulationResult {
    SchemeSimulator::new(params.clone()).run()
}
