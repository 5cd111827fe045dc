//! Monthly output records and run summaries

use serde::{Deserialize, Serialize};

use super::state::Phase;
use crate::calendar::Month;
use crate::comparison::{NamedSeries, ValuePoint};

/// One month of a scheme projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub month: Month,
    pub phase: Phase,

    // Contributions paid to the provider
    pub contribution_paid: f64,
    pub cumulative_contributions: f64,

    // Pension
    pub pension_gross: f64,
    pub pension_tax: f64,
    pub pension_net: f64,

    // Side fund
    pub side_fund_contribution: f64,
    pub side_fund_interest: f64,
    pub side_fund_balance: f64,

    // Reinvestment pot
    pub reinvestment_interest_gross: f64,
    pub reinvestment_tax: f64,
    pub reinvestment_interest_net: f64,
    pub reinvestment_pot: f64,

    /// Reinvestment pot plus side fund balance
    pub total_value: f64,
}

impl MonthlyRecord {
    /// Create an empty record for the month
    pub fn new(month: Month, phase: Phase) -> Self {
        Self {
            month,
            phase,
            contribution_paid: 0.0,
            cumulative_contributions: 0.0,
            pension_gross: 0.0,
            pension_tax: 0.0,
            pension_net: 0.0,
            side_fund_contribution: 0.0,
            side_fund_interest: 0.0,
            side_fund_balance: 0.0,
            reinvestment_interest_gross: 0.0,
            reinvestment_tax: 0.0,
            reinvestment_interest_net: 0.0,
            reinvestment_pot: 0.0,
            total_value: 0.0,
        }
    }

    pub fn value(&self, column: Column) -> f64 {
        match column {
            Column::ContributionPaid => self.contribution_paid,
            Column::CumulativeContributions => self.cumulative_contributions,
            Column::PensionGross => self.pension_gross,
            Column::PensionTax => self.pension_tax,
            Column::PensionNet => self.pension_net,
            Column::SideFundContribution => self.side_fund_contribution,
            Column::SideFundInterest => self.side_fund_interest,
            Column::SideFundBalance => self.side_fund_balance,
            Column::ReinvestmentInterestGross => self.reinvestment_interest_gross,
            Column::ReinvestmentTax => self.reinvestment_tax,
            Column::ReinvestmentInterestNet => self.reinvestment_interest_net,
            Column::ReinvestmentPot => self.reinvestment_pot,
            Column::TotalValue => self.total_value,
        }
    }
}

/// Numeric columns of a `MonthlyRecord`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Column {
    ContributionPaid,
    CumulativeContributions,
    PensionGross,
    PensionTax,
    PensionNet,
    SideFundContribution,
    SideFundInterest,
    SideFundBalance,
    ReinvestmentInterestGross,
    ReinvestmentTax,
    ReinvestmentInterestNet,
    ReinvestmentPot,
    TotalValue,
}

impl Column {
    pub fn header(self) -> &'static str {
        match self {
            Column::ContributionPaid => "Contributions Paid This Month",
            Column::CumulativeContributions => "Cumulative Contributions Paid",
            Column::PensionGross => "Pension Received (Gross)",
            Column::PensionTax => "Tax on Pension",
            Column::PensionNet => "Pension Received (Net)",
            Column::SideFundContribution => "Side Fund Contribution",
            Column::SideFundInterest => "Side Fund Interest",
            Column::SideFundBalance => "Side Fund Balance",
            Column::ReinvestmentInterestGross => "Reinvestment Interest (Gross)",
            Column::ReinvestmentTax => "Tax on Reinvestment Interest",
            Column::ReinvestmentInterestNet => "Reinvestment Interest (Net)",
            Column::ReinvestmentPot => "Reinvestment Pot",
            Column::TotalValue => "Total Value",
        }
    }
}

/// Column subsets offered to display layers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordView {
    /// Pension received, side fund, pot and total
    Summary,
    Pension,
    /// Contributions, side fund and reinvestment interest
    Investment,
    /// Withholding columns; empty when tax is disabled
    Tax,
}

impl RecordView {
    pub fn columns(self, has_side_fund: bool, tax_enabled: bool) -> Vec<Column> {
        let mut columns = Vec::new();
        match self {
            RecordView::Summary => {
                columns.push(if tax_enabled { Column::PensionNet } else { Column::PensionGross });
                if has_side_fund {
                    columns.push(Column::SideFundBalance);
                }
                columns.push(Column::ReinvestmentPot);
                columns.push(Column::TotalValue);
            }
            RecordView::Pension => {
                columns.push(Column::PensionGross);
                if tax_enabled {
                    columns.push(Column::PensionTax);
                }
                columns.push(Column::PensionNet);
            }
            RecordView::Investment => {
                columns.push(Column::ContributionPaid);
                columns.push(Column::CumulativeContributions);
                if has_side_fund {
                    columns.extend([
                        Column::SideFundContribution,
                        Column::SideFundInterest,
                        Column::SideFundBalance,
                    ]);
                }
                columns.extend([
                    Column::ReinvestmentInterestGross,
                    Column::ReinvestmentInterestNet,
                    Column::ReinvestmentPot,
                ]);
            }
            RecordView::Tax => {
                if tax_enabled {
                    columns.extend([Column::PensionTax, Column::ReinvestmentTax]);
                }
            }
        }
        columns
    }
}

/// A projection of records onto a subset of columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordTable {
    pub columns: Vec<Column>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub month: Month,
    pub values: Vec<f64>,
}

impl RecordTable {
    pub fn headers(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.header()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() || self.rows.is_empty()
    }
}

/// Complete result of one scheme simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// One record per simulated month
    pub records: Vec<MonthlyRecord>,

    /// Net reinvestment interest plus side fund interest
    pub total_interest: f64,

    /// Total value of the last record (0 when there are no records)
    pub final_value: f64,

    pub tax_on_pension: f64,
    pub tax_on_interest: f64,

    /// Whether the scheme ran with a side fund
    pub has_side_fund: bool,
}

impl SimulationResult {
    pub fn new(has_side_fund: bool) -> Self {
        Self {
            records: Vec::new(),
            total_interest: 0.0,
            final_value: 0.0,
            tax_on_pension: 0.0,
            tax_on_interest: 0.0,
            has_side_fund,
        }
    }

    /// Add a monthly record
    pub fn add_record(&mut self, record: MonthlyRecord) {
        self.records.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_tax(&self) -> f64 {
        self.tax_on_pension + self.tax_on_interest
    }

    /// `(records, total_interest, final_value, tax_on_pension, tax_on_interest)`
    pub fn into_parts(self) -> (Vec<MonthlyRecord>, f64, f64, f64, f64) {
        (
            self.records,
            self.total_interest,
            self.final_value,
            self.tax_on_pension,
            self.tax_on_interest,
        )
    }

    /// Total value by month, for comparison against other schemes
    pub fn value_series(&self, name: impl Into<String>) -> NamedSeries {
        NamedSeries::new(
            name,
            self.records
                .iter()
                .map(|r| ValuePoint::new(r.month, r.total_value))
                .collect(),
        )
    }

    /// Project the records onto one of the display views
    pub fn view(&self, view: RecordView, tax_enabled: bool) -> RecordTable {
        let columns = view.columns(self.has_side_fund, tax_enabled);
        let rows = if columns.is_empty() {
            Vec::new()
        } else {
            self.records
                .iter()
                .map(|record| TableRow {
                    month: record.month,
                    values: columns.iter().map(|&c| record.value(c)).collect(),
                })
                .collect()
        };

        RecordTable { columns, rows }
    }

    /// Get summary statistics
    pub fn summary(&self) -> SimulationSummary {
        let total_contributions = self
            .records
            .last()
            .map(|r| r.cumulative_contributions)
            .unwrap_or(0.0);
        let total_pension_gross: f64 = self.records.iter().map(|r| r.pension_gross).sum();
        let total_pension_net: f64 = self.records.iter().map(|r| r.pension_net).sum();
        let total_side_fund_contributions: f64 =
            self.records.iter().map(|r| r.side_fund_contribution).sum();

        SimulationSummary {
            total_months: self.records.len() as u32,
            total_contributions,
            total_side_fund_contributions,
            total_pension_gross,
            total_pension_net,
            total_interest: self.total_interest,
            total_tax: self.total_tax(),
            final_value: self.final_value,
        }
    }
}

/// Summary statistics for a scheme run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub total_months: u32,
    pub total_contributions: f64,
    pub total_side_fund_contributions: f64,
    pub total_pension_gross: f64,
    pub total_pension_net: f64,
    pub total_interest: f64,
    pub total_tax: f64,
    pub final_value: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(month: u32, pension: f64, tax: f64, pot: f64) -> MonthlyRecord {
        let mut r = MonthlyRecord::new(Month::new(2026, month).unwrap(), Phase::Payout);
        r.pension_gross = pension;
        r.pension_tax = tax;
        r.pension_net = pension - tax;
        r.reinvestment_pot = pot;
        r.total_value = pot;
        r
    }

    fn result() -> SimulationResult {
        let mut result = SimulationResult::new(false);
        result.add_record(record(1, 100.0, 30.0, 70.0));
        result.add_record(record(2, 100.0, 30.0, 140.5));
        result.final_value = 140.5;
        result.tax_on_pension = 60.0;
        result
    }

    #[test]
    fn test_summary_view_uses_net_pension_when_taxed() {
        let table = result().view(RecordView::Summary, true);
        assert_eq!(table.columns, vec![Column::PensionNet, Column::ReinvestmentPot, Column::TotalValue]);
        assert_eq!(table.rows[0].values, vec![70.0, 70.0, 70.0]);
        assert_eq!(table.headers()[0], "Pension Received (Net)");
    }

    #[test]
    fn test_summary_view_includes_side_fund_when_present() {
        let mut r = result();
        r.has_side_fund = true;
        let table = r.view(RecordView::Summary, false);
        assert_eq!(
            table.columns,
            vec![Column::PensionGross, Column::SideFundBalance, Column::ReinvestmentPot, Column::TotalValue]
        );
    }

    #[test]
    fn test_tax_view_empty_when_disabled() {
        let table = result().view(RecordView::Tax, false);
        assert!(table.is_empty());
        assert!(table.rows.is_empty());

        let table = result().view(RecordView::Tax, true);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[1].values, vec![30.0, 0.0]);
    }

    #[test]
    fn test_value_series_follows_records() {
        let series = result().value_series("Scheme 60");
        assert_eq!(series.name, "Scheme 60");
        assert_eq!(series.points.len(), 2);
        assert_eq!(series.points[1].value, 140.5);
    }

    #[test]
    fn test_summary_totals() {
        let summary = result().summary();
        assert_eq!(summary.total_months, 2);
        assert_eq!(summary.total_pension_gross, 200.0);
        assert_eq!(summary.total_pension_net, 140.0);
        assert_eq!(summary.total_tax, 60.0);
        assert_eq!(summary.final_value, 140.5);
    }
}
