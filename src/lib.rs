//! Pension Projection - month-by-month simulation and comparison of pension schemes
//!
//! This library provides:
//! - Annual to monthly rate conversion for common compounding frequencies
//! - Scheme projection with contributions, pension payouts, a reinvestment pot,
//!   an optional side fund and pre-transition tax withholding
//! - A two-phase growth fund projection
//! - Cross-scheme comparison (overtake events and final ranking)
//! - Scenario loading, batch runs and CSV/text reporting

pub mod calendar;
pub mod error;
pub mod rates;
pub mod scheme;
pub mod projection;
pub mod comparison;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use calendar::Month;
pub use error::{ProjectionError, Result};
pub use rates::{compounding_periods, monthly_rate, CompoundingFrequency};
pub use scheme::{GrowthFundParameters, SideFundConfig, SimulationParameters, TaxConfig};
pub use projection::{simulate, simulate_growth_fund, MonthlyRecord, SimulationResult};
pub use comparison::{compare, ComparisonResult, NamedSeries, OvertakeEvent, Ranking};
pub use scenario::{ComparisonScenario, ScenarioOutcome, ScenarioRunner};
