//! Projection engine for pension schemes

mod state;
mod engine;
mod records;
mod growth;

pub use state::{MonthSchedule, Phase, SchemeState};
pub use engine::{simulate, SchemeSimulator};
pub use records::{
    Column, MonthlyRecord, RecordTable, RecordView, SimulationResult, SimulationSummary, TableRow,
};
pub use growth::{simulate_growth_fund, GrowthFundResult, GrowthRecord};
