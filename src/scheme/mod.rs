//! Scheme parameters and scenario loading

mod data;
pub mod loader;

pub use data::{GrowthFundParameters, SideFundConfig, SimulationParameters, TaxConfig};
pub use loader::{load_scenario_json, load_scenarios, load_scenarios_from_reader, LabeledScenario};
