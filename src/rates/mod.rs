//! Interest rate conventions shared by every scheme

mod compounding;

pub use compounding::{compounding_periods, monthly_rate, CompoundingFrequency};
