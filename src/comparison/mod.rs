//! Cross-scheme comparison: month-aligned merge, overtakes and ranking

mod series;
mod analyzer;

pub use series::{merge_series, MergedRow, MergedTable, NamedSeries, ValuePoint};
pub use analyzer::{
    compare, detect_overtakes, rank_final_values, ComparisonResult, OvertakeEvent, RankEntry, Ranking,
};
