//! Named value series and their month-aligned merge

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::calendar::Month;

/// Value of a scheme at the end of a month
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePoint {
    pub month: Month,
    pub value: f64,
}

impl ValuePoint {
    pub fn new(month: Month, value: f64) -> Self {
        Self { month, value }
    }
}

/// A scheme's total value over time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSeries {
    pub name: String,
    pub points: Vec<ValuePoint>,
}

impl NamedSeries {
    pub fn new(name: impl Into<String>, points: Vec<ValuePoint>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Series outer-joined on month, missing values filled with zero
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedTable {
    pub names: Vec<String>,
    pub rows: Vec<MergedRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    pub month: Month,
    /// One value per series, in the order of `MergedTable::names`
    pub values: Vec<f64>,
}

impl MergedTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn last(&self) -> Option<&MergedRow> {
        self.rows.last()
    }
}

/// Outer join on month across all series, ascending by month.
///
/// A month missing from a series reads as 0. If a series repeats a month the
/// later point wins.
pub fn merge_series(series: &[NamedSeries]) -> MergedTable {
    let width = series.len();
    let mut by_month: BTreeMap<Month, Vec<f64>> = BTreeMap::new();

    for (column, s) in series.iter().enumerate() {
        for point in &s.points {
            by_month.entry(point.month).or_insert_with(|| vec![0.0; width])[column] = point.value;
        }
    }

    MergedTable {
        names: series.iter().map(|s| s.name.clone()).collect(),
        rows: by_month
            .into_iter()
            .map(|(month, values)| MergedRow { month, values })
            .collect(),
    }
}
