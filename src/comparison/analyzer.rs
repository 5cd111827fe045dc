//! Overtake detection and final ranking across schemes

use std::cmp::Ordering;
use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use super::series::{merge_series, MergedTable, NamedSeries};
use crate::calendar::Month;

/// One scheme's total value moving above another's
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvertakeEvent {
    pub month: Month,
    pub overtaking_scheme: String,
    pub overtaken_scheme: String,
}

impl fmt::Display for OvertakeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} overtakes {} on {}",
            self.overtaking_scheme,
            self.overtaken_scheme,
            self.month.long_label()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEntry {
    /// 1-based position
    pub rank: usize,
    pub scheme: String,
    pub final_value: f64,
}

/// Schemes ordered by value at the last merged month, highest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub entries: Vec<RankEntry>,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn leader(&self) -> Option<&RankEntry> {
        self.entries.first()
    }

    pub fn position_of(&self, scheme: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.scheme == scheme).map(|e| e.rank)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub overtakes: Vec<OvertakeEvent>,
    pub ranking: Ranking,
}

impl ComparisonResult {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Compare schemes month by month.
///
/// Returns an empty result when no series is given or any series is empty.
pub fn compare(series: &[NamedSeries]) -> ComparisonResult {
    if series.is_empty() || series.iter().any(NamedSeries::is_empty) {
        debug!("comparison skipped: {} series, some without data", series.len());
        return ComparisonResult::empty();
    }

    let merged = merge_series(series);
    ComparisonResult {
        overtakes: detect_overtakes(&merged),
        ranking: rank_final_values(&merged),
    }
}

/// Walk the merged table and report every month where one series moves above
/// another.
///
/// Previous values are seeded from the first merged month, so the first month
/// never reports an overtake. X overtakes Y when X is now strictly above Y,
/// was at or below Y the month before, X is positive, and Y held a positive
/// value the month before; a scheme still at zero cannot be overtaken.
/// Pairs are checked in input order, every ordered pair each month.
pub fn detect_overtakes(merged: &MergedTable) -> Vec<OvertakeEvent> {
    let mut events = Vec::new();
    let Some(first) = merged.rows.first() else {
        return events;
    };

    let mut previous = first.values.clone();

    for row in merged.rows.iter().skip(1) {
        let current = &row.values;

        for x in 0..current.len() {
            for y in 0..current.len() {
                if x == y {
                    continue;
                }

                let overtook = current[x] > current[y]
                    && previous[x] <= previous[y]
                    && current[x] > 0.0
                    && previous[y] > 0.0;

                if overtook {
                    events.push(OvertakeEvent {
                        month: row.month,
                        overtaking_scheme: merged.names[x].clone(),
                        overtaken_scheme: merged.names[y].clone(),
                    });
                }
            }
        }

        previous.clone_from(current);
    }

    events
}

/// Rank series by their value in the last merged month. Equal values keep
/// input order.
pub fn rank_final_values(merged: &MergedTable) -> Ranking {
    let Some(last) = merged.last() else {
        return Ranking::default();
    };

    let mut finals: Vec<(&String, f64)> = merged.names.iter().zip(last.values.iter().copied()).collect();
    finals.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    Ranking {
        entries: finals
            .into_iter()
            .enumerate()
            .map(|(i, (name, value))| RankEntry {
                rank: i + 1,
                scheme: name.clone(),
                final_value: value,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comparison::ValuePoint;

    fn month(n: u32) -> Month {
        Month::new(2025, 1).unwrap().add_months(n).unwrap()
    }

    fn series(name: &str, values: &[f64]) -> NamedSeries {
        NamedSeries::new(
            name,
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| ValuePoint::new(month(i as u32), v))
                .collect(),
        )
    }

    #[test]
    fn test_single_overtake_and_ranking() {
        let result = compare(&[series("A", &[0.0, 50.0, 150.0]), series("B", &[0.0, 100.0, 100.0])]);

        assert_eq!(
            result.overtakes,
            vec![OvertakeEvent {
                month: month(2),
                overtaking_scheme: "A".to_string(),
                overtaken_scheme: "B".to_string(),
            }]
        );

        assert_eq!(result.ranking.entries.len(), 2);
        assert_eq!(result.ranking.entries[0].scheme, "A");
        assert_eq!(result.ranking.entries[0].final_value, 150.0);
        assert_eq!(result.ranking.entries[0].rank, 1);
        assert_eq!(result.ranking.entries[1].scheme, "B");
        assert_eq!(result.ranking.entries[1].final_value, 100.0);
        assert_eq!(result.ranking.entries[1].rank, 2);
    }

    #[test]
    fn test_first_month_never_reports() {
        let result = compare(&[series("A", &[10.0, 20.0]), series("B", &[5.0, 30.0])]);
        assert_eq!(result.overtakes.len(), 1);
        assert_eq!(result.overtakes[0].overtaking_scheme, "B");
        assert_eq!(result.overtakes[0].month, month(1));
    }

    #[test]
    fn test_tie_then_lead_counts() {
        let result = compare(&[series("A", &[10.0, 10.0, 12.0]), series("B", &[10.0, 10.0, 11.0])]);
        assert_eq!(result.overtakes.len(), 1);
        assert_eq!(result.overtakes[0].month, month(2));
        assert_eq!(result.overtakes[0].overtaking_scheme, "A");
    }

    #[test]
    fn test_back_and_forth() {
        let result = compare(&[
            series("A", &[10.0, 30.0, 30.0, 60.0]),
            series("B", &[20.0, 20.0, 40.0, 50.0]),
        ]);
        let described: Vec<(String, Month)> = result
            .overtakes
            .iter()
            .map(|e| (e.overtaking_scheme.clone(), e.month))
            .collect();
        assert_eq!(
            described,
            vec![("A".to_string(), month(1)), ("B".to_string(), month(2)), ("A".to_string(), month(3))]
        );
    }

    #[test]
    fn test_leaving_zero_is_not_an_overtake() {
        let result = compare(&[series("A", &[0.0, 0.0, 5.0]), series("B", &[0.0, 0.0, 0.0])]);
        assert!(result.overtakes.is_empty());
        assert_eq!(result.ranking.leader().unwrap().scheme, "A");
    }

    #[test]
    fn test_three_schemes_checked_pairwise() {
        let result = compare(&[
            series("A", &[5.0, 50.0]),
            series("B", &[10.0, 20.0]),
            series("C", &[15.0, 30.0]),
        ]);
        let pairs: Vec<(&str, &str)> = result
            .overtakes
            .iter()
            .map(|e| (e.overtaking_scheme.as_str(), e.overtaken_scheme.as_str()))
            .collect();
        assert_eq!(pairs, vec![("A", "B"), ("A", "C")]);

        let order: Vec<&str> = result.ranking.entries.iter().map(|e| e.scheme.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
    }

    #[test]
    fn test_missing_months_read_as_zero() {
        let late = NamedSeries::new(
            "Late",
            vec![ValuePoint::new(month(1), 100.0), ValuePoint::new(month(2), 120.0)],
        );
        let early = series("Early", &[50.0, 60.0, 70.0]);

        let result = compare(&[early, late]);
        // Late is 0 in month 0, so it cannot be overtaken then; it overtakes Early in month 1
        assert_eq!(result.overtakes.len(), 1);
        assert_eq!(result.overtakes[0].overtaking_scheme, "Late");
        assert_eq!(result.ranking.entries[0].scheme, "Late");
    }

    #[test]
    fn test_ties_keep_input_order() {
        let result = compare(&[series("First", &[1.0, 5.0]), series("Second", &[1.0, 5.0])]);
        assert!(result.overtakes.is_empty());
        assert_eq!(result.ranking.entries[0].scheme, "First");
        assert_eq!(result.ranking.entries[1].scheme, "Second");
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(compare(&[]), ComparisonResult::empty());

        let result = compare(&[series("A", &[1.0, 2.0]), NamedSeries::new("B", Vec::new())]);
        assert!(result.overtakes.is_empty());
        assert!(result.ranking.is_empty());
    }

    #[test]
    fn test_display() {
        let event = OvertakeEvent {
            month: Month::new(2028, 6).unwrap(),
            overtaking_scheme: "Scheme 60".to_string(),
            overtaken_scheme: "Scheme 58".to_string(),
        };
        assert_eq!(event.to_string(), "Scheme 60 overtakes Scheme 58 on June 2028");
    }
}
