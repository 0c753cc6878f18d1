//! Ranking and top-K selection.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::aggregate::{GroupRecord, OpeningAggregate};
use crate::metrics::EloBucket;

/// The value a ranking orders by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKey {
    AvgError,
    AvgTimePerMove,
    WinRate,
    Score,
    AvgExitPly,
    GameCount,
}

impl MetricKey {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKey::AvgError => "avg_error",
            MetricKey::AvgTimePerMove => "avg_time_per_move",
            MetricKey::WinRate => "win_rate",
            MetricKey::Score => "score",
            MetricKey::AvgExitPly => "avg_exit_ply",
            MetricKey::GameCount => "games",
        }
    }
}

/// Something that can be placed in a ranking.
pub trait Ranked {
    fn label(&self) -> String;

    /// `None` when the metric is undefined for this entry.
    fn metric(&self, key: MetricKey) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankOptions {
    /// Descending instead of ascending.
    pub reverse: bool,
    /// Keep only the first N entries; `Some(0)` keeps none.
    pub take_top: Option<usize>,
}

impl RankOptions {
    pub fn ascending() -> Self {
        Self::default()
    }

    pub fn descending() -> Self {
        Self {
            reverse: true,
            take_top: None,
        }
    }

    pub fn top(mut self, n: usize) -> Self {
        self.take_top = Some(n);
        self
    }
}

/// Order `items` by `key`, ascending unless `reverse`, then truncate to `take_top`.
///
/// The sort is stable: entries with equal values keep their input order in
/// both directions. Undefined values order above every defined one, so they
/// come last ascending and first descending.
pub fn rank<T: Ranked>(mut items: Vec<T>, key: MetricKey, options: RankOptions) -> Vec<T> {
    items.sort_by(|a, b| {
        let ord = match (a.metric(key), b.metric(key)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if options.reverse {
            ord.reverse()
        } else {
            ord
        }
    });

    if let Some(n) = options.take_top {
        items.truncate(n);
    }
    items
}

/// Every entry tied for the best value of `key`, in input order. "Best" is
/// the highest value when `highest` is set, the lowest otherwise.
pub fn leaders<T: Ranked>(items: Vec<T>, key: MetricKey, highest: bool) -> Vec<T> {
    let best = items
        .iter()
        .filter_map(|item| item.metric(key))
        .fold(None, |best: Option<f64>, v| match best {
            Some(b) if (highest && b >= v) || (!highest && b <= v) => Some(b),
            _ => Some(v),
        });

    match best {
        Some(best) => items
            .into_iter()
            .filter(|item| item.metric(key) == Some(best))
            .collect(),
        None => Vec::new(),
    }
}

impl Ranked for OpeningAggregate<'_> {
    fn label(&self) -> String {
        self.name.clone()
    }

    fn metric(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::AvgError => self.avg_game_error,
            MetricKey::AvgTimePerMove => self.avg_time_series.overall_mean(),
            MetricKey::WinRate => self.record.win_rate(),
            MetricKey::Score => self.record.score(),
            MetricKey::AvgExitPly => self.avg_exit_ply,
            MetricKey::GameCount => Some(self.games.len() as f64),
        }
    }
}

impl Ranked for GroupRecord<'_> {
    fn label(&self) -> String {
        self.label.clone()
    }

    fn metric(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::AvgError => crate::metrics::average_game_error(&self.games),
            MetricKey::AvgTimePerMove => {
                crate::metrics::average_time_per_move(&self.games, None).overall_mean()
            }
            MetricKey::WinRate => self.record.win_rate(),
            MetricKey::Score => self.record.score(),
            MetricKey::AvgExitPly => None,
            MetricKey::GameCount => Some(self.record.total() as f64),
        }
    }
}

impl Ranked for EloBucket {
    fn label(&self) -> String {
        EloBucket::label(self)
    }

    fn metric(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::WinRate => self.record.win_rate(),
            MetricKey::Score => self.record.score(),
            MetricKey::GameCount => Some(self.record.total() as f64),
            MetricKey::AvgError | MetricKey::AvgTimePerMove | MetricKey::AvgExitPly => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry(&'static str, Option<f64>);

    impl Ranked for Entry {
        fn label(&self) -> String {
            self.0.to_string()
        }

        fn metric(&self, _key: MetricKey) -> Option<f64> {
            self.1
        }
    }

    fn labels(entries: &[Entry]) -> Vec<&'static str> {
        entries.iter().map(|e| e.0).collect()
    }

    fn sample() -> Vec<Entry> {
        vec![
            Entry("c", Some(0.7)),
            Entry("a", Some(0.5)),
            Entry("b", Some(0.5)),
            Entry("d", Some(0.2)),
        ]
    }

    #[test]
    fn test_ascending_with_stable_ties() {
        let ranked = rank(sample(), MetricKey::AvgError, RankOptions::ascending());
        assert_eq!(labels(&ranked), vec!["d", "a", "b", "c"]);
    }

    #[test]
    fn test_reverse_keeps_tie_order() {
        let ranked = rank(sample(), MetricKey::AvgError, RankOptions::descending());
        assert_eq!(labels(&ranked), vec!["c", "a", "b", "d"]);
    }

    #[test]
    fn test_take_top_with_tie() {
        let items = vec![Entry("x", Some(0.5)), Entry("y", Some(0.5)), Entry("z", Some(0.7))];
        let ranked = rank(items, MetricKey::AvgError, RankOptions::ascending().top(2));
        assert_eq!(labels(&ranked), vec!["x", "y"]);
    }

    #[test]
    fn test_take_top_bounds() {
        assert_eq!(rank(sample(), MetricKey::Score, RankOptions::ascending().top(10)).len(), 4);
        assert!(rank(sample(), MetricKey::Score, RankOptions::ascending().top(0)).is_empty());
        for n in 1..=4 {
            assert_eq!(rank(sample(), MetricKey::Score, RankOptions::ascending().top(n)).len(), n);
        }
    }

    #[test]
    fn test_reversing_distinct_values_mirrors_order() {
        let items = vec![Entry("a", Some(3.0)), Entry("b", Some(1.0)), Entry("c", Some(2.0))];
        let asc = rank(items.clone(), MetricKey::Score, RankOptions::ascending());
        let mut desc = rank(items, MetricKey::Score, RankOptions::descending());
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_undefined_flips_with_direction() {
        let items = vec![Entry("none", None), Entry("low", Some(1.0)), Entry("high", Some(2.0))];
        let asc = rank(items.clone(), MetricKey::WinRate, RankOptions::ascending());
        assert_eq!(labels(&asc), vec!["low", "high", "none"]);
        let mut desc = rank(items, MetricKey::WinRate, RankOptions::descending());
        assert_eq!(labels(&desc), vec!["none", "high", "low"]);
        desc.reverse();
        assert_eq!(asc, desc);
    }

    #[test]
    fn test_nan_has_a_fixed_place() {
        let items = vec![
            Entry("nan", Some(f64::NAN)),
            Entry("one", Some(1.0)),
            Entry("two", Some(2.0)),
        ];
        let asc = rank(items.clone(), MetricKey::AvgTimePerMove, RankOptions::ascending());
        assert_eq!(labels(&asc), vec!["one", "two", "nan"]);
        let desc = rank(items, MetricKey::AvgTimePerMove, RankOptions::descending());
        assert_eq!(labels(&desc), vec!["nan", "two", "one"]);
    }

    #[test]
    fn test_empty_input() {
        let options = RankOptions::ascending().top(3);
        let ranked: Vec<Entry> = rank(Vec::new(), MetricKey::AvgError, options);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_leaders_returns_all_ties() {
        let top = leaders(sample(), MetricKey::AvgError, false);
        assert_eq!(labels(&top), vec!["d"]);
        let items = vec![
            Entry("a", Some(2.0)),
            Entry("b", None),
            Entry("c", Some(2.0)),
            Entry("d", Some(1.0)),
        ];
        let tied = leaders(items, MetricKey::Score, true);
        assert_eq!(labels(&tied), vec!["a", "c"]);
        assert!(leaders(vec![Entry("n", None)], MetricKey::Score, true).is_empty());
    }
}
