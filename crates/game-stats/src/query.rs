//! Options shared by the query entry points of [`crate::StatsEngine`].

use serde::{Deserialize, Serialize};

use crate::aggregate::OpeningGrouping;
use crate::criteria::Criteria;
use crate::ranking::RankOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Which games the query looks at. Default: every game.
    pub criteria: Criteria,
    /// Bucket by full opening label or by family. Default: full label.
    pub grouping: OpeningGrouping,
    /// Rank descending instead of ascending. Default: false.
    pub reverse: bool,
    /// Keep only the first N ranked entries. Default: all.
    pub take_top: Option<usize>,
    /// Drop openings and groups with fewer games than this. Default: 0.
    pub games_bound: usize,
    /// Last ply reported by per-ply series. Default: the longest game.
    pub move_bound: Option<usize>,
    /// Per-ply series end before the first ply reached by fewer games. Default: 0.
    pub min_games_per_ply: usize,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            criteria: Criteria::default(),
            grouping: OpeningGrouping::Name,
            reverse: false,
            take_top: None,
            games_bound: 0,
            move_bound: None,
            min_games_per_ply: 0,
        }
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_criteria(criteria: Criteria) -> Self {
        Self {
            criteria,
            ..Self::default()
        }
    }

    pub fn grouping(mut self, grouping: OpeningGrouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    pub fn take_top(mut self, n: usize) -> Self {
        self.take_top = Some(n);
        self
    }

    pub fn games_bound(mut self, n: usize) -> Self {
        self.games_bound = n;
        self
    }

    pub fn move_bound(mut self, ply: usize) -> Self {
        self.move_bound = Some(ply);
        self
    }

    pub fn min_games_per_ply(mut self, n: usize) -> Self {
        self.min_games_per_ply = n;
        self
    }

    pub fn rank_options(&self) -> RankOptions {
        RankOptions {
            reverse: self.reverse,
            take_top: self.take_top,
        }
    }
}
