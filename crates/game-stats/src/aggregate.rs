//! Grouping of filtered games: per opening, or by any other key.

use std::collections::HashMap;
use std::hash::Hash;

use chess_core::{GameRecord, OpeningBook};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::metrics::{self, PlySeries, Record};

/// Bucket games in first-seen order of their key. Empty groups never appear.
pub fn group_by<'a, K, F>(games: &[&'a GameRecord], key: F) -> Vec<(K, Vec<&'a GameRecord>)>
where
    K: Eq + Hash + Clone,
    F: Fn(&GameRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&'a GameRecord>)> = Vec::new();

    for &game in games {
        let k = key(game);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(game),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, vec![game]));
            }
        }
    }

    groups
}

/// Which label games are bucketed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningGrouping {
    /// Full opening label, variation included.
    #[default]
    Name,
    /// Main opening only; variations fold into it.
    Family,
}

impl OpeningGrouping {
    pub fn key(self, game: &GameRecord) -> &str {
        match self {
            OpeningGrouping::Name => &game.opening,
            OpeningGrouping::Family => game.opening_family(),
        }
    }
}

/// Everything known about one opening within a query's filtered games.
#[derive(Debug, Clone, Serialize)]
pub struct OpeningAggregate<'a> {
    pub name: String,
    #[serde(skip)]
    pub games: Vec<&'a GameRecord>,
    pub record: Record,
    pub avg_error_series: PlySeries,
    pub avg_time_series: PlySeries,
    /// Mean over games of each game's mean error.
    pub avg_game_error: Option<f64>,
    pub avg_exit_ply: Option<f64>,
}

impl<'a> OpeningAggregate<'a> {
    pub fn build<B: OpeningBook + ?Sized>(
        name: String,
        games: Vec<&'a GameRecord>,
        book: &B,
    ) -> Self {
        Self {
            record: Record::tally(games.iter().copied()),
            avg_error_series: metrics::average_error(&games, None),
            avg_time_series: metrics::average_time_per_move(&games, None),
            avg_game_error: metrics::average_game_error(&games),
            avg_exit_ply: metrics::avg_move_leaving_opening(&games, book),
            name,
            games,
        }
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }
}

/// Group filtered games by opening, in first-seen order of the opening names.
pub fn aggregate_by_opening<'a, B: OpeningBook + ?Sized>(
    games: &[&'a GameRecord],
    book: &B,
    grouping: OpeningGrouping,
) -> Vec<OpeningAggregate<'a>> {
    let aggregates: Vec<OpeningAggregate<'a>> = group_by(games, |g| grouping.key(g).to_string())
        .into_iter()
        .map(|(name, bucket)| OpeningAggregate::build(name, bucket, book))
        .collect();

    debug!(
        games = games.len(),
        openings = aggregates.len(),
        ?grouping,
        "Aggregated games by opening"
    );
    aggregates
}

/// Record of the games sharing one label (an opponent, a time control, a date).
#[derive(Debug, Clone, Serialize)]
pub struct GroupRecord<'a> {
    pub label: String,
    #[serde(skip)]
    pub games: Vec<&'a GameRecord>,
    pub record: Record,
}

/// Tally records per label, in first-seen order.
pub fn record_groups<'a, F>(games: &[&'a GameRecord], label: F) -> Vec<GroupRecord<'a>>
where
    F: Fn(&GameRecord) -> String,
{
    group_by(games, label)
        .into_iter()
        .map(|(label, games)| GroupRecord {
            record: Record::tally(games.iter().copied()),
            label,
            games,
        })
        .collect()
}
