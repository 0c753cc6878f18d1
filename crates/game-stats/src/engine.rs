//! The dataset handle and its query entry points.
//!
//! Every entry point runs the same pipeline: filter, optionally group,
//! reduce, rank. Nothing is cached between calls.

use chess_core::{GameRecord, GameResult, OpeningBook, OpeningLineBook, OpeningMatch};
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{self, aggregate_by_opening, record_groups, GroupRecord, OpeningAggregate};
use crate::criteria::{Criteria, EloSubject};
use crate::error::StatsError;
use crate::filter::filter_games;
use crate::metrics::{self, EloBucket, PlySeries, Record};
use crate::query::Query;
use crate::ranking::{leaders, rank, MetricKey};

/// An immutable set of games plus the book used to classify them.
pub struct StatsEngine<B = OpeningLineBook> {
    games: Vec<GameRecord>,
    book: B,
}

/// Filtered games split by result.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GamesByResult<'a> {
    pub wins: Vec<&'a GameRecord>,
    pub draws: Vec<&'a GameRecord>,
    pub losses: Vec<&'a GameRecord>,
}

impl<'a> GamesByResult<'a> {
    pub fn get(&self, result: GameResult) -> &[&'a GameRecord] {
        match result {
            GameResult::Win => &self.wins,
            GameResult::Draw => &self.draws,
            GameResult::Loss => &self.losses,
        }
    }
}

impl<B: OpeningBook> StatsEngine<B> {
    pub fn new(games: Vec<GameRecord>, book: B) -> Self {
        debug!(games = games.len(), "Stats engine ready");
        Self { games, book }
    }

    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn book(&self) -> &B {
        &self.book
    }

    pub fn filter(&self, criteria: &Criteria) -> Vec<&GameRecord> {
        filter_games(&self.games, criteria)
    }

    pub fn classify(&self, game: &GameRecord) -> OpeningMatch {
        self.book.classify(&game.sans())
    }

    // ---- Per-ply series ----

    /// Mean move error per ply over the filtered games.
    pub fn error_per_ply(&self, query: &Query) -> PlySeries {
        let games = self.filter(&query.criteria);
        metrics::average_error(&games, query.move_bound).truncate_sparse(query.min_games_per_ply)
    }

    /// Mean seconds per ply over the filtered games.
    pub fn time_per_ply(&self, query: &Query) -> PlySeries {
        let games = self.filter(&query.criteria);
        metrics::average_time_per_move(&games, query.move_bound)
            .truncate_sparse(query.min_games_per_ply)
    }

    // ---- Openings ----

    /// Aggregates for every opening in the filtered games, first-seen order,
    /// without those under `games_bound`.
    pub fn openings(&self, query: &Query) -> Vec<OpeningAggregate<'_>> {
        let games = self.filter(&query.criteria);
        let mut aggregates = aggregate_by_opening(&games, &self.book, query.grouping);
        aggregates.retain(|agg| agg.game_count() >= query.games_bound);
        aggregates
    }

    pub fn rank_openings(&self, query: &Query, key: MetricKey) -> Vec<OpeningAggregate<'_>> {
        let ranked = rank(self.openings(query), key, query.rank_options());
        debug!(metric = key.as_str(), openings = ranked.len(), "Ranked openings");
        ranked
    }

    pub fn avg_error_by_opening(&self, query: &Query) -> Vec<OpeningAggregate<'_>> {
        self.rank_openings(query, MetricKey::AvgError)
    }

    pub fn record_by_opening(&self, query: &Query) -> Vec<OpeningAggregate<'_>> {
        self.rank_openings(query, MetricKey::Score)
    }

    pub fn avg_exit_ply_by_opening(&self, query: &Query) -> Vec<OpeningAggregate<'_>> {
        self.rank_openings(query, MetricKey::AvgExitPly)
    }

    /// Openings played most often; all tied openings are returned.
    pub fn most_common_openings(&self, query: &Query) -> Vec<OpeningAggregate<'_>> {
        leaders(self.openings(query), MetricKey::GameCount, true)
    }

    /// Openings with the highest score.
    pub fn best_openings(&self, query: &Query) -> Vec<OpeningAggregate<'_>> {
        leaders(self.openings(query), MetricKey::Score, true)
    }

    /// Openings with the lowest score.
    pub fn worst_openings(&self, query: &Query) -> Vec<OpeningAggregate<'_>> {
        leaders(self.openings(query), MetricKey::Score, false)
    }

    /// Openings with the lowest average game error.
    pub fn most_accurate_openings(&self, query: &Query) -> Vec<OpeningAggregate<'_>> {
        leaders(self.openings(query), MetricKey::AvgError, false)
    }

    /// Openings with the highest average game error.
    pub fn least_accurate_openings(&self, query: &Query) -> Vec<OpeningAggregate<'_>> {
        leaders(self.openings(query), MetricKey::AvgError, true)
    }

    /// Aggregate for one opening label (or family, per the query's grouping).
    pub fn opening_stats(&self, name: &str, query: &Query) -> Option<OpeningAggregate<'_>> {
        self.openings(query).into_iter().find(|agg| agg.name == name)
    }

    /// Distinct opening labels containing `fragment`, ignoring case, in first-seen order.
    pub fn similar_openings(&self, fragment: &str) -> Vec<&str> {
        let needle = fragment.to_lowercase();
        let mut names: Vec<&str> = Vec::new();
        for game in &self.games {
            let name = game.opening.as_str();
            if name.to_lowercase().contains(&needle) && !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }

    /// Mean ply at which the filtered games leave book.
    pub fn avg_move_leaving_opening(&self, criteria: &Criteria) -> Option<f64> {
        let games = self.filter(criteria);
        metrics::avg_move_leaving_opening(&games, &self.book)
    }

    // ---- Records ----

    pub fn record(&self, criteria: &Criteria) -> Record {
        Record::tally(self.filter(criteria))
    }

    /// Records per Elo band, ascending. Bands under `games_bound` are dropped.
    pub fn record_by_elo(
        &self,
        query: &Query,
        elo_bound: i32,
        set_gap: i32,
        subject: EloSubject,
    ) -> Result<Vec<EloBucket>, StatsError> {
        let games = self.filter(&query.criteria);
        let mut buckets = metrics::record_by_elo(&games, elo_bound, set_gap, subject)?;
        buckets.retain(|b| b.record.total() >= query.games_bound);
        debug!(elo_bound, set_gap, ?subject, buckets = buckets.len(), "Bucketed records by Elo");
        Ok(buckets)
    }

    /// Records per Elo band, ranked by score. Honours `reverse` and `take_top`.
    pub fn ranked_record_by_elo(
        &self,
        query: &Query,
        elo_bound: i32,
        set_gap: i32,
        subject: EloSubject,
    ) -> Result<Vec<EloBucket>, StatsError> {
        let buckets = self.record_by_elo(query, elo_bound, set_gap, subject)?;
        Ok(rank(buckets, MetricKey::Score, query.rank_options()))
    }

    /// Records per opponent, ranked by score.
    pub fn record_by_opponent(&self, query: &Query) -> Vec<GroupRecord<'_>> {
        self.ranked_groups(query, |g| g.opponent.clone())
    }

    /// Records per time control, ranked by score.
    pub fn record_by_time_control(&self, query: &Query) -> Vec<GroupRecord<'_>> {
        self.ranked_groups(query, |g| g.time_control.clone())
    }

    /// Records per calendar day, oldest first.
    pub fn record_by_date(&self, query: &Query) -> Vec<GroupRecord<'_>> {
        let games = self.filter(&query.criteria);
        let mut days = aggregate::group_by(&games, |g| g.date);
        days.sort_by_key(|(date, _)| *date);

        days.into_iter()
            .filter(|(_, games)| games.len() >= query.games_bound)
            .map(|(date, games)| GroupRecord {
                label: date.to_string(),
                record: Record::tally(games.iter().copied()),
                games,
            })
            .collect()
    }

    pub fn games_by_result(&self, criteria: &Criteria) -> GamesByResult<'_> {
        let mut split = GamesByResult::default();
        for game in self.filter(criteria) {
            match game.result {
                GameResult::Win => split.wins.push(game),
                GameResult::Draw => split.draws.push(game),
                GameResult::Loss => split.losses.push(game),
            }
        }
        split
    }

    fn ranked_groups<F>(&self, query: &Query, label: F) -> Vec<GroupRecord<'_>>
    where
        F: Fn(&GameRecord) -> String,
    {
        let games = self.filter(&query.criteria);
        let mut groups = record_groups(&games, label);
        groups.retain(|g| g.record.total() >= query.games_bound);
        rank(groups, MetricKey::Score, query.rank_options())
    }
}
