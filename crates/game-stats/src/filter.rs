//! The filter pipeline.
//!
//! Each present criterion becomes one [`Predicate`]; the pipeline is their
//! conjunction, applied in a single pass that keeps the input order.

use chess_core::{game_data::opening_family, GameRecord, GameResult};
use chrono::NaiveDate;
use tracing::debug;

use crate::criteria::{Criteria, EloRange, OpeningScope, ValueSet};

/// One independent constraint on a game.
#[derive(Debug, Clone, Copy)]
pub enum Predicate<'c> {
    Opening(&'c ValueSet<String>, OpeningScope),
    FromDate(NaiveDate),
    ToDate(NaiveDate),
    Elo(EloRange),
    Opponent(&'c ValueSet<String>),
    TimeControl(&'c ValueSet<String>),
    Result(&'c ValueSet<GameResult>),
}

impl Predicate<'_> {
    pub fn test(&self, game: &GameRecord) -> bool {
        match *self {
            Predicate::Opening(names, OpeningScope::Exact) => names.accepts_str(&game.opening),
            Predicate::Opening(names, OpeningScope::Family) => {
                names.accepts_str(&game.opening) || names.accepts_str(opening_family(&game.opening))
            }
            Predicate::FromDate(from) => game.date >= from,
            Predicate::ToDate(to) => game.date <= to,
            Predicate::Elo(range) => range.admits(game),
            Predicate::Opponent(names) => names.accepts_str(&game.opponent),
            Predicate::TimeControl(labels) => labels.accepts_str(&game.time_control),
            Predicate::Result(results) => results.accepts(&game.result),
        }
    }
}

impl Criteria {
    /// The predicates for every criterion that is present.
    pub fn predicates(&self) -> Vec<Predicate<'_>> {
        let mut predicates = Vec::new();

        if !self.openings.is_unrestricted() {
            predicates.push(Predicate::Opening(&self.openings, self.opening_scope));
        }
        if let Some(from) = self.from_date {
            predicates.push(Predicate::FromDate(from));
        }
        if let Some(to) = self.to_date {
            predicates.push(Predicate::ToDate(to));
        }
        if let Some(range) = self.elo {
            predicates.push(Predicate::Elo(range));
        }
        if !self.opponents.is_unrestricted() {
            predicates.push(Predicate::Opponent(&self.opponents));
        }
        if !self.time_controls.is_unrestricted() {
            predicates.push(Predicate::TimeControl(&self.time_controls));
        }
        if !self.results.is_unrestricted() {
            predicates.push(Predicate::Result(&self.results));
        }

        predicates
    }
}

/// Keep the games that satisfy every present criterion, in input order.
///
/// Never fails: contradictory criteria (an inverted date or Elo range, an
/// unknown opponent) simply yield an empty result.
pub fn filter_games<'a, I>(games: I, criteria: &Criteria) -> Vec<&'a GameRecord>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let predicates = criteria.predicates();

    let mut seen = 0usize;
    let kept: Vec<&GameRecord> = games
        .into_iter()
        .inspect(|_| seen += 1)
        .filter(|game| predicates.iter().all(|p| p.test(game)))
        .collect();

    debug!(
        predicates = predicates.len(),
        input = seen,
        kept = kept.len(),
        "Filtered games"
    );
    kept
}
