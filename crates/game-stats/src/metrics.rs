//! Derived-metric calculators.
//!
//! All calculators are pure reductions over already-filtered games. A mean
//! over an empty sample is `None`, never zero.

use std::collections::BTreeMap;

use chess_core::{GameRecord, GameResult, MoveRecord, OpeningBook};
use serde::{Deserialize, Serialize};

use crate::criteria::EloSubject;
use crate::error::StatsError;

/// Arithmetic mean, `None` for an empty sample.
pub(crate) fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Value of a per-ply series at one ply.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlyPoint {
    /// 1-indexed.
    pub ply: usize,
    /// `None` when no game reached this ply.
    pub value: Option<f64>,
    /// Number of games that reached this ply.
    pub samples: usize,
}

/// Ragged per-ply averages: a game contributes only up to its own length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlySeries {
    points: Vec<PlyPoint>,
}

impl PlySeries {
    pub fn points(&self) -> &[PlyPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value at a 1-indexed ply.
    pub fn get(&self, ply: usize) -> Option<f64> {
        ply.checked_sub(1)
            .and_then(|i| self.points.get(i))
            .and_then(|p| p.value)
    }

    /// Mean over the defined plies only.
    pub fn overall_mean(&self) -> Option<f64> {
        mean(self.points.iter().filter_map(|p| p.value))
    }

    /// End the series before the first ply reached by fewer than `min_samples` games.
    pub fn truncate_sparse(mut self, min_samples: usize) -> Self {
        if let Some(cut) = self.points.iter().position(|p| p.samples < min_samples) {
            self.points.truncate(cut);
        }
        self
    }
}

fn average_per_ply<F>(games: &[&GameRecord], move_bound: Option<usize>, value: F) -> PlySeries
where
    F: Fn(&MoveRecord) -> f64,
{
    // No game reaches past the longest one, so the series stops there.
    let longest = games.iter().map(|g| g.ply_count()).max().unwrap_or(0);
    let last = move_bound.map_or(longest, |bound| bound.min(longest));

    let mut sums = vec![0.0; last];
    let mut counts = vec![0usize; last];

    for game in games {
        for (i, mv) in game.moves.iter().take(last).enumerate() {
            sums[i] += value(mv);
            counts[i] += 1;
        }
    }

    let points = sums
        .iter()
        .zip(&counts)
        .enumerate()
        .map(|(i, (&sum, &samples))| PlyPoint {
            ply: i + 1,
            value: (samples > 0).then(|| sum / samples as f64),
            samples,
        })
        .collect();

    PlySeries { points }
}

/// Mean move error at each ply `1..=move_bound`, ending at the longest game.
pub fn average_error(games: &[&GameRecord], move_bound: Option<usize>) -> PlySeries {
    average_per_ply(games, move_bound, MoveRecord::error)
}

/// Mean seconds spent at each ply `1..=move_bound`, ending at the longest game.
pub fn average_time_per_move(games: &[&GameRecord], move_bound: Option<usize>) -> PlySeries {
    average_per_ply(games, move_bound, |mv| mv.time_spent)
}

/// Mean over games of each game's own mean error; games without moves are skipped.
pub fn average_game_error(games: &[&GameRecord]) -> Option<f64> {
    mean(games.iter().filter_map(|g| g.avg_error()))
}

/// Win/draw/loss tally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub wins: usize,
    pub draws: usize,
    pub losses: usize,
}

impl Record {
    pub fn tally<'a, I>(games: I) -> Self
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        let mut record = Self::default();
        for game in games {
            record.add(game.result);
        }
        record
    }

    pub fn add(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Draw => self.draws += 1,
            GameResult::Loss => self.losses += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.wins + self.draws + self.losses
    }

    pub fn win_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.wins as f64 / total as f64)
    }

    /// Average points per game, a draw counting half.
    pub fn score(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| (self.wins as f64 + 0.5 * self.draws as f64) / total as f64)
    }
}

/// Tally over any sequence of games.
pub fn record<'a, I>(games: I) -> Record
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    Record::tally(games)
}

/// Rating band `[lower, upper)` and the record scored in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EloBucket {
    pub lower: i32,
    pub upper: i32,
    pub record: Record,
}

impl EloBucket {
    pub fn label(&self) -> String {
        format!("{}-{}", self.lower, self.upper)
    }

    pub fn contains(&self, rating: i32) -> bool {
        rating >= self.lower && rating < self.upper
    }
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

/// Split games into buckets of width `set_gap` aligned on `elo_bound`, by the
/// rating of `subject`. Games rated below `elo_bound` are left out. Only
/// buckets holding at least one game are returned, lowest band first.
pub fn record_by_elo(
    games: &[&GameRecord],
    elo_bound: i32,
    set_gap: i32,
    subject: EloSubject,
) -> Result<Vec<EloBucket>, StatsError> {
    if set_gap <= 0 {
        return Err(StatsError::InvalidBucketWidth(set_gap));
    }
    let bound = i64::from(elo_bound);
    let gap = i64::from(set_gap);

    let mut occupied: BTreeMap<i64, Record> = BTreeMap::new();
    for game in games {
        let rating = i64::from(subject.rating(game));
        if rating >= bound {
            occupied
                .entry((rating - bound) / gap)
                .or_default()
                .add(game.result);
        }
    }

    let buckets = occupied
        .into_iter()
        .map(|(k, record)| {
            let lower = bound + k * gap;
            EloBucket {
                lower: saturate(lower),
                upper: saturate(lower + gap),
                record,
            }
        })
        .collect();

    Ok(buckets)
}

/// Ply at which the game leaves its book line, as reported by `book`.
pub fn exit_ply<B: OpeningBook + ?Sized>(game: &GameRecord, book: &B) -> usize {
    book.classify(&game.sans()).exit_ply
}

/// Mean exit ply over the games that have moves.
pub fn avg_move_leaving_opening<B: OpeningBook + ?Sized>(
    games: &[&GameRecord],
    book: &B,
) -> Option<f64> {
    mean(
        games
            .iter()
            .filter(|g| !g.moves.is_empty())
            .map(|g| exit_ply(g, book) as f64),
    )
}
