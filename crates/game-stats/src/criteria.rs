//! Filter criteria: which games a query looks at.
//!
//! Every criterion is optional. An absent criterion (an empty [`ValueSet`],
//! a `None` bound) imposes no constraint; present criteria combine with AND.

use chess_core::{GameRecord, GameResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Accepted values for a membership criterion. A single value is a
/// one-element set; the empty set accepts everything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueSet<T>(Vec<T>);

impl<T> Default for ValueSet<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: PartialEq> ValueSet<T> {
    /// The unrestricted set.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn one(value: T) -> Self {
        Self(vec![value])
    }

    pub fn insert(&mut self, value: T) {
        if !self.0.contains(&value) {
            self.0.push(value);
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, value: &T) -> bool {
        self.0.contains(value)
    }

    pub fn accepts(&self, value: &T) -> bool {
        self.is_unrestricted() || self.contains(value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ValueSet<String> {
    pub fn accepts_str(&self, value: &str) -> bool {
        self.is_unrestricted() || self.0.iter().any(|v| v == value)
    }
}

impl<T: PartialEq> FromIterator<T> for ValueSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

impl<T: PartialEq> From<Vec<T>> for ValueSet<T> {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl From<&str> for ValueSet<String> {
    fn from(value: &str) -> Self {
        Self::one(value.to_string())
    }
}

impl From<GameResult> for ValueSet<GameResult> {
    fn from(value: GameResult) -> Self {
        Self::one(value)
    }
}

/// Whose rating an Elo constraint or bucketing looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EloSubject {
    /// The analyzed player.
    #[default]
    Player,
    Opponent,
}

impl EloSubject {
    pub fn rating(self, game: &GameRecord) -> i32 {
        match self {
            EloSubject::Player => game.self_elo,
            EloSubject::Opponent => game.opponent_elo,
        }
    }
}

/// Inclusive rating window. `min > max` matches nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EloRange {
    pub min: Option<i32>,
    pub max: Option<i32>,
    pub subject: EloSubject,
}

impl EloRange {
    pub fn at_least(min: i32) -> Self {
        Self {
            min: Some(min),
            ..Self::default()
        }
    }

    pub fn at_most(max: i32) -> Self {
        Self {
            max: Some(max),
            ..Self::default()
        }
    }

    pub fn between(min: i32, max: i32) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::default()
        }
    }

    pub fn of(mut self, subject: EloSubject) -> Self {
        self.subject = subject;
        self
    }

    pub fn contains(&self, rating: i32) -> bool {
        self.min.map_or(true, |min| rating >= min) && self.max.map_or(true, |max| rating <= max)
    }

    pub fn admits(&self, game: &GameRecord) -> bool {
        self.contains(self.subject.rating(game))
    }
}

/// How an opening name in the criteria is compared with a game's label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningScope {
    /// Full label, variation included.
    #[default]
    Exact,
    /// Full label, or the main opening before the variation.
    Family,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Criteria {
    pub openings: ValueSet<String>,
    pub opening_scope: OpeningScope,
    /// Inclusive.
    pub from_date: Option<NaiveDate>,
    /// Inclusive.
    pub to_date: Option<NaiveDate>,
    pub elo: Option<EloRange>,
    pub opponents: ValueSet<String>,
    pub time_controls: ValueSet<String>,
    pub results: ValueSet<GameResult>,
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opening(mut self, name: impl Into<String>) -> Self {
        self.openings.insert(name.into());
        self
    }

    pub fn openings<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.openings.insert(name.into());
        }
        self
    }

    pub fn opening_scope(mut self, scope: OpeningScope) -> Self {
        self.opening_scope = scope;
        self
    }

    pub fn from_date(mut self, date: NaiveDate) -> Self {
        self.from_date = Some(date);
        self
    }

    pub fn to_date(mut self, date: NaiveDate) -> Self {
        self.to_date = Some(date);
        self
    }

    pub fn elo(mut self, range: EloRange) -> Self {
        self.elo = Some(range);
        self
    }

    /// Games where the analyzed player was rated at least `min`.
    pub fn min_elo(self, min: i32) -> Self {
        self.elo(EloRange::at_least(min))
    }

    pub fn opponent(mut self, name: impl Into<String>) -> Self {
        self.opponents.insert(name.into());
        self
    }

    pub fn opponents<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.opponents.insert(name.into());
        }
        self
    }

    pub fn time_control(mut self, label: impl Into<String>) -> Self {
        self.time_controls.insert(label.into());
        self
    }

    pub fn result(mut self, result: GameResult) -> Self {
        self.results.insert(result);
        self
    }

    /// True when no criterion is present.
    pub fn is_unrestricted(&self) -> bool {
        self.openings.is_unrestricted()
            && self.from_date.is_none()
            && self.to_date.is_none()
            && self.elo.is_none()
            && self.opponents.is_unrestricted()
            && self.time_controls.is_unrestricted()
            && self.results.is_unrestricted()
    }
}
