use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opening label for games the book could not classify.
pub const UNKNOWN_OPENING: &str = "Unknown";

/// Rating recorded when the source game carried none.
pub const MISSING_ELO: i32 = 0;

const OPENING_FAMILY_SEPARATOR: char = ':';

/// Outcome of a game from the analyzed player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Win,
    Draw,
    Loss,
}

impl GameResult {
    pub const ALL: [GameResult; 3] = [GameResult::Win, GameResult::Draw, GameResult::Loss];

    /// Translate a PGN result tag ("1-0", "0-1", "1/2-1/2") for the given side.
    pub fn from_pgn(result: &str, user_is_white: bool) -> Option<Self> {
        match result {
            "1/2-1/2" => Some(GameResult::Draw),
            "1-0" if user_is_white => Some(GameResult::Win),
            "1-0" => Some(GameResult::Loss),
            "0-1" if user_is_white => Some(GameResult::Loss),
            "0-1" => Some(GameResult::Win),
            _ => None,
        }
    }

    /// Tournament points: 1 for a win, 0.5 for a draw.
    pub fn points(self) -> f64 {
        match self {
            GameResult::Win => 1.0,
            GameResult::Draw => 0.5,
            GameResult::Loss => 0.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::Win => "win",
            GameResult::Draw => "draw",
            GameResult::Loss => "loss",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameResult {
    type Err = String;

    /// Accepts the long names and the single-letter codes ("W", "L", "D").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "win" | "w" => Ok(GameResult::Win),
            "draw" | "d" => Ok(GameResult::Draw),
            "loss" | "l" => Ok(GameResult::Loss),
            _ => Err(format!("unrecognized game result: {s}")),
        }
    }
}

/// One ply, annotated with the engine evaluation around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub san: String,
    /// Centipawns, mover's perspective.
    pub eval_before: i32,
    pub eval_after: i32,
    /// Seconds on the clock spent on this move.
    pub time_spent: f64,
}

impl MoveRecord {
    pub fn new(san: impl Into<String>, eval_before: i32, eval_after: i32, time_spent: f64) -> Self {
        Self {
            san: san.into(),
            eval_before,
            eval_after,
            time_spent: time_spent.max(0.0),
        }
    }

    /// Absolute evaluation swing caused by the move.
    pub fn error(&self) -> f64 {
        (i64::from(self.eval_after) - i64::from(self.eval_before)).abs() as f64
    }
}

/// A fully annotated game, as handed over by the loader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub date: NaiveDate,
    pub opponent: String,
    pub result: GameResult,
    pub time_control: String,
    #[serde(default = "missing_elo")]
    pub self_elo: i32,
    #[serde(default = "missing_elo")]
    pub opponent_elo: i32,
    #[serde(default = "unknown_opening")]
    pub opening: String,
    #[serde(default)]
    pub moves: Vec<MoveRecord>,
}

fn missing_elo() -> i32 {
    MISSING_ELO
}

fn unknown_opening() -> String {
    UNKNOWN_OPENING.to_string()
}

impl GameRecord {
    pub fn ply_count(&self) -> usize {
        self.moves.len()
    }

    /// SAN moves in play order.
    pub fn sans(&self) -> Vec<&str> {
        self.moves.iter().map(|m| m.san.as_str()).collect()
    }

    /// Mean error over the game's moves, `None` for a game without moves.
    pub fn avg_error(&self) -> Option<f64> {
        if self.moves.is_empty() {
            return None;
        }
        let total: f64 = self.moves.iter().map(MoveRecord::error).sum();
        Some(total / self.moves.len() as f64)
    }

    /// Main opening name without the variation suffix.
    pub fn opening_family(&self) -> &str {
        opening_family(&self.opening)
    }
}

/// "Sicilian Defense: Najdorf Variation" -> "Sicilian Defense".
pub fn opening_family(name: &str) -> &str {
    name.split(OPENING_FAMILY_SEPARATOR)
        .next()
        .map(str::trim)
        .unwrap_or(name)
}
