//! Report configuration from environment variables

use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chess_core::{BookLine, GameRecord, OpeningLineBook};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::criteria::Criteria;
use crate::error::StatsError;
use crate::query::Query;

#[derive(Clone, Debug, PartialEq)]
pub struct ReportConfig {
    /// JSON array of annotated games
    pub dataset_path: PathBuf,

    /// JSON array of `{ "name", "line" }` opening lines
    pub book_path: Option<PathBuf>,

    /// JSON `Criteria` applied to every query
    pub criteria_path: Option<PathBuf>,

    pub take_top: Option<usize>,
    pub move_bound: Option<usize>,
    pub games_bound: usize,

    /// Lower edge of the first Elo bucket
    pub elo_bound: i32,

    /// Elo bucket width
    pub set_gap: i32,

    pub reverse: bool,
}

impl ReportConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, StatsError> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, StatsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dataset_path = var("STATS_DATASET_PATH")
            .map(PathBuf::from)
            .ok_or_else(|| StatsError::Config("STATS_DATASET_PATH not set".to_string()))?;

        Ok(Self {
            dataset_path,
            book_path: var("STATS_BOOK_PATH").map(PathBuf::from),
            criteria_path: var("STATS_CRITERIA_PATH").map(PathBuf::from),
            take_top: parse(&var, "STATS_TAKE_TOP")?,
            move_bound: parse(&var, "STATS_MOVE_BOUND")?,
            games_bound: parse(&var, "STATS_GAMES_BOUND")?.unwrap_or(0),
            elo_bound: parse(&var, "STATS_ELO_BOUND")?.unwrap_or(1000),
            set_gap: parse(&var, "STATS_SET_GAP")?.unwrap_or(100),
            reverse: parse(&var, "STATS_REVERSE")?.unwrap_or(false),
        })
    }

    pub fn load_games(&self) -> Result<Vec<GameRecord>, StatsError> {
        let games: Vec<GameRecord> = read_json(&self.dataset_path)?;
        info!(games = games.len(), path = %self.dataset_path.display(), "Loaded games");
        Ok(games)
    }

    /// The configured book, or an empty one that classifies nothing.
    pub fn load_book(&self) -> Result<OpeningLineBook, StatsError> {
        let Some(path) = &self.book_path else {
            warn!("STATS_BOOK_PATH not set, exit plies will be unknown");
            return Ok(OpeningLineBook::new());
        };
        let lines: Vec<BookLine> = read_json(path)?;
        let book = OpeningLineBook::from_lines(&lines)?;
        info!(lines = book.len(), path = %path.display(), "Loaded opening book");
        Ok(book)
    }

    pub fn load_criteria(&self) -> Result<Criteria, StatsError> {
        match &self.criteria_path {
            Some(path) => read_json(path),
            None => Ok(Criteria::default()),
        }
    }

    /// Query options for every report section.
    pub fn query(&self, criteria: Criteria) -> Query {
        Query {
            criteria,
            reverse: self.reverse,
            take_top: self.take_top,
            games_bound: self.games_bound,
            move_bound: self.move_bound,
            ..Query::default()
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StatsError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

fn parse<T, F>(var: &F, key: &str) -> Result<Option<T>, StatsError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| StatsError::Config(format!("{key} has an invalid value: {raw:?}"))),
    }
}
