#![allow(dead_code)]

use chess_core::movetext::extract_sans;
use chess_core::{BookLine, GameRecord, GameResult, MoveRecord, OpeningLineBook, MISSING_ELO};
use chrono::NaiveDate;

/// Reference lines used across the integration tests.
pub fn book_lines() -> Vec<BookLine> {
    [
        ("King's Pawn Game", "1. e4"),
        ("Italian Game", "1. e4 e5 2. Nf3 Nc6 3. Bc4"),
        ("Sicilian Defense", "1. e4 c5"),
        (
            "Sicilian Defense: Najdorf Variation",
            "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6",
        ),
        ("French Defense", "1. e4 e6"),
    ]
    .into_iter()
    .map(|(name, line)| BookLine {
        name: name.to_string(),
        line: line.to_string(),
    })
    .collect()
}

pub fn book() -> OpeningLineBook {
    OpeningLineBook::from_lines(&book_lines()).unwrap()
}

pub struct GameSpec<'a> {
    pub date: &'a str,
    pub opponent: &'a str,
    pub result: GameResult,
    pub opening: &'a str,
    pub self_elo: i32,
    pub opponent_elo: i32,
    pub time_control: &'a str,
    pub line: &'a str,
    /// Per-ply error; plies past the end get 0.
    pub errors: &'a [i32],
}

/// Build a game whose moves come from `line`, ply `i` taking `i + 1` seconds.
pub fn game(spec: GameSpec<'_>) -> GameRecord {
    let moves = extract_sans(spec.line)
        .into_iter()
        .enumerate()
        .map(|(i, san)| {
            let error = spec.errors.get(i).copied().unwrap_or(0);
            MoveRecord::new(san, 0, error, (i + 1) as f64)
        })
        .collect();

    GameRecord {
        date: NaiveDate::parse_from_str(spec.date, "%Y-%m-%d").unwrap(),
        opponent: spec.opponent.to_string(),
        result: spec.result,
        time_control: spec.time_control.to_string(),
        self_elo: spec.self_elo,
        opponent_elo: spec.opponent_elo,
        opening: spec.opening.to_string(),
        moves,
    }
}

/// Six games covering every criterion, one of them without moves.
pub fn dataset() -> Vec<GameRecord> {
    vec![
        game(GameSpec {
            date: "2024-01-05",
            opponent: "alice",
            result: GameResult::Win,
            opening: "Italian Game",
            self_elo: 1210,
            opponent_elo: 1190,
            time_control: "600",
            line: "1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. c3",
            errors: &[0, 10, 20, 30, 40, 50, 60],
        }),
        game(GameSpec {
            date: "2024-01-20",
            opponent: "bob",
            result: GameResult::Loss,
            opening: "Sicilian Defense: Najdorf Variation",
            self_elo: 1320,
            opponent_elo: 1480,
            time_control: "180+2",
            line: "1. e4 c5 2. Nf3 d6 3. d4 cxd4 4. Nxd4 Nf6 5. Nc3 a6 6. Be3",
            errors: &[40; 11],
        }),
        game(GameSpec {
            date: "2024-02-02",
            opponent: "alice",
            result: GameResult::Draw,
            opening: "Italian Game",
            self_elo: 1250,
            opponent_elo: 1300,
            time_control: "600",
            line: "1. e4 e5 2. Nf3 Nc6 3. Bc4 Nf6",
            errors: &[10; 6],
        }),
        game(GameSpec {
            date: "2024-02-14",
            opponent: "carol",
            result: GameResult::Win,
            opening: "French Defense",
            self_elo: 1290,
            opponent_elo: 1100,
            time_control: "600",
            line: "1. e4 e6 2. d4 d5",
            errors: &[20; 4],
        }),
        game(GameSpec {
            date: "2024-03-01",
            opponent: "bob",
            result: GameResult::Win,
            opening: "Sicilian Defense",
            self_elo: 1400,
            opponent_elo: 1420,
            time_control: "180+2",
            line: "1. e4 c5 2. c3",
            errors: &[5; 3],
        }),
        game(GameSpec {
            date: "2024-03-09",
            opponent: "dave",
            result: GameResult::Loss,
            opening: "Unknown",
            self_elo: MISSING_ELO,
            opponent_elo: 1500,
            time_control: "60",
            line: "",
            errors: &[],
        }),
    ]
}

pub fn opponents(games: &[&GameRecord]) -> Vec<String> {
    games.iter().map(|g| g.opponent.clone()).collect()
}
