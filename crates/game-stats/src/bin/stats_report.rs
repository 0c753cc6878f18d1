//! Statistics report
//!
//! Loads annotated games (and optionally an opening book and filter
//! criteria) from JSON files and prints a JSON report on stdout.
//!
//! Configuration comes from the environment, see `ReportConfig`.

use game_stats::{EloSubject, OpeningAggregate, ReportConfig, StatsEngine, Table};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct Report {
    games: usize,
    record: Table,
    error_per_ply: Table,
    time_per_ply: Table,
    openings_by_error: Table,
    openings_by_score: Table,
    openings_by_exit_ply: Table,
    most_common_openings: Vec<String>,
    best_openings: Vec<String>,
    worst_openings: Vec<String>,
    record_by_elo: Table,
    record_by_opponent_elo: Table,
    elo_bands_by_score: Table,
    record_by_opponent: Table,
    record_by_time_control: Table,
    record_by_date: Table,
    avg_move_leaving_opening: Option<f64>,
}

fn names(aggs: Vec<OpeningAggregate<'_>>) -> Vec<String> {
    aggs.into_iter().map(|a| a.name).collect()
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the report
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load .env file for local dev
    let _ = dotenvy::dotenv();

    let config = ReportConfig::from_env()?;

    let games = config.load_games()?;
    let book = config.load_book()?;
    let criteria = config.load_criteria()?;

    let engine = StatsEngine::new(games, book);
    let query = config.query(criteria);

    let report = Report {
        games: engine.filter(&query.criteria).len(),
        record: Table::from_records(
            "selection",
            [("all".to_string(), engine.record(&query.criteria))],
        ),
        error_per_ply: Table::from_series("avg_error", &engine.error_per_ply(&query)),
        time_per_ply: Table::from_series("avg_time", &engine.time_per_ply(&query)),
        openings_by_error: Table::from_openings(&engine.avg_error_by_opening(&query)),
        openings_by_score: Table::from_openings(&engine.record_by_opening(&query)),
        openings_by_exit_ply: Table::from_openings(&engine.avg_exit_ply_by_opening(&query)),
        most_common_openings: names(engine.most_common_openings(&query)),
        best_openings: names(engine.best_openings(&query)),
        worst_openings: names(engine.worst_openings(&query)),
        record_by_elo: Table::from_elo_buckets(&engine.record_by_elo(
            &query,
            config.elo_bound,
            config.set_gap,
            EloSubject::Player,
        )?),
        record_by_opponent_elo: Table::from_elo_buckets(&engine.record_by_elo(
            &query,
            config.elo_bound,
            config.set_gap,
            EloSubject::Opponent,
        )?),
        elo_bands_by_score: Table::from_elo_buckets(&engine.ranked_record_by_elo(
            &query,
            config.elo_bound,
            config.set_gap,
            EloSubject::Player,
        )?),
        record_by_opponent: Table::from_groups("opponent", &engine.record_by_opponent(&query)),
        record_by_time_control: Table::from_groups(
            "time_control",
            &engine.record_by_time_control(&query),
        ),
        record_by_date: Table::from_groups("date", &engine.record_by_date(&query)),
        avg_move_leaving_opening: engine.avg_move_leaving_opening(&query.criteria),
    };

    info!(games = report.games, "Report complete");
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
