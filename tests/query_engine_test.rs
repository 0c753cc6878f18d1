//! End-to-end queries over a small annotated dataset and a real opening book.

mod common;

use chess_core::{GameRecord, GameResult, OpeningBook, UNKNOWN_OPENING};
use common::{book, dataset, opponents};
use game_stats::{
    Cell, Criteria, EloRange, EloSubject, MetricKey, OpeningGrouping, OpeningScope, Query, Record,
    StatsEngine, StatsError, Table,
};

fn engine() -> StatsEngine {
    StatsEngine::new(dataset(), book())
}

fn names<T: game_stats::Ranked>(items: &[T]) -> Vec<String> {
    items.iter().map(|i| i.label()).collect()
}

#[test]
fn test_games_load_from_json_with_defaults() {
    let json = r#"[
        {
            "date": "2024-05-01",
            "opponent": "erin",
            "result": "draw",
            "time_control": "300",
            "moves": [
                { "san": "d4", "eval_before": 20, "eval_after": 15, "time_spent": 1.5 },
                { "san": "d5", "eval_before": -15, "eval_after": -60, "time_spent": 4.0 }
            ]
        }
    ]"#;
    let games: Vec<GameRecord> = serde_json::from_str(json).unwrap();
    assert_eq!(games[0].opening, UNKNOWN_OPENING);
    assert_eq!(games[0].self_elo, chess_core::MISSING_ELO);
    assert_eq!(games[0].result, GameResult::Draw);
    assert_eq!(games[0].avg_error(), Some(25.0));

    let engine = StatsEngine::new(games, book());
    assert_eq!(engine.record(&Criteria::new()), Record { wins: 0, draws: 1, losses: 0 });
    // No named line starts with 1. d4 in the test book.
    assert_eq!(engine.avg_move_leaving_opening(&Criteria::new()), Some(0.0));
}

#[test]
fn test_book_classifies_dataset_games() {
    let engine = engine();
    let games = engine.games();

    let italian = engine.classify(&games[0]);
    assert_eq!(italian.name, "Italian Game");
    assert_eq!(italian.exit_ply, 5);

    let najdorf = engine.book().classify(&games[1].sans());
    assert_eq!(najdorf.name, "Sicilian Defense: Najdorf Variation");
    assert_eq!(najdorf.exit_ply, 10);

    assert_eq!(engine.classify(&games[5]).name, UNKNOWN_OPENING);
}

#[test]
fn test_opening_aggregation_scenario() {
    let engine = engine();
    let aggs = engine.openings(&Query::default());
    assert_eq!(
        names(&aggs),
        vec![
            "Italian Game",
            "Sicilian Defense: Najdorf Variation",
            "French Defense",
            "Sicilian Defense",
            "Unknown"
        ]
    );
    assert_eq!(aggs[0].record, Record { wins: 1, draws: 1, losses: 0 });
    assert_eq!(aggs[0].avg_exit_ply, Some(5.0));
    // The game without moves still counts toward its record.
    assert_eq!(aggs[4].record, Record { wins: 0, draws: 0, losses: 1 });
    assert_eq!(aggs[4].avg_game_error, None);
    assert_eq!(aggs[4].avg_exit_ply, None);
}

#[test]
fn test_exit_ply_ranking_with_ties_and_undefined() {
    let engine = engine();
    let ranked = engine.avg_exit_ply_by_opening(&Query::default());
    assert_eq!(
        names(&ranked),
        vec![
            "French Defense",
            "Sicilian Defense",
            "Italian Game",
            "Sicilian Defense: Najdorf Variation",
            "Unknown"
        ]
    );

    let reversed = engine.avg_exit_ply_by_opening(&Query::default().reverse(true).take_top(2));
    assert_eq!(names(&reversed), vec!["Unknown", "Sicilian Defense: Najdorf Variation"]);
}

#[test]
fn test_family_scope_and_grouping() {
    let engine = engine();
    let sicilian = Criteria::new()
        .opening("Sicilian Defense")
        .opening_scope(OpeningScope::Family);
    assert_eq!(opponents(&engine.filter(&sicilian)), vec!["bob", "bob"]);

    let query = Query::with_criteria(sicilian).grouping(OpeningGrouping::Family);
    let stats = engine.opening_stats("Sicilian Defense", &query).unwrap();
    assert_eq!(stats.record, Record { wins: 1, draws: 0, losses: 1 });
    assert_eq!(stats.avg_exit_ply, Some(6.0));
}

#[test]
fn test_error_series_for_one_opponent() {
    let engine = engine();
    let query = Query::with_criteria(Criteria::new().opponent("alice"));
    let full = engine.error_per_ply(&query);
    assert_eq!(full.len(), 7);
    assert_eq!(full.get(1), Some(5.0));
    assert_eq!(full.get(7), Some(60.0));
    assert_eq!(full.points()[6].samples, 1);

    let bounded = engine.error_per_ply(&query.clone().move_bound(3));
    let values: Vec<Option<f64>> = bounded.points().iter().map(|p| p.value).collect();
    assert_eq!(values, vec![Some(5.0), Some(10.0), Some(15.0)]);

    let time = engine.time_per_ply(&query);
    assert_eq!(time.get(6), Some(6.0));
}

#[test]
fn test_record_by_elo_for_each_subject() {
    let engine = engine();

    let by_player = engine
        .record_by_elo(&Query::default(), 1000, 200, EloSubject::Player)
        .unwrap();
    let labels: Vec<String> = by_player.iter().map(|b| b.label()).collect();
    assert_eq!(labels, vec!["1200-1400", "1400-1600"]);
    assert_eq!(by_player[0].record, Record { wins: 2, draws: 1, losses: 1 });
    // The game with a missing rating is below the bound.
    let counted: usize = by_player.iter().map(|b| b.record.total()).sum();
    assert_eq!(counted, 5);

    let bounded = engine
        .record_by_elo(&Query::default().games_bound(1), 1000, 200, EloSubject::Player)
        .unwrap();
    assert_eq!(bounded.len(), 2);

    let by_opponent = engine
        .record_by_elo(&Query::default(), 1100, 200, EloSubject::Opponent)
        .unwrap();
    let records: Vec<Record> = by_opponent.iter().map(|b| b.record).collect();
    assert_eq!(
        records,
        vec![
            Record { wins: 2, draws: 0, losses: 0 },
            Record { wins: 1, draws: 1, losses: 1 },
            Record { wins: 0, draws: 0, losses: 1 },
        ]
    );

    assert!(matches!(
        engine.record_by_elo(&Query::default(), 1000, -100, EloSubject::Player),
        Err(StatsError::InvalidBucketWidth(-100))
    ));
}

#[test]
fn test_elo_bands_ranked_by_score() {
    let engine = engine();
    let ranked = |query: &Query| -> Vec<String> {
        engine
            .ranked_record_by_elo(query, 1100, 200, EloSubject::Opponent)
            .unwrap()
            .iter()
            .map(|b| b.label())
            .collect()
    };
    assert_eq!(ranked(&Query::default()), vec!["1500-1700", "1300-1500", "1100-1300"]);
    assert_eq!(ranked(&Query::default().reverse(true).take_top(1)), vec!["1100-1300"]);
    assert_eq!(ranked(&Query::default().games_bound(2)), vec!["1300-1500", "1100-1300"]);

    // Every game is counted once even when the lowest bucket edge is extreme.
    let wide = engine
        .ranked_record_by_elo(&Query::default(), i32::MIN, 1, EloSubject::Opponent)
        .unwrap();
    let counted: usize = wide.iter().map(|b| b.record.total()).sum();
    assert_eq!(counted, 6);
}

#[test]
fn test_elo_filter_on_opponent_rating() {
    let engine = engine();
    let strong = Criteria::new().elo(EloRange::between(1400, 1500).of(EloSubject::Opponent));
    assert_eq!(opponents(&engine.filter(&strong)), vec!["bob", "bob", "dave"]);
}

#[test]
fn test_sliced_records() {
    let engine = engine();

    let by_opponent = engine.record_by_opponent(&Query::default().reverse(true));
    assert_eq!(names(&by_opponent), vec!["carol", "alice", "bob", "dave"]);

    let by_tc = engine.record_by_time_control(&Query::default().games_bound(2));
    assert_eq!(names(&by_tc), vec!["180+2", "600"]);

    let by_date = engine.record_by_date(&Query::with_criteria(Criteria::new().opponent("bob")));
    assert_eq!(names(&by_date), vec!["2024-01-20", "2024-03-01"]);

    let split = engine.games_by_result(&Criteria::new());
    assert_eq!(split.get(GameResult::Win).len(), 3);
    assert_eq!(split.get(GameResult::Loss).len(), 2);
    assert_eq!(split.get(GameResult::Draw).len(), 1);
}

#[test]
fn test_leaders() {
    let engine = engine();
    let query = Query::default();
    assert_eq!(names(&engine.most_common_openings(&query)), vec!["Italian Game"]);
    assert_eq!(
        names(&engine.best_openings(&query)),
        vec!["French Defense", "Sicilian Defense"]
    );
    assert_eq!(
        names(&engine.worst_openings(&query)),
        vec!["Sicilian Defense: Najdorf Variation", "Unknown"]
    );
    assert_eq!(names(&engine.most_accurate_openings(&query)), vec!["Sicilian Defense"]);
    assert_eq!(
        names(&engine.least_accurate_openings(&query)),
        vec!["Sicilian Defense: Najdorf Variation"]
    );
}

#[test]
fn test_tables_keep_column_order_and_undefined() {
    let engine = engine();
    let ranked = engine.rank_openings(&Query::default(), MetricKey::AvgError);
    let table = Table::from_openings(&ranked);

    assert_eq!(
        table.columns,
        vec![
            "opening",
            "games",
            "wins",
            "draws",
            "losses",
            "win_rate",
            "score",
            "avg_error",
            "avg_time_per_move",
            "avg_exit_ply"
        ]
    );
    let last = table.rows.last().unwrap();
    assert_eq!(last[0], Cell::Text("Unknown".to_string()));
    assert!(last[7].is_undefined());

    let json = serde_json::to_value(&table).unwrap();
    assert!(json["rows"][4][7].is_null());
    assert_eq!(json["rows"][4][1], 1);
}

#[test]
fn test_empty_selection_propagates_as_no_data() {
    let engine = engine();
    let impossible = Criteria::new()
        .from_date(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        .to_date(chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    let query = Query::with_criteria(impossible.clone());

    assert!(engine.filter(&impossible).is_empty());
    assert_eq!(engine.record(&impossible), Record::default());
    assert_eq!(engine.record(&impossible).win_rate(), None);
    assert!(engine.openings(&query).is_empty());
    assert!(engine.best_openings(&query).is_empty());
    assert!(engine.error_per_ply(&query).is_empty());
    assert_eq!(engine.error_per_ply(&query).overall_mean(), None);
    assert!(engine
        .record_by_elo(&query, 1000, 100, EloSubject::Player)
        .unwrap()
        .is_empty());
    assert!(engine.record_by_opponent(&query).is_empty());
}
