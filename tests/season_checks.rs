use std::path::PathBuf;

use laliga_dashboard::loader::load_match_table;
use laliga_dashboard::sample_season::generate_season;
use laliga_dashboard::season_checks::{SEASON_FIXTURES, check_season};
use laliga_dashboard::table::{Column, ColumnData, Table};

#[test]
fn generated_season_is_clean() {
    let table = generate_season(21).expect("sample season");
    let report = check_season(&table);
    assert!(report.is_clean(), "{:?}", report.warnings());
    assert_eq!(report.rows, SEASON_FIXTURES);
    assert!(report.warnings().is_empty());
    assert!(report.missing_columns.is_empty());

    let shares = report.full_time_shares.expect("results present");
    assert!((shares.home + shares.draw + shares.away - 1.0).abs() < 1e-9);
    assert!(report.goals_per_match.is_some_and(|g| g > 0.0));

    let line = report.summary_line();
    assert!(line.contains("goals per match | home wins"), "{line}");
    assert!(line.ends_with('%'), "{line}");
}

#[test]
fn small_fixture_reports_short_season() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures/matches_small.csv");
    let table = load_match_table(&path).expect("fixture should load");

    let report = check_season(&table);
    assert!(!report.is_clean());
    assert_eq!(report.rows, 6);
    assert!(report.mismatches.is_empty());
    assert!(report.missing_columns.contains(&"half_time_result"));
    assert!(report.missing_columns.contains(&"half_time_home_team_goals"));
    assert!(!report.missing_columns.contains(&"full_time_result"));
    assert!(report.warnings()[0].contains("expected 380 fixtures"));
}

#[test]
fn summary_without_results_reports_goals_only() {
    let table = Table::from_columns(
        "goals_only",
        vec![Column::new("round", ColumnData::Integer(vec![Some(1)]))],
    )
    .expect("table");
    let report = check_season(&table);
    assert!(report.full_time_shares.is_none());
    assert_eq!(report.summary_line(), "goals per match n/a");
}

#[test]
fn wrong_result_codes_are_flagged() {
    let table = Table::from_columns(
        "bad",
        vec![
            Column::new("round", ColumnData::Integer(vec![Some(1), Some(40)])),
            Column::new(
                "full_time_home_team_goals",
                ColumnData::Integer(vec![Some(2), Some(0)]),
            ),
            Column::new(
                "full_time_away_team_goals",
                ColumnData::Integer(vec![Some(1), Some(0)]),
            ),
            Column::new(
                "full_time_result",
                ColumnData::Text(vec![Some("A".to_string()), Some("D".to_string())]),
            ),
        ],
    )
    .expect("table");

    let report = check_season(&table);
    assert_eq!(report.rounds_out_of_range, vec![1]);
    assert_eq!(report.mismatches.len(), 1);
    assert_eq!(report.mismatches[0].row, 0);
    assert_eq!(report.mismatches[0].expected, 'H');
    assert_eq!(report.mismatches[0].found.as_deref(), Some("A"));
}
