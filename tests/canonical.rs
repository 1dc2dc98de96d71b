use std::path::PathBuf;

use laliga_dashboard::config::{DEFAULT_MATCHES_CSV, DEFAULT_STATS_DIR};
use laliga_dashboard::context::DatasetContext;
use laliga_dashboard::season_checks::check_season;
use laliga_dashboard::stats_browser::{StatsPane, list_stats_files, load_stats_file};
use laliga_dashboard::views::{DerivedView, Selection};

fn bundled(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn bundled_season_loads_clean() {
    let ctx = DatasetContext::load(&bundled(DEFAULT_MATCHES_CSV)).expect("bundled season");
    let table = ctx.table();
    assert_eq!(table.row_count(), 380);
    assert_eq!(table.column_count(), 24);
    assert_eq!(ctx.classes().numerical().len(), 17);

    let report = check_season(table);
    assert!(report.is_clean(), "{:?}", report.warnings());
    assert_eq!(
        report.summary_line(),
        "2.73 goals per match | home wins 45.0% | draws 21.1% | away wins 33.9%"
    );
}

#[test]
fn bundled_results_split_three_ways() {
    let ctx = DatasetContext::load(&bundled(DEFAULT_MATCHES_CSV)).expect("bundled season");
    let view = ctx.derive(&Selection::Categorical {
        column: Some("full_time_result".to_string()),
    });
    let DerivedView::Breakdown(breakdown) = view else {
        panic!("breakdown expected, got {view:?}");
    };
    assert!(breakdown.slices.len() <= 3);
    assert_eq!(breakdown.slices.iter().map(|s| s.count).sum::<usize>(), 380);
    assert_eq!(breakdown.total, 380);
    assert_eq!(breakdown.slices[0].value, "H");
}

#[test]
fn bundled_season_ends_in_may() {
    let ctx = DatasetContext::load(&bundled(DEFAULT_MATCHES_CSV)).expect("bundled season");
    let view = ctx.derive(&Selection::Trend {
        metric: Some("full_time_home_team_goals".to_string()),
        group_by: Some("month_name".to_string()),
    });
    let DerivedView::Trend(trend) = view else {
        panic!("trend expected, got {view:?}");
    };
    let months: Vec<&str> = trend.points.iter().map(|p| p.group.as_str()).collect();
    assert_eq!(months.first(), Some(&"Aug"));
    assert_eq!(months.last(), Some(&"May"));
    assert_eq!(months.len(), 10);
}

#[test]
fn bundled_stats_files_load_as_tables() {
    let files = list_stats_files(&bundled(DEFAULT_STATS_DIR));
    let labels: Vec<&str> = files.iter().map(|f| f.label.as_str()).collect();
    assert_eq!(labels, ["Goalkeeper Saves", "Team Discipline", "Top Scorers"]);

    let shapes: Vec<(usize, usize)> = files
        .iter()
        .map(|file| match load_stats_file(&file.path) {
            StatsPane::Table(table) => (table.row_count(), table.column_count()),
            StatsPane::Error(err) => panic!("{} failed: {err}", file.label),
        })
        .collect();
    assert_eq!(shapes, [(10, 6), (20, 5), (15, 6)]);
}
