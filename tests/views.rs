use laliga_dashboard::calendar::{DAY_ORDER, derive_calendar_columns};
use laliga_dashboard::context::DatasetContext;
use laliga_dashboard::error::{FitError, SelectionError};
use laliga_dashboard::outcome::{Outcome, classify_outcome};
use laliga_dashboard::sample_season::generate_season;
use laliga_dashboard::table::{Column, ColumnData, Table};
use laliga_dashboard::views::{self, DerivedView, HISTOGRAM_BINS, Selection, TrendGroup};

fn season_context(seed: u64) -> DatasetContext {
    let mut table = generate_season(seed).expect("sample season");
    derive_calendar_columns(&mut table).expect("calendar columns");
    DatasetContext::new(table)
}

fn distribution(column: &str) -> Selection {
    Selection::Distribution {
        column: Some(column.to_string()),
    }
}

fn trend(metric: &str, group_by: &str) -> Selection {
    Selection::Trend {
        metric: Some(metric.to_string()),
        group_by: Some(group_by.to_string()),
    }
}

#[test]
fn results_agree_with_goals() {
    let ctx = season_context(7);
    let table = ctx.table();
    assert_eq!(table.row_count(), 380);

    let home = table.column("full_time_home_team_goals").expect("home goals");
    let away = table.column("full_time_away_team_goals").expect("away goals");
    let result = table.column("full_time_result").expect("result");
    for row in 0..table.row_count() {
        let h = home.data.numeric(row).expect("home goals present") as i64;
        let a = away.data.numeric(row).expect("away goals present") as i64;
        let code = result.data.display(row);
        assert_eq!(Outcome::from_code(&code), Some(classify_outcome(h, a)), "row {row}");
    }
}

#[test]
fn correlation_matrix_is_symmetric_with_unit_diagonal() {
    let ctx = season_context(11);
    let matrix = ctx.correlation();
    assert_eq!(matrix.len(), ctx.classes().numerical().len());
    for i in 0..matrix.len() {
        assert_eq!(matrix.get(i, i), Some(1.0));
        for j in 0..matrix.len() {
            assert_eq!(matrix.get(i, j), matrix.get(j, i));
            if let Some(r) = matrix.get(i, j) {
                assert!((-1.0..=1.0).contains(&r));
            }
        }
    }

    let DerivedView::Correlation(from_view) = ctx.derive(&Selection::Heatmap) else {
        panic!("heatmap should derive a correlation view");
    };
    assert_eq!(&from_view, matrix);
}

#[test]
fn trend_by_round_averages_each_round() {
    let ctx = season_context(5);
    let DerivedView::Trend(trend) = ctx.derive(&trend("full_time_home_team_goals", "round")) else {
        panic!("trend should derive");
    };
    assert_eq!(trend.group_by, TrendGroup::Round);
    assert_eq!(trend.points.len(), 38);

    let table = ctx.table();
    let rounds = table.column("round").expect("round");
    let goals = table.column("full_time_home_team_goals").expect("goals");
    for (idx, point) in trend.points.iter().enumerate() {
        let round = idx as f64 + 1.0;
        assert_eq!(point.group, (idx + 1).to_string());
        let values: Vec<f64> = (0..table.row_count())
            .filter(|&row| rounds.data.numeric(row) == Some(round))
            .filter_map(|row| goals.data.numeric(row))
            .collect();
        assert_eq!(point.count, values.len());
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        assert!((point.mean - mean).abs() < 1e-12);
    }
}

#[test]
fn trend_by_day_follows_week_order() {
    let ctx = season_context(5);
    let DerivedView::Trend(trend) = ctx.derive(&trend("home_team_shots", "day_of_week")) else {
        panic!("trend should derive");
    };
    let groups: Vec<&str> = trend.points.iter().map(|p| p.group.as_str()).collect();
    // sample fixtures run Friday to Monday only
    assert_eq!(groups, ["Monday", "Friday", "Saturday", "Sunday"]);
    let positions: Vec<usize> = groups
        .iter()
        .filter_map(|g| DAY_ORDER.iter().position(|d| d == g))
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(trend.points.iter().map(|p| p.count).sum::<usize>(), 380);
}

#[test]
fn trend_by_month_covers_the_season() {
    let ctx = season_context(5);
    let DerivedView::Trend(trend) = ctx.derive(&trend("away_team_corners", "month_name")) else {
        panic!("trend should derive");
    };
    assert_eq!(trend.points.first().map(|p| p.group.as_str()), Some("Aug"));
    assert!(trend.points.iter().all(|p| p.count > 0));
}

#[test]
fn distribution_is_idempotent() {
    let ctx = season_context(3);
    let selection = distribution("home_team_shots");
    let first = ctx.derive(&selection);
    let second = ctx.derive(&selection);
    assert_eq!(first, second);

    let DerivedView::Histogram(hist) = first else {
        panic!("distribution should derive a histogram");
    };
    assert_eq!(hist.bins.len(), HISTOGRAM_BINS);
    assert_eq!(hist.total, 380);
    assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 380);
}

#[test]
fn result_breakdown_has_at_most_three_slices() {
    let ctx = season_context(9);
    let DerivedView::Breakdown(breakdown) = ctx.derive(&Selection::Categorical {
        column: Some("full_time_result".to_string()),
    }) else {
        panic!("breakdown should derive");
    };
    assert!(breakdown.slices.len() <= 3);
    assert_eq!(breakdown.total, 380);
    assert_eq!(breakdown.slices.iter().map(|s| s.count).sum::<usize>(), 380);
    assert!(breakdown.slices.windows(2).all(|w| w[0].count >= w[1].count));
}

#[test]
fn box_plot_groups_by_first_appearance() {
    let ctx = season_context(9);
    let DerivedView::BoxPlot(plot) = ctx.derive(&Selection::BoxPlot {
        numerical: Some("home_team_shots".to_string()),
        categorical: Some("home_team".to_string()),
    }) else {
        panic!("box plot should derive");
    };
    assert_eq!(plot.groups.len(), 20);
    assert_eq!(plot.groups.iter().map(|g| g.count).sum::<usize>(), 380);
    for group in &plot.groups {
        assert!(group.min <= group.q1 && group.q1 <= group.median);
        assert!(group.median <= group.q3 && group.q3 <= group.max);
        assert!(group.lower_whisker >= group.min && group.upper_whisker <= group.max);
    }
    let first_home = ctx.table().column("home_team").expect("home").data.display(0);
    assert_eq!(plot.groups[0].category, first_home);
}

#[test]
fn scatter_fits_a_line_through_the_points() {
    let ctx = season_context(4);
    let DerivedView::Scatter(scatter) = ctx.derive(&Selection::Scatter {
        x: Some("home_team_shots".to_string()),
        y: Some("home_team_shots_on_target".to_string()),
    }) else {
        panic!("scatter should derive");
    };
    assert_eq!(scatter.points.len(), 380);
    let fit = scatter.fit.expect("shots vary across matches");
    assert!(fit.start.0 <= fit.end.0);
    assert!(fit.r_squared.is_some_and(|r| (0.0..=1.0).contains(&r)));
}

#[test]
fn invalid_selections_yield_empty_views() {
    let ctx = season_context(1);
    let cases = [
        distribution("no_such_column"),
        distribution("home_team"),
        Selection::Categorical {
            column: Some("home_team_shots".to_string()),
        },
        Selection::Categorical {
            column: Some("utc_time".to_string()),
        },
        Selection::BoxPlot {
            numerical: Some("home_team".to_string()),
            categorical: Some("full_time_result".to_string()),
        },
        Selection::Scatter {
            x: Some("round".to_string()),
            y: None,
        },
        trend("round", "round"),
        trend("home_team_shots", "utc_time"),
        Selection::Distribution { column: None },
    ];
    for selection in &cases {
        assert_eq!(ctx.derive(selection), DerivedView::Empty, "{selection:?}");
    }

    assert_eq!(
        ctx.try_derive(&trend("round", "round")),
        Err(SelectionError::ExcludedMetric {
            column: "round".to_string()
        })
    );
    assert_eq!(
        ctx.try_derive(&distribution("home_team")),
        Err(SelectionError::NotNumerical {
            column: "home_team".to_string()
        })
    );
}

#[test]
fn constant_x_has_no_trend_line() {
    let table = Table::from_columns(
        "flat",
        vec![
            Column::new("x", ColumnData::Integer(vec![Some(2); 4])),
            Column::new(
                "y",
                ColumnData::Float(vec![Some(1.0), Some(2.0), Some(3.5), None]),
            ),
        ],
    )
    .expect("table");
    let ctx = DatasetContext::new(table);
    let scatter = views::pairwise(ctx.table(), ctx.classes(), "x", "y").expect("numerical pair");
    assert_eq!(scatter.points.len(), 3);
    assert_eq!(scatter.fit, Err(FitError::ZeroVariance));

    let hist = views::distribution(ctx.table(), ctx.classes(), "x")
        .expect("numerical column")
        .expect("values present");
    assert_eq!(hist.total, 4);
    assert_eq!(hist.bins.iter().map(|b| b.count).sum::<usize>(), 4);
    assert!(hist.bins[0].start < 2.0);
}
