use serde::Serialize;
use tracing::warn;

use crate::catalog;
use crate::columns::ROUND;
use crate::outcome::{self, Outcome, OutcomeShares};
use crate::table::{ColumnData, Table};

pub const SEASON_ROUNDS: i64 = 38;
pub const FIXTURES_PER_ROUND: usize = 10;
pub const SEASON_FIXTURES: usize = SEASON_ROUNDS as usize * FIXTURES_PER_ROUND;

/// (result column, home goals column, away goals column)
pub const RESULT_RULES: [(&str, &str, &str); 2] = [
    (
        "full_time_result",
        "full_time_home_team_goals",
        "full_time_away_team_goals",
    ),
    (
        "half_time_result",
        "half_time_home_team_goals",
        "half_time_away_team_goals",
    ),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultMismatch {
    pub row: usize,
    pub column: &'static str,
    pub expected: char,
    pub found: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonReport {
    pub rows: usize,
    pub missing_columns: Vec<&'static str>,
    pub rounds_out_of_range: Vec<usize>,
    pub mismatches: Vec<ResultMismatch>,
    pub full_time_shares: Option<OutcomeShares>,
    pub goals_per_match: Option<f64>,
}

impl SeasonReport {
    pub fn is_clean(&self) -> bool {
        self.rows == SEASON_FIXTURES
            && self.missing_columns.is_empty()
            && self.rounds_out_of_range.is_empty()
            && self.mismatches.is_empty()
    }

    pub fn warnings(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.rows != SEASON_FIXTURES {
            out.push(format!(
                "expected {SEASON_FIXTURES} fixtures, found {}",
                self.rows
            ));
        }
        for column in &self.missing_columns {
            out.push(format!("missing column {column}"));
        }
        if !self.rounds_out_of_range.is_empty() {
            out.push(format!(
                "{} rows with round outside 1..={SEASON_ROUNDS}",
                self.rounds_out_of_range.len()
            ));
        }
        for m in self.mismatches.iter().take(5) {
            out.push(format!(
                "row {}: {} is {} but goals say {}",
                m.row,
                m.column,
                m.found.as_deref().unwrap_or("missing"),
                m.expected
            ));
        }
        if self.mismatches.len() > 5 {
            out.push(format!("... {} more result mismatches", self.mismatches.len() - 5));
        }
        out
    }

    /// One-line season digest for the home screen.
    pub fn summary_line(&self) -> String {
        let goals = self
            .goals_per_match
            .map(|g| format!("{g:.2} goals per match"))
            .unwrap_or_else(|| "goals per match n/a".to_string());
        match self.full_time_shares {
            Some(shares) => format!(
                "{goals} | home wins {:.1}% | draws {:.1}% | away wins {:.1}%",
                shares.home * 100.0,
                shares.draw * 100.0,
                shares.away * 100.0
            ),
            None => goals,
        }
    }

    pub fn log_warnings(&self) {
        for line in self.warnings() {
            warn!("season check: {line}");
        }
    }
}

pub fn check_season(table: &Table) -> SeasonReport {
    let missing_columns: Vec<&'static str> = catalog::canonical_columns()
        .filter(|name| !table.has_column(name))
        .collect();
    let mut mismatches = Vec::new();
    let mut full_time = Vec::new();

    let rounds_out_of_range = match table.column(ROUND).map(|c| &c.data) {
        Some(ColumnData::Integer(rounds)) => rounds
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_none_or(|r| !(1..=SEASON_ROUNDS).contains(&r)))
            .map(|(row, _)| row)
            .collect(),
        Some(_) => (0..table.row_count()).collect(),
        None => Vec::new(),
    };

    for (result_col, home_col, away_col) in RESULT_RULES {
        let (Some(result), Some(home), Some(away)) = (
            table.column(result_col),
            table.column(home_col),
            table.column(away_col),
        ) else {
            continue;
        };

        for row in 0..table.row_count() {
            let (Some(h), Some(a)) = (home.data.numeric(row), away.data.numeric(row)) else {
                continue;
            };
            let expected = outcome::classify_outcome(h as i64, a as i64);
            if result_col == RESULT_RULES[0].0 {
                full_time.push(expected);
            }
            let found = result.data.label(row).map(|s| s.into_owned());
            let matches = found
                .as_deref()
                .and_then(Outcome::from_code)
                .is_some_and(|o| o == expected);
            if !matches {
                mismatches.push(ResultMismatch {
                    row,
                    column: result_col,
                    expected: expected.code(),
                    found,
                });
            }
        }
    }

    let goals_per_match = {
        let home = table.numeric_values(RESULT_RULES[0].1).ok();
        let away = table.numeric_values(RESULT_RULES[0].2).ok();
        match (home, away) {
            (Some(h), Some(a)) if table.row_count() > 0 => {
                Some((h.iter().sum::<f64>() + a.iter().sum::<f64>()) / table.row_count() as f64)
            }
            _ => None,
        }
    };

    SeasonReport {
        rows: table.row_count(),
        missing_columns,
        rounds_out_of_range,
        mismatches,
        full_time_shares: outcome::outcome_shares(&full_time),
        goals_per_match,
    }
}
