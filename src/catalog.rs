//! Human-readable description of the match dataset, grouped the way the
//! dataset screen presents it.

pub struct ColumnDoc {
    pub name: &'static str,
    pub description: &'static str,
    pub semantic_type: &'static str,
}

pub struct ColumnGroup {
    pub title: &'static str,
    pub columns: &'static [ColumnDoc],
}

const fn doc(
    name: &'static str,
    description: &'static str,
    semantic_type: &'static str,
) -> ColumnDoc {
    ColumnDoc {
        name,
        description,
        semantic_type,
    }
}

pub const COLUMN_GROUPS: &[ColumnGroup] = &[
    ColumnGroup {
        title: "Identifiers",
        columns: &[
            doc("round", "Match round number (1 to 38)", "integer"),
            doc(
                "home_team",
                "Name of the home team (e.g., 'Real Madrid', 'Barcelona')",
                "categorical",
            ),
            doc("away_team", "Name of the away team", "categorical"),
            doc(
                "utc_time",
                "Date and time of the match in UTC (e.g., '2023-08-11 17:30:00+00:00')",
                "datetime",
            ),
        ],
    },
    ColumnGroup {
        title: "Match Outcomes",
        columns: &[
            doc(
                "full_time_home_team_goals",
                "Goals scored by the home team at full time",
                "integer",
            ),
            doc(
                "full_time_away_team_goals",
                "Goals scored by the away team at full time",
                "integer",
            ),
            doc(
                "full_time_result",
                "Match result at full time ('H' home win, 'A' away win, 'D' draw)",
                "categorical",
            ),
            doc(
                "half_time_home_team_goals",
                "Goals scored by the home team at half time",
                "integer",
            ),
            doc(
                "half_time_away_team_goals",
                "Goals scored by the away team at half time",
                "integer",
            ),
            doc(
                "half_time_result",
                "Match result at half time ('H' home win, 'A' away win, 'D' draw)",
                "categorical",
            ),
        ],
    },
    ColumnGroup {
        title: "Performance Metrics",
        columns: &[
            doc("home_team_shots", "Total shots by the home team", "integer"),
            doc("away_team_shots", "Total shots by the away team", "integer"),
            doc("home_team_shots_on_target", "Shots on target by the home team", "integer"),
            doc("away_team_shots_on_target", "Shots on target by the away team", "integer"),
            doc("home_team_fouls_committed", "Fouls committed by the home team", "integer"),
            doc("away_team_fouls_committed", "Fouls committed by the away team", "integer"),
            doc("home_team_corners", "Corners won by the home team", "integer"),
            doc("away_team_corners", "Corners won by the away team", "integer"),
        ],
    },
    ColumnGroup {
        title: "Disciplinary Stats",
        columns: &[
            doc("home_team_yellow_cards", "Yellow cards received by the home team", "integer"),
            doc("away_team_yellow_cards", "Yellow cards received by the away team", "integer"),
            doc("home_team_red_cards", "Red cards received by the home team", "integer"),
            doc("away_team_red_cards", "Red cards received by the away team", "integer"),
        ],
    },
];

/// Canonical column order of the match file, calendar columns excluded.
pub fn canonical_columns() -> impl Iterator<Item = &'static str> {
    COLUMN_GROUPS
        .iter()
        .flat_map(|g| g.columns.iter())
        .map(|c| c.name)
}

pub fn describe(name: &str) -> Option<&'static ColumnDoc> {
    COLUMN_GROUPS
        .iter()
        .flat_map(|g| g.columns.iter())
        .find(|c| c.name == name)
}

pub const OVERVIEW_TITLE: &str = "Welcome to the LaLiga 23/24 season analytical dashboard!";

pub const OVERVIEW_TEXT: &str = "\
This dashboard turns the raw match data of the LaLiga 2023/24 season into an \
interactive tool for exploring team performance and match dynamics.

It is fed by match-by-match statistics for all 380 fixtures: outcomes at half \
and full time, shots, shots on target, fouls, corners and disciplinary actions, \
plus a directory of per-topic team and player statistics.

What you can do here:
  * Univariate analysis: the distribution of single metrics such as goals or shots.
  * Categorical analysis: breakdowns by result or by team.
  * Comparative analysis: a metric compared across categories with box plots.
  * Correlation analysis: pairwise scatter plots with a least-squares trend line, \
and a heatmap of every numerical pair.
  * Trend analysis: the average of a metric across match rounds, months or days \
of the week.

Every chart recomputes from the loaded season as you change a selector. The \
data is read-only; nothing you do here changes the files it came from.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_the_match_schema() {
        let names: Vec<&str> = canonical_columns().collect();
        assert_eq!(names.len(), 22);
        assert_eq!(names[0], "round");
        assert_eq!(names[21], "away_team_red_cards");
        assert_eq!(describe("full_time_result").map(|d| d.semantic_type), Some("categorical"));
        assert!(describe("day_of_week").is_none());
    }
}
