//! Seeded synthetic season with the canonical match schema: a 20-team
//! double round robin, 38 rounds of 10 fixtures, one round per week
//! with three break weeks, August to May.

use std::io::Write;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ShapeError;
use crate::outcome::classify_outcome;
use crate::table::{Column, ColumnData, Table};

pub const TEAMS: [&str; 20] = [
    "Almeria",
    "Athletic Club",
    "Atletico Madrid",
    "Barcelona",
    "Cadiz",
    "Celta Vigo",
    "Alaves",
    "Getafe",
    "Girona",
    "Granada",
    "Las Palmas",
    "Mallorca",
    "Osasuna",
    "Rayo Vallecano",
    "Real Betis",
    "Real Madrid",
    "Real Sociedad",
    "Sevilla",
    "Valencia",
    "Villarreal",
];

// Fixture slots within a matchweek: (days after Friday, kickoff hour UTC).
const SLOTS: [(i64, u32); 10] = [
    (0, 19),
    (1, 12),
    (1, 14),
    (1, 16),
    (1, 19),
    (2, 12),
    (2, 14),
    (2, 17),
    (2, 19),
    (3, 19),
];

// International breaks: no fixtures the week after these rounds.
const BREAK_AFTER_ROUNDS: [usize; 3] = [4, 9, 13];

const HOME_GOAL_WEIGHTS: [u32; 7] = [22, 33, 25, 12, 5, 2, 1];
const AWAY_GOAL_WEIGHTS: [u32; 6] = [30, 35, 20, 10, 4, 1];

#[derive(Default)]
struct Columns {
    round: Vec<Option<i64>>,
    home_team: Vec<Option<String>>,
    away_team: Vec<Option<String>>,
    utc_time: Vec<Option<DateTime<Utc>>>,
    ft_home: Vec<Option<i64>>,
    ft_away: Vec<Option<i64>>,
    ft_result: Vec<Option<String>>,
    ht_home: Vec<Option<i64>>,
    ht_away: Vec<Option<i64>>,
    ht_result: Vec<Option<String>>,
    shots: [Vec<Option<i64>>; 2],
    on_target: [Vec<Option<i64>>; 2],
    fouls: [Vec<Option<i64>>; 2],
    corners: [Vec<Option<i64>>; 2],
    yellows: [Vec<Option<i64>>; 2],
    reds: [Vec<Option<i64>>; 2],
}

/// Pairings per round, `(home, away)` indexes into `TEAMS`.
pub fn round_robin_schedule(teams: usize) -> Vec<Vec<(usize, usize)>> {
    let n = teams + teams % 2;
    let mut ring: Vec<usize> = (0..n).collect();
    let mut first_half = Vec::with_capacity(n - 1);
    for round in 0..n - 1 {
        let mut pairs = Vec::with_capacity(n / 2);
        for i in 0..n / 2 {
            let (a, b) = (ring[i], ring[n - 1 - i]);
            if a >= teams || b >= teams {
                continue;
            }
            // Alternate the anchored team's venue so home games balance out.
            if (i == 0 && round % 2 == 1) || (i > 0 && i % 2 == 1) {
                pairs.push((b, a));
            } else {
                pairs.push((a, b));
            }
        }
        first_half.push(pairs);
        ring[1..].rotate_right(1);
    }
    let second_half: Vec<Vec<(usize, usize)>> = first_half
        .iter()
        .map(|pairs| pairs.iter().map(|&(h, a)| (a, h)).collect())
        .collect();
    first_half.into_iter().chain(second_half).collect()
}

pub fn generate_season(seed: u64) -> Result<Table, ShapeError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let kickoff_friday = NaiveDate::from_ymd_opt(2023, 8, 11).unwrap_or_default();
    let mut cols = Columns::default();

    for (round_idx, pairs) in round_robin_schedule(TEAMS.len()).iter().enumerate() {
        let skipped = BREAK_AFTER_ROUNDS.iter().filter(|&&r| r <= round_idx).count();
        let week = kickoff_friday + ChronoDuration::days(7 * (round_idx + skipped) as i64);
        for (slot, &(home, away)) in pairs.iter().enumerate() {
            let (day_offset, hour) = SLOTS[slot % SLOTS.len()];
            let kickoff = (week + ChronoDuration::days(day_offset))
                .and_hms_opt(hour, 0, 0)
                .map(|dt| dt.and_utc());

            let ft = [
                weighted_goals(&mut rng, &HOME_GOAL_WEIGHTS),
                weighted_goals(&mut rng, &AWAY_GOAL_WEIGHTS),
            ];
            let ht = ft.map(|goals| (0..goals).filter(|_| rng.gen_bool(0.45)).count() as i64);

            cols.round.push(Some(round_idx as i64 + 1));
            cols.home_team.push(Some(TEAMS[home].to_string()));
            cols.away_team.push(Some(TEAMS[away].to_string()));
            cols.utc_time.push(kickoff);
            cols.ft_home.push(Some(ft[0]));
            cols.ft_away.push(Some(ft[1]));
            cols.ft_result.push(Some(classify_outcome(ft[0], ft[1]).code().to_string()));
            cols.ht_home.push(Some(ht[0]));
            cols.ht_away.push(Some(ht[1]));
            cols.ht_result.push(Some(classify_outcome(ht[0], ht[1]).code().to_string()));

            for side in 0..2 {
                let shots = rng.gen_range(5..=22).max(ft[side]);
                let on_target = (ft[side] + rng.gen_range(0..=6)).min(shots);
                cols.shots[side].push(Some(shots));
                cols.on_target[side].push(Some(on_target));
                cols.fouls[side].push(Some(rng.gen_range(6..=18)));
                cols.corners[side].push(Some(rng.gen_range(0..=11)));
                cols.yellows[side].push(Some(rng.gen_range(0..=5)));
                cols.reds[side].push(Some(i64::from(rng.gen_bool(0.08))));
            }
        }
    }

    let [home_shots, away_shots] = cols.shots;
    let [home_on_target, away_on_target] = cols.on_target;
    let [home_fouls, away_fouls] = cols.fouls;
    let [home_corners, away_corners] = cols.corners;
    let [home_yellows, away_yellows] = cols.yellows;
    let [home_reds, away_reds] = cols.reds;

    Table::from_columns(
        "sample_season",
        vec![
            Column::new("round", ColumnData::Integer(cols.round)),
            Column::new("home_team", ColumnData::Text(cols.home_team)),
            Column::new("away_team", ColumnData::Text(cols.away_team)),
            Column::new("utc_time", ColumnData::Timestamp(cols.utc_time)),
            Column::new("full_time_home_team_goals", ColumnData::Integer(cols.ft_home)),
            Column::new("full_time_away_team_goals", ColumnData::Integer(cols.ft_away)),
            Column::new("full_time_result", ColumnData::Text(cols.ft_result)),
            Column::new("half_time_home_team_goals", ColumnData::Integer(cols.ht_home)),
            Column::new("half_time_away_team_goals", ColumnData::Integer(cols.ht_away)),
            Column::new("half_time_result", ColumnData::Text(cols.ht_result)),
            Column::new("home_team_shots", ColumnData::Integer(home_shots)),
            Column::new("away_team_shots", ColumnData::Integer(away_shots)),
            Column::new("home_team_shots_on_target", ColumnData::Integer(home_on_target)),
            Column::new("away_team_shots_on_target", ColumnData::Integer(away_on_target)),
            Column::new("home_team_fouls_committed", ColumnData::Integer(home_fouls)),
            Column::new("away_team_fouls_committed", ColumnData::Integer(away_fouls)),
            Column::new("home_team_corners", ColumnData::Integer(home_corners)),
            Column::new("away_team_corners", ColumnData::Integer(away_corners)),
            Column::new("home_team_yellow_cards", ColumnData::Integer(home_yellows)),
            Column::new("away_team_yellow_cards", ColumnData::Integer(away_yellows)),
            Column::new("home_team_red_cards", ColumnData::Integer(home_reds)),
            Column::new("away_team_red_cards", ColumnData::Integer(away_reds)),
        ],
    )
}

fn weighted_goals(rng: &mut StdRng, weights: &[u32]) -> i64 {
    let total: u32 = weights.iter().sum();
    let mut pick = rng.gen_range(0..total);
    for (goals, &w) in weights.iter().enumerate() {
        if pick < w {
            return goals as i64;
        }
        pick -= w;
    }
    0
}

/// Writes a table as CSV, optionally with a leading blank-headed row index.
pub fn write_csv<W: Write>(table: &Table, writer: W, with_index: bool) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    let mut header: Vec<String> = Vec::with_capacity(table.column_count() + 1);
    if with_index {
        header.push(String::new());
    }
    header.extend(table.column_names().map(str::to_string));
    out.write_record(&header).context("write csv header")?;

    for row in 0..table.row_count() {
        let mut record = Vec::with_capacity(header.len());
        if with_index {
            record.push(row.to_string());
        }
        record.extend(table.columns().iter().map(|c| c.data.display(row)));
        out.write_record(&record)
            .with_context(|| format!("write csv row {row}"))?;
    }
    out.flush().context("flush csv")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::Datelike;

    use super::*;

    #[test]
    fn every_pair_meets_home_and_away_once() {
        let schedule = round_robin_schedule(TEAMS.len());
        assert_eq!(schedule.len(), 38);
        let mut seen = HashSet::new();
        for round in &schedule {
            assert_eq!(round.len(), 10);
            let mut teams = HashSet::new();
            for &(h, a) in round {
                assert!(teams.insert(h) && teams.insert(a));
                assert!(seen.insert((h, a)), "duplicate fixture {h} v {a}");
            }
        }
        assert_eq!(seen.len(), 380);
    }

    #[test]
    fn same_seed_same_season() {
        assert_eq!(generate_season(3).unwrap(), generate_season(3).unwrap());
    }

    #[test]
    fn season_runs_from_august_into_may() {
        let table = generate_season(5).unwrap();
        let Some(ColumnData::Timestamp(kickoffs)) = table.column("utc_time").map(|c| &c.data)
        else {
            panic!("utc_time should be a timestamp column");
        };
        let first = kickoffs.iter().flatten().min().unwrap();
        let last = kickoffs.iter().flatten().max().unwrap();
        assert_eq!((first.month(), first.day()), (8, 11));
        assert_eq!(last.month(), 5);
    }
}
