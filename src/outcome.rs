use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Outcome {
    Home,
    Draw,
    Away,
}

impl Outcome {
    pub fn code(self) -> char {
        match self {
            Outcome::Home => 'H',
            Outcome::Draw => 'D',
            Outcome::Away => 'A',
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "H" => Some(Outcome::Home),
            "D" => Some(Outcome::Draw),
            "A" => Some(Outcome::Away),
            _ => None,
        }
    }
}

/// Share of each outcome across a set of matches, as fractions of 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OutcomeShares {
    pub home: f64,
    pub draw: f64,
    pub away: f64,
}

pub fn classify_outcome(home_goals: i64, away_goals: i64) -> Outcome {
    if home_goals > away_goals {
        Outcome::Home
    } else if home_goals < away_goals {
        Outcome::Away
    } else {
        Outcome::Draw
    }
}

pub fn outcome_shares(outcomes: &[Outcome]) -> Option<OutcomeShares> {
    if outcomes.is_empty() {
        return None;
    }

    let mut home = 0usize;
    let mut draw = 0usize;
    let mut away = 0usize;
    for outcome in outcomes {
        match outcome {
            Outcome::Home => home += 1,
            Outcome::Draw => draw += 1,
            Outcome::Away => away += 1,
        }
    }
    let n = outcomes.len() as f64;
    Some(OutcomeShares {
        home: home as f64 / n,
        draw: draw as f64 / n,
        away: away as f64 / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_goal_difference() {
        assert_eq!(classify_outcome(2, 1).code(), 'H');
        assert_eq!(classify_outcome(0, 3).code(), 'A');
        assert_eq!(classify_outcome(1, 1).code(), 'D');
        assert_eq!(Outcome::from_code(" A "), Some(Outcome::Away));
        assert_eq!(Outcome::from_code("X"), None);
    }
}
