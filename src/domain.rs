use std::fmt;
use std::fmt::Formatter;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// The result of a single match, as sourced from the historical record.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub home_goals: u8,
    pub away_goals: u8,
}
impl MatchRecord {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>, home_goals: u8, away_goals: u8) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals,
            away_goals,
        }
    }
}

/// One team's performance in a match: the goals it scored against `opponent`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub team: String,
    pub opponent: String,
    pub goals: u8,
    pub is_home: bool,
}
impl PerformanceRecord {
    pub fn side(&self) -> Side {
        if self.is_home {
            Side::Home
        } else {
            Side::Away
        }
    }
}

#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display)]
pub enum Side {
    Home,
    Away,
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Score {
    pub home: u8,
    pub away: u8,
}
impl Score {
    pub fn new(home: u8, away: u8) -> Self {
        Self { home, away }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.home, self.away)
    }
}

/// Full-time result of a match, from the home team's perspective.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Outcome {
    Win(Side),
    Draw,
}
impl Outcome {
    pub const ALL: [Outcome; 3] = [Outcome::Win(Side::Home), Outcome::Draw, Outcome::Win(Side::Away)];
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Win(side) => write!(f, "{side} win"),
            Outcome::Draw => write!(f, "Draw"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_display() {
        assert_eq!("Home win", Outcome::Win(Side::Home).to_string());
        assert_eq!("Away win", Outcome::Win(Side::Away).to_string());
        assert_eq!("Draw", Outcome::Draw.to_string());
    }

    #[test]
    fn score_display() {
        assert_eq!("2:0", Score::new(2, 0).to_string());
    }

    #[test]
    fn performance_side() {
        let record = PerformanceRecord {
            team: "Arsenal".into(),
            opponent: "Chelsea".into(),
            goals: 2,
            is_home: false,
        };
        assert_eq!(Side::Away, record.side());
    }
}
