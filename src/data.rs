//! Validation and reshaping of historical match results.
//!
//! Each match contributes two [PerformanceRecord]s to a [PerformanceTable]: the home team's goals
//! against the away team, and the away team's goals against the home team.

use std::io;
use std::io::BufRead;
use std::path::Path;

use strum_macros::Display;
use thiserror::Error;
use tracing::debug;

use crate::csv::{CsvReader, Header};
use crate::domain::{MatchRecord, PerformanceRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Field {
    #[strum(serialize = "home team")]
    HomeTeam,
    #[strum(serialize = "away team")]
    AwayTeam,
    #[strum(serialize = "home goals")]
    HomeGoals,
    #[strum(serialize = "away goals")]
    AwayGoals,
}
impl Field {
    /// The column holding this field in a football-data.co.uk results file.
    pub fn column(&self) -> &'static str {
        match self {
            Field::HomeTeam => "HomeTeam",
            Field::AwayTeam => "AwayTeam",
            Field::HomeGoals => "FTHG",
            Field::AwayGoals => "FTAG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataValidationError {
    #[error("row {row}: missing {field}")]
    MissingField { row: usize, field: Field },

    #[error("row {row}: {field} '{value}' is not a non-negative goal count")]
    InvalidGoals {
        row: usize,
        field: Field,
        value: String,
    },

    #[error("row {row}: {team} cannot play against itself")]
    IdenticalTeams { row: usize, team: String },
}

/// An unvalidated match row, with fields as they appear in the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawMatch<'a> {
    pub home_team: Option<&'a str>,
    pub away_team: Option<&'a str>,
    pub home_goals: Option<&'a str>,
    pub away_goals: Option<&'a str>,
}
impl<'a> RawMatch<'a> {
    pub fn validate(&self, row: usize) -> Result<MatchRecord, DataValidationError> {
        let home_team = parse_team(row, Field::HomeTeam, self.home_team)?;
        let away_team = parse_team(row, Field::AwayTeam, self.away_team)?;
        let home_goals = parse_goals(row, Field::HomeGoals, self.home_goals)?;
        let away_goals = parse_goals(row, Field::AwayGoals, self.away_goals)?;
        let record = MatchRecord {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_goals,
            away_goals,
        };
        validate_teams(row, &record)?;
        Ok(record)
    }
}

fn parse_team<'a>(row: usize, field: Field, value: Option<&'a str>) -> Result<&'a str, DataValidationError> {
    match value.map(str::trim) {
        Some(team) if !team.is_empty() => Ok(team),
        _ => Err(DataValidationError::MissingField { row, field }),
    }
}

fn parse_goals(row: usize, field: Field, value: Option<&str>) -> Result<u8, DataValidationError> {
    let value = match value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(DataValidationError::MissingField { row, field }),
    };
    value
        .parse()
        .map_err(|_| DataValidationError::InvalidGoals {
            row,
            field,
            value: value.into(),
        })
}

fn validate_teams(row: usize, record: &MatchRecord) -> Result<(), DataValidationError> {
    if record.home_team.trim().is_empty() {
        return Err(DataValidationError::MissingField { row, field: Field::HomeTeam });
    }
    if record.away_team.trim().is_empty() {
        return Err(DataValidationError::MissingField { row, field: Field::AwayTeam });
    }
    if record.home_team == record.away_team {
        return Err(DataValidationError::IdenticalTeams {
            row,
            team: record.home_team.clone(),
        });
    }
    Ok(())
}

/// One row per team per match. Only constructible by [reshape], which guarantees that the table
/// holds exactly two rows per match and that no team is its own opponent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceTable {
    records: Vec<PerformanceRecord>,
}
impl PerformanceTable {
    pub fn records(&self) -> &[PerformanceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PerformanceRecord> {
        self.records.iter()
    }
}

/// Reshapes match results into a [PerformanceTable]. Rows in reported errors are 1-based
/// positions in `matches`.
pub fn reshape(matches: &[MatchRecord]) -> Result<PerformanceTable, DataValidationError> {
    let mut records = Vec::with_capacity(matches.len() * 2);
    for (index, record) in matches.iter().enumerate() {
        validate_teams(index + 1, record)?;
        records.push(PerformanceRecord {
            team: record.home_team.clone(),
            opponent: record.away_team.clone(),
            goals: record.home_goals,
            is_home: true,
        });
        records.push(PerformanceRecord {
            team: record.away_team.clone(),
            opponent: record.home_team.clone(),
            goals: record.away_goals,
            is_home: false,
        });
    }
    Ok(PerformanceTable { records })
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("no header row")]
    MissingHeader,

    #[error("missing column {0}")]
    MissingColumn(&'static str),

    #[error("{0}")]
    Validation(#[from] DataValidationError),
}

/// Loads match results from a CSV with a header row naming the `HomeTeam`, `AwayTeam`, `FTHG`
/// and `FTAG` columns. Other columns are ignored. Rows in reported errors are line numbers.
pub fn load_matches<R: BufRead>(mut reader: CsvReader<R>) -> Result<Vec<MatchRecord>, LoadError> {
    let header = Header::from(reader.read().ok_or(LoadError::MissingHeader)??);
    let column = |field: Field| {
        header
            .index_of(field.column())
            .ok_or(LoadError::MissingColumn(field.column()))
    };
    let (home_team, away_team, home_goals, away_goals) = (
        column(Field::HomeTeam)?,
        column(Field::AwayTeam)?,
        column(Field::HomeGoals)?,
        column(Field::AwayGoals)?,
    );

    let mut matches = vec![];
    while let Some(fields) = reader.read() {
        let fields = fields?;
        let field = |index: usize| fields.get(index).map(String::as_str);
        let raw = RawMatch {
            home_team: field(home_team),
            away_team: field(away_team),
            home_goals: field(home_goals),
            away_goals: field(away_goals),
        };
        matches.push(raw.validate(reader.line())?);
    }
    debug!("loaded {} matches from {} lines", matches.len(), reader.line());
    Ok(matches)
}

pub fn read_matches_file(path: impl AsRef<Path>) -> Result<Vec<MatchRecord>, LoadError> {
    load_matches(CsvReader::open(path)?)
}
