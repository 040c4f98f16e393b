//! Match predictions from a [FittedModel].

use anyhow::bail;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{Outcome, Score, Side};
use crate::factorial;
use crate::linear::matrix::Matrix;
use crate::model::{FittedModel, UnknownTeamError};
use crate::scoregrid;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictOptions {
    /// The largest goal count tabulated for either side. When absent, the sum of the expected
    /// goals of both sides is used, rounded to a whole number of goals.
    pub max_goals: Option<u8>,
}
impl PredictOptions {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_goals == Some(0) {
            bail!("max_goals must be positive");
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictError {
    #[error("{0}")]
    UnknownTeam(#[from] UnknownTeamError),

    #[error("invalid fixture: {team} cannot play against itself")]
    InvalidFixture { team: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub home_team: String,
    pub away_team: String,
    pub home_goals_expected: f64,
    pub away_goals_expected: f64,
    pub scoreline_matrix: Matrix<f64>,
    pub home_win_pct: u8,
    pub draw_pct: u8,
    pub away_win_pct: u8,
}
impl Prediction {
    /// The expected goals of each side, rounded to whole goals.
    pub fn rounded_score(&self) -> Score {
        Score::new(
            round_goals(self.home_goals_expected),
            round_goals(self.away_goals_expected),
        )
    }

    pub fn max_goals(&self) -> u8 {
        (self.scoreline_matrix.rows() - 1) as u8
    }

    pub fn pct(&self, outcome: &Outcome) -> u8 {
        match outcome {
            Outcome::Win(Side::Home) => self.home_win_pct,
            Outcome::Draw => self.draw_pct,
            Outcome::Win(Side::Away) => self.away_win_pct,
        }
    }
}

#[inline]
fn round_goals(goals: f64) -> u8 {
    goals.round_ties_even().clamp(0.0, u8::MAX as f64) as u8
}

/// Rounds a probability to a whole percentage. Ties go to the even percentage.
#[inline]
fn to_pct(prob: f64) -> u8 {
    (prob * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
}

/// The goal count at which the scoreline matrix is truncated. Never less than 1, nor less than
/// either side's rounded expected goals.
fn resolve_max_goals(options: &PredictOptions, home_goals_expected: f64, away_goals_expected: f64) -> u8 {
    let requested = match options.max_goals {
        Some(max_goals) => max_goals as f64,
        None => (home_goals_expected + away_goals_expected).round_ties_even(),
    };
    let max_goals = requested
        .max(home_goals_expected.round_ties_even())
        .max(away_goals_expected.round_ties_even())
        .max(1.0);
    if max_goals > factorial::MAX_N as f64 {
        warn!(
            "max_goals {max_goals} exceeds the limit of {}; clamping",
            factorial::MAX_N
        );
        factorial::MAX_N
    } else {
        max_goals as u8
    }
}

/// Predicts the outcome of `home_team` hosting `away_team`. The home and away goal counts are
/// taken to be independent Poisson variates, each with a mean given by the model.
pub fn predict(
    model: &FittedModel,
    home_team: &str,
    away_team: &str,
    options: &PredictOptions,
) -> Result<Prediction, PredictError> {
    if home_team == away_team {
        return Err(PredictError::InvalidFixture {
            team: home_team.into(),
        });
    }

    let home_goals_expected = model.expectation(home_team, away_team, Side::Home)?;
    let away_goals_expected = model.expectation(away_team, home_team, Side::Away)?;
    let max_goals = resolve_max_goals(options, home_goals_expected, away_goals_expected) as usize;

    let mut scoreline_matrix = Matrix::allocate(max_goals + 1, max_goals + 1);
    scoregrid::from_univariate_poisson(home_goals_expected, away_goals_expected, &mut scoreline_matrix);
    let [home_win_pct, draw_pct, away_win_pct] =
        Outcome::ALL.map(|outcome| to_pct(outcome.gather(&scoreline_matrix)));
    debug!(
        "{home_team} vs {away_team}: expected goals {home_goals_expected:.3}:{away_goals_expected:.3}, max_goals: {max_goals}, coverage: {:.6}",
        scoregrid::coverage(&scoreline_matrix)
    );

    Ok(Prediction {
        home_team: home_team.into(),
        away_team: away_team.into(),
        home_goals_expected,
        away_goals_expected,
        scoreline_matrix,
        home_win_pct,
        draw_pct,
        away_win_pct,
    })
}
