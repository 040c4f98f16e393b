//! Goal-scoring model. The expected goals of a team in a match are a log-linear function of the
//! scoring team, the opposing team and whether the scoring team is at home:
//!
//! `ln E[goals] = intercept + attack[team] + defence[opponent] + home`
//!
//! Teams are treatment-coded against the first team in name order, whose attack and defence
//! coefficients are fixed at zero. The model is fitted as a Poisson GLM over a [PerformanceTable].

use std::fmt::{Display, Formatter};

use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::debug;

use crate::data::PerformanceTable;
use crate::domain::Side;
use crate::glm::{FitOptions, ModelFitError, PoissonFit};
use crate::linear::matrix::Matrix;
use crate::timed::Timed;
use crate::glm;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown team '{0}'")]
pub struct UnknownTeamError(pub String);

#[derive(Debug, Error)]
pub enum FitError {
    #[error("insufficient data: no performances to fit")]
    InsufficientData,

    #[error("model fit failed: {0}")]
    ModelFit(#[from] ModelFitError),
}

/// Enumeration of the teams in a dataset, ordered by name.
#[derive(Debug, Clone, PartialEq)]
pub struct TeamIndex {
    names: Vec<String>,
    lookup: FxHashMap<String, usize>,
}
impl TeamIndex {
    pub fn from_table(table: &PerformanceTable) -> Self {
        let mut names = table
            .iter()
            .flat_map(|record| [&record.team, &record.opponent])
            .cloned()
            .collect::<Vec<_>>();
        names.sort();
        names.dedup();
        let lookup = names
            .iter()
            .enumerate()
            .map(|(index, name)| (name.clone(), index))
            .collect();
        Self { names, lookup }
    }

    pub fn index_of(&self, team: &str) -> Result<usize, UnknownTeamError> {
        self.lookup
            .get(team)
            .copied()
            .ok_or_else(|| UnknownTeamError(team.into()))
    }

    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, team: &str) -> bool {
        self.lookup.contains_key(team)
    }
}

/// A column of the design matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regressor {
    Intercept,
    Team(usize),
    Opponent(usize),
    Home,
}

/// Layout of the design matrix: `[intercept, team[1..n), opponent[1..n), home]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Layout {
    teams: usize,
}
impl Layout {
    fn cols(&self) -> usize {
        2 * self.teams
    }

    fn regressors(&self) -> Vec<Regressor> {
        let mut regressors = Vec::with_capacity(self.cols());
        regressors.push(Regressor::Intercept);
        regressors.extend((1..self.teams).map(Regressor::Team));
        regressors.extend((1..self.teams).map(Regressor::Opponent));
        regressors.push(Regressor::Home);
        regressors
    }

    fn encode(&self, team: usize, opponent: usize, side: Side, row: &mut [f64]) {
        debug_assert_eq!(self.cols(), row.len());
        row.fill(0.0);
        row[0] = 1.0;
        if team > 0 {
            row[team] = 1.0;
        }
        if opponent > 0 {
            row[self.teams - 1 + opponent] = 1.0;
        }
        if side == Side::Home {
            row[self.cols() - 1] = 1.0;
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    teams: TeamIndex,
    layout: Layout,
    regressors: Vec<Regressor>,
    fit: PoissonFit,
}
impl FittedModel {
    pub fn teams(&self) -> &TeamIndex {
        &self.teams
    }

    pub fn regressors(&self) -> &[Regressor] {
        &self.regressors
    }

    /// One coefficient per regressor; aliased regressors have a coefficient of zero.
    pub fn coefficients(&self) -> &[f64] {
        &self.fit.coefficients
    }

    pub fn coefficient(&self, regressor: Regressor) -> Option<f64> {
        self.regressors
            .iter()
            .position(|&candidate| candidate == regressor)
            .map(|col| self.fit.coefficients[col])
    }

    pub fn is_aliased(&self, col: usize) -> bool {
        self.fit.aliased[col]
    }

    pub fn iterations(&self) -> usize {
        self.fit.iterations
    }

    pub fn deviance(&self) -> f64 {
        self.fit.deviance
    }

    pub fn null_deviance(&self) -> f64 {
        self.fit.null_deviance
    }

    pub fn observations(&self) -> usize {
        self.fit.fitted.len()
    }

    pub fn residual_degrees_of_freedom(&self) -> usize {
        self.fit.residual_degrees_of_freedom()
    }

    /// Expected goals of `team` against `opponent`, playing on the given `side`.
    pub fn expectation(&self, team: &str, opponent: &str, side: Side) -> Result<f64, UnknownTeamError> {
        let team = self.teams.index_of(team)?;
        let opponent = self.teams.index_of(opponent)?;
        let mut row = vec![0.0; self.layout.cols()];
        self.layout.encode(team, opponent, side, &mut row);
        Ok(self.fit.predict(&row))
    }

    pub fn label(&self, regressor: &Regressor) -> RegressorLabel {
        RegressorLabel {
            regressor: *regressor,
            teams: &self.teams,
        }
    }
}

pub struct RegressorLabel<'a> {
    regressor: Regressor,
    teams: &'a TeamIndex,
}

impl<'a> Display for RegressorLabel<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.regressor {
            Regressor::Intercept => write!(f, "Intercept"),
            Regressor::Team(index) => write!(f, "team[{}]", self.teams.name(index)),
            Regressor::Opponent(index) => write!(f, "opponent[{}]", self.teams.name(index)),
            Regressor::Home => write!(f, "home"),
        }
    }
}

/// Fits the goal model to every performance in `table`.
pub fn fit_model(table: &PerformanceTable, options: &FitOptions) -> Result<FittedModel, FitError> {
    if table.is_empty() {
        return Err(FitError::InsufficientData);
    }

    let teams = TeamIndex::from_table(table);
    let layout = Layout { teams: teams.len() };
    let mut design = Matrix::allocate(table.len(), layout.cols());
    let mut response = Vec::with_capacity(table.len());
    for (row, record) in table.iter().enumerate() {
        let (team, opponent) = (teams.lookup[&record.team], teams.lookup[&record.opponent]);
        layout.encode(team, opponent, record.side(), design.row_slice_mut(row));
        response.push(record.goals as f64);
    }

    let Timed { value: fit, elapsed } =
        Timed::result(|| glm::fit_poisson(&design, &response, options))?;
    debug!(
        "fitted {} performances of {} teams in {} iterations ({elapsed:?}): deviance {:.3}, null deviance {:.3}",
        table.len(),
        teams.len(),
        fit.iterations,
        fit.deviance,
        fit.null_deviance
    );
    Ok(FittedModel {
        regressors: layout.regressors(),
        teams,
        layout,
        fit,
    })
}

#[cfg(test)]
mod tests;
