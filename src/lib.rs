//! Football match outcome prediction. A Poisson GLM of goals scored, with team, opponent and
//! home advantage effects, is fitted to one season of results. Expected goals for a fixture are
//! expanded into a scoreline probability matrix and summarised as home win, draw and away win
//! percentages.

use thiserror::Error;

pub mod cache;
pub mod csv;
pub mod data;
pub mod domain;
pub mod factorial;
pub mod file;
pub mod glm;
pub mod linear;
pub mod model;
pub mod poisson;
pub mod predict;
pub mod print;
pub mod scoregrid;
pub mod timed;

#[cfg(test)]
pub(crate) mod testing;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Load(#[from] data::LoadError),

    #[error("{0}")]
    Validation(#[from] data::DataValidationError),

    #[error("{0}")]
    Fit(#[from] model::FitError),

    #[error("{0}")]
    Predict(#[from] predict::PredictError),
}

#[doc = include_str!("../README.md")]
#[cfg(doc)]
fn readme() {}
