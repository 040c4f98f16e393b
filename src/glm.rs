//! Generalised linear model of Poisson-distributed counts with a logarithmic link, fitted by
//! iteratively reweighted least squares (IRLS).
//!
//! Each IRLS step is an ordinary least squares problem on the working response, with rows
//! scaled by the square root of the working weights. The least squares solution is delegated
//! to [linregress]. Columns of the design that are linear combinations of earlier columns are
//! aliased: they are excluded from the fit and their coefficients are reported as zero.

use anyhow::bail;
use linregress::fit_low_level_regression_model_without_statistics;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::linear::aliasing;
use crate::linear::matrix::Matrix;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Upper bound on the number of IRLS iterations.
    pub max_iterations: usize,

    /// Absolute change in deviance between successive iterations at which the fit is deemed
    /// to have converged.
    pub tolerance: f64,
}
impl FitOptions {
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_iterations == 0 {
            bail!("at least one iteration must be permitted");
        }
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            bail!("tolerance must be a positive number");
        }
        Ok(())
    }
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            tolerance: 1e-8,
        }
    }
}

#[derive(Debug, Error)]
pub enum ModelFitError {
    #[error("no convergence after {iterations} iterations (last deviance change {deviance_change:e})")]
    NonConvergence {
        iterations: usize,
        deviance_change: f64,
    },

    #[error("non-finite {quantity} at iteration {iteration}")]
    NonFinite {
        quantity: &'static str,
        iteration: usize,
    },

    #[error("every response is zero")]
    ZeroResponse,

    #[error("least squares step failed: {0}")]
    Solver(#[from] linregress::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoissonFit {
    /// One coefficient per design column, zero where the column is aliased.
    pub coefficients: Vec<f64>,
    pub aliased: Vec<bool>,
    pub iterations: usize,
    pub deviance: f64,
    pub null_deviance: f64,
    /// Fitted means, one per observation.
    pub fitted: Vec<f64>,
}
impl PoissonFit {
    /// The fitted mean for a row of regressor values.
    pub fn predict(&self, regressors: &[f64]) -> f64 {
        linear_predictor(&self.coefficients, regressors).exp()
    }

    pub fn residual_degrees_of_freedom(&self) -> usize {
        let parameters = self.aliased.iter().filter(|&&aliased| !aliased).count();
        self.fitted.len().saturating_sub(parameters)
    }
}

/// Fits `response` (non-negative counts, one per row of `design`) by maximum likelihood.
pub fn fit_poisson(
    design: &Matrix<f64>,
    response: &[f64],
    options: &FitOptions,
) -> Result<PoissonFit, ModelFitError> {
    assert_eq!(
        design.rows(),
        response.len(),
        "number of design rows {} does not match number of responses {}",
        design.rows(),
        response.len()
    );
    assert!(!response.is_empty(), "at least one observation is required");

    let observations = response.len();
    let mean = response.iter().sum::<f64>() / observations as f64;
    if mean == 0.0 {
        return Err(ModelFitError::ZeroResponse);
    }

    let aliased = aliasing::find_aliased(design, aliasing::DEFAULT_TOLERANCE);
    let active = (0..design.cols())
        .filter(|&col| !aliased[col])
        .collect::<Vec<_>>();
    let null_deviance = deviance(response, &vec![mean; observations]);

    let mut fitted = response
        .iter()
        .map(|&y| (y + mean) / 2.0)
        .collect::<Vec<_>>();
    let mut eta = fitted.iter().map(|mu| mu.ln()).collect::<Vec<_>>();
    let mut dev = deviance(response, &fitted);
    let mut coefficients = vec![0.0; design.cols()];
    let mut scaled = Vec::with_capacity(observations * (1 + active.len()));
    let mut deviance_change = f64::INFINITY;

    for iteration in 1..=options.max_iterations {
        scaled.clear();
        for (row, regressors) in design.into_iter().enumerate() {
            let mu = fitted[row];
            let weight_sqrt = mu.sqrt();
            let working_response = eta[row] + (response[row] - mu) / mu;
            scaled.push(weight_sqrt * working_response);
            for &col in &active {
                scaled.push(weight_sqrt * regressors[col]);
            }
        }

        let params = fit_low_level_regression_model_without_statistics(
            &scaled,
            observations,
            1 + active.len(),
        )?;
        for (&col, &param) in active.iter().zip(params.iter()) {
            coefficients[col] = param;
        }
        if coefficients.iter().any(|coefficient| !coefficient.is_finite()) {
            return Err(ModelFitError::NonFinite {
                quantity: "coefficient",
                iteration,
            });
        }

        for (row, regressors) in design.into_iter().enumerate() {
            eta[row] = linear_predictor(&coefficients, regressors);
            fitted[row] = eta[row].exp();
        }
        let new_dev = deviance(response, &fitted);
        if !new_dev.is_finite() {
            return Err(ModelFitError::NonFinite {
                quantity: "deviance",
                iteration,
            });
        }
        deviance_change = (new_dev - dev).abs();
        dev = new_dev;
        trace!("iteration: {iteration}, deviance: {dev}, change: {deviance_change:e}");

        if deviance_change <= options.tolerance {
            return Ok(PoissonFit {
                coefficients,
                aliased,
                iterations: iteration,
                deviance: dev,
                null_deviance,
                fitted,
            });
        }
    }

    Err(ModelFitError::NonConvergence {
        iterations: options.max_iterations,
        deviance_change,
    })
}

#[inline]
fn linear_predictor(coefficients: &[f64], regressors: &[f64]) -> f64 {
    debug_assert_eq!(coefficients.len(), regressors.len());
    coefficients
        .iter()
        .zip(regressors)
        .map(|(coefficient, regressor)| coefficient * regressor)
        .sum()
}

/// Poisson deviance of the `fitted` means against the observed `response`.
pub fn deviance(response: &[f64], fitted: &[f64]) -> f64 {
    2.0 * response
        .iter()
        .zip(fitted)
        .map(|(&y, &mu)| {
            let log_ratio_term = if y > 0.0 { y * (y / mu).ln() } else { 0.0 };
            log_ratio_term - (y - mu)
        })
        .sum::<f64>()
}
