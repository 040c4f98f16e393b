//! Scoreline probability matrices. Row `i` and column `j` hold the probability of the home side
//! scoring `i` goals and the away side scoring `j` goals. A matrix is truncated at its dimensions,
//! so its cells sum to at most 1.

use crate::domain::{Outcome, Side};
use crate::factorial;
use crate::linear::matrix::Matrix;
use crate::poisson;

/// Populates `scoregrid` assuming the home and away goal counts are independent Poisson variates
/// with the given mean rates.
pub fn from_univariate_poisson(home_rate: f64, away_rate: f64, scoregrid: &mut Matrix<f64>) {
    assert!(
        scoregrid.rows() <= factorial::MAX_N as usize + 1 && scoregrid.cols() <= factorial::MAX_N as usize + 1,
        "a {}x{} scoregrid exceeds the factorial limit",
        scoregrid.rows(),
        scoregrid.cols()
    );
    let factorial = factorial::Lookup::default();
    let mut home_probs = vec![0.0; scoregrid.rows()];
    let mut away_probs = vec![0.0; scoregrid.cols()];
    poisson::fill_univariate(home_rate, &factorial, &mut home_probs);
    poisson::fill_univariate(away_rate, &factorial, &mut away_probs);
    for (home_goals, home_prob) in home_probs.iter().enumerate() {
        for (away_goals, away_prob) in away_probs.iter().enumerate() {
            scoregrid[(home_goals, away_goals)] = home_prob * away_prob;
        }
    }
}

/// Total probability mass captured by the matrix.
pub fn coverage(scoregrid: &Matrix<f64>) -> f64 {
    scoregrid.flatten().iter().sum()
}

impl Outcome {
    /// Sums the cells of `scoregrid` that belong to this outcome.
    pub fn gather(&self, scoregrid: &Matrix<f64>) -> f64 {
        match self {
            Outcome::Win(side) => Self::gather_win(side, scoregrid),
            Outcome::Draw => Self::gather_draw(scoregrid),
        }
    }

    fn gather_win(side: &Side, scoregrid: &Matrix<f64>) -> f64 {
        let mut prob = 0.0;
        match side {
            Side::Home => {
                for row in 1..scoregrid.rows() {
                    for col in 0..row.min(scoregrid.cols()) {
                        prob += scoregrid[(row, col)];
                    }
                }
            }
            Side::Away => {
                for col in 1..scoregrid.cols() {
                    for row in 0..col.min(scoregrid.rows()) {
                        prob += scoregrid[(row, col)];
                    }
                }
            }
        }
        prob
    }

    fn gather_draw(scoregrid: &Matrix<f64>) -> f64 {
        let mut prob = 0.0;
        for index in 0..scoregrid.rows().min(scoregrid.cols()) {
            prob += scoregrid[(index, index)];
        }
        prob
    }
}
