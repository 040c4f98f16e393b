use crate::factorial::Factorial;

/// Probability of exactly `k` events given the mean rate `lambda`.
#[inline]
pub fn univariate(k: u8, lambda: f64, factorial: &impl Factorial) -> f64 {
    lambda.powi(k as i32) * f64::exp(-lambda) / factorial.get(k) as f64
}

/// Fills `probs` with the mass function evaluated at `0..probs.len()`.
pub fn fill_univariate(lambda: f64, factorial: &impl Factorial, probs: &mut [f64]) {
    for (k, prob) in probs.iter_mut().enumerate() {
        *prob = univariate(k as u8, lambda, factorial);
    }
}
