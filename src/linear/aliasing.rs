//! Detection of aliased columns in a design matrix. A column is aliased if it is a linear
//! combination of the columns preceding it; such a column carries no information that the fit
//! can use and makes the normal equations singular.

use crate::linear::matrix::Matrix;

/// Relative residual norm below which a column is considered aliased.
pub const DEFAULT_TOLERANCE: f64 = 1e-7;

/// Flags the aliased columns of `design` (one observation per row), scanning the columns left to
/// right with modified Gram-Schmidt. An all-zero column is always aliased.
pub fn find_aliased(design: &Matrix<f64>, tolerance: f64) -> Vec<bool> {
    let rows = design.rows();
    let mut basis: Vec<Vec<f64>> = Vec::with_capacity(design.cols());
    let mut aliased = vec![false; design.cols()];
    for (col, flag) in aliased.iter_mut().enumerate() {
        let mut residual = (0..rows).map(|row| design[(row, col)]).collect::<Vec<_>>();
        let norm = euclidean_norm(&residual);
        for unit in &basis {
            let projection = dot(&residual, unit);
            for (element, unit_element) in residual.iter_mut().zip(unit) {
                *element -= projection * unit_element;
            }
        }
        let residual_norm = euclidean_norm(&residual);
        if norm == 0.0 || residual_norm <= tolerance * norm {
            *flag = true;
        } else {
            for element in &mut residual {
                *element /= residual_norm;
            }
            basis.push(residual);
        }
    }
    aliased
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}

#[inline]
fn euclidean_norm(a: &[f64]) -> f64 {
    dot(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design(cols: usize, values: &[f64]) -> Matrix<f64> {
        let mut design = Matrix::allocate(values.len() / cols, cols);
        for (row, regressors) in values.chunks(cols).enumerate() {
            design.row_slice_mut(row).copy_from_slice(regressors);
        }
        design
    }

    #[test]
    #[rustfmt::skip]
    fn full_rank() {
        let design = design(3, &[
            1., 0., 1.,
            1., 1., 0.,
            1., 1., 1.,
            1., 0., 0.,
        ]);
        assert_eq!(vec![false, false, false], find_aliased(&design, DEFAULT_TOLERANCE));
    }

    #[test]
    #[rustfmt::skip]
    fn complementary_dummies() {
        // the third column is the intercept less the second
        let design = design(4, &[
            1., 0., 1., 1.,
            1., 1., 0., 0.,
            1., 1., 0., 1.,
            1., 0., 1., 0.,
        ]);
        assert_eq!(vec![false, false, true, false], find_aliased(&design, DEFAULT_TOLERANCE));
    }

    #[test]
    #[rustfmt::skip]
    fn zero_column() {
        let design = design(2, &[
            1., 0.,
            1., 0.,
        ]);
        assert_eq!(vec![false, true], find_aliased(&design, DEFAULT_TOLERANCE));
    }

    #[test]
    #[rustfmt::skip]
    fn more_columns_than_rows() {
        let design = design(3, &[
            1., 2., 5.,
            1., 3., 7.,
        ]);
        assert_eq!(vec![false, false, true], find_aliased(&design, DEFAULT_TOLERANCE));
    }
}
