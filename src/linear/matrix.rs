//! A dense, row-major matrix.

use std::ops::{Index, IndexMut};

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    data: Vec<T>,
    rows: usize,
    cols: usize,
}
impl<T: Default + Clone> Matrix<T> {
    pub fn allocate(rows: usize, cols: usize) -> Self {
        let (len, overflow) = rows.overflowing_mul(cols);
        assert!(!overflow, "allocation of a {rows}x{cols} matrix failed due to overflow");
        let data = vec![T::default(); len];
        Self { data, rows, cols }
    }
}

impl<T> Matrix<T> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn row_slice(&self, row: usize) -> &[T] {
        debug_assert!(self.validate_row_index(row));
        let row_start = row * self.cols;
        &self.data[row_start..(row_start + self.cols)]
    }

    pub fn row_slice_mut(&mut self, row: usize) -> &mut [T] {
        debug_assert!(self.validate_row_index(row));
        let row_start = row * self.cols;
        &mut self.data[row_start..(row_start + self.cols)]
    }

    pub fn flatten(&self) -> &[T] {
        &self.data
    }

    fn validate_row_index(&self, row: usize) -> bool {
        assert!(row < self.rows, "invalid row index {row} for a {}x{} matrix", self.rows, self.cols);
        true
    }

    fn validate_col_index(&self, col: usize) -> bool {
        assert!(col < self.cols, "invalid column index {col} for a {}x{} matrix", self.rows, self.cols);
        true
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: (usize, usize)) -> &Self::Output {
        let (row, col) = index;
        debug_assert!(self.validate_row_index(row));
        debug_assert!(self.validate_col_index(col));
        &self.data[row * self.cols + col]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        let (row, col) = index;
        debug_assert!(self.validate_row_index(row));
        debug_assert!(self.validate_col_index(col));
        &mut self.data[row * self.cols + col]
    }
}

pub struct RowIter<'a, T> {
    matrix: &'a Matrix<T>,
    row: usize,
}

impl<'a, T> Iterator for RowIter<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.row < self.matrix.rows {
            let row_slice = self.matrix.row_slice(self.row);
            self.row += 1;
            Some(row_slice)
        } else {
            None
        }
    }
}

impl<'a, T> IntoIterator for &'a Matrix<T> {
    type Item = &'a [T];
    type IntoIter = RowIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        RowIter { matrix: self, row: 0 }
    }
}

/// Serialized as a sequence of rows.
impl<T: Serialize> Serialize for Matrix<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows))?;
        for row in self {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}
