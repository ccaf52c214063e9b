//! Dense 2D frame arrays
//!
//! A minimal row-major matrix used for every frame- and grid-indexed surface in
//! the pipeline: activations `(frame, pitch)`, chroma `(frame, 12)`, grids
//! `(slot, feature)` and square affinity matrices.

use crate::error::AnalysisError;

/// Dense row-major 2D `f32` array indexed by `(row, column)`
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FrameArray {
    data: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl FrameArray {
    /// Array of zeros with the given shape
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Empty array with a fixed column count, ready for [`push_row`](Self::push_row)
    pub fn with_cols(cols: usize) -> Self {
        Self {
            data: Vec::new(),
            rows: 0,
            cols,
        }
    }

    /// Build from a flat row-major buffer
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f32>) -> Result<Self, AnalysisError> {
        if data.len() != rows * cols {
            return Err(AnalysisError::InputShapeMismatch(format!(
                "buffer of {} values cannot be shaped ({}, {})",
                data.len(),
                rows,
                cols
            )));
        }
        Ok(Self { data, rows, cols })
    }

    /// Build from nested rows; every row must have the same length
    pub fn from_rows(rows: &[Vec<f32>]) -> Result<Self, AnalysisError> {
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(AnalysisError::InputShapeMismatch(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    cols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            data,
            rows: rows.len(),
            cols,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when the array has no rows
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Row `i` as a slice
    pub fn row(&self, i: usize) -> &[f32] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Row `i` as a mutable slice
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over rows
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        (0..self.rows).map(move |i| self.row(i))
    }

    /// Value at `(r, c)`
    pub fn get(&self, r: usize, c: usize) -> f32 {
        self.data[r * self.cols + c]
    }

    /// Set value at `(r, c)`
    pub fn set(&mut self, r: usize, c: usize, value: f32) {
        self.data[r * self.cols + c] = value;
    }

    /// Flat row-major view
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Append a row; its length must match the column count
    pub fn push_row(&mut self, row: &[f32]) -> Result<(), AnalysisError> {
        if row.len() != self.cols {
            return Err(AnalysisError::InputShapeMismatch(format!(
                "pushed row has {} columns, expected {}",
                row.len(),
                self.cols
            )));
        }
        self.data.extend_from_slice(row);
        self.rows += 1;
        Ok(())
    }

    /// Copy of columns `[start, end)`
    pub fn slice_cols(&self, start: usize, end: usize) -> FrameArray {
        let end = end.min(self.cols);
        let start = start.min(end);
        let width = end - start;
        let mut data = Vec::with_capacity(self.rows * width);
        for row in self.iter_rows() {
            data.extend_from_slice(&row[start..end]);
        }
        FrameArray {
            data,
            rows: self.rows,
            cols: width,
        }
    }

    /// Elementwise map into a new array
    pub fn map<F: Fn(f32) -> f32>(&self, f: F) -> FrameArray {
        FrameArray {
            data: self.data.iter().map(|&x| f(x)).collect(),
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// Maximum value of each row (0.0 for zero-width rows)
    pub fn row_max(&self) -> Vec<f32> {
        self.iter_rows()
            .map(|row| row.iter().copied().fold(f32::NEG_INFINITY, f32::max))
            .map(|m| if m.is_finite() { m } else { 0.0 })
            .collect()
    }

    /// Column `c` as a new vector
    pub fn column(&self, c: usize) -> Vec<f32> {
        (0..self.rows).map(|r| self.get(r, c)).collect()
    }

    /// Overwrite column `c`
    pub fn set_column(&mut self, c: usize, values: &[f32]) {
        for (r, &v) in values.iter().enumerate().take(self.rows) {
            self.set(r, c, v);
        }
    }
}

/// Index and value of the first maximum, `None` for an empty slice
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best
}

/// Percentile with linear interpolation between closest ranks.
///
/// `p` is in `[0, 100]`. Returns `None` for an empty input.
pub fn percentile(values: &[f32], p: f32) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let rank = (p.clamp(0.0, 100.0) as f64 / 100.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = (rank - lo as f64) as f32;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// L2-normalize in place; vectors with norm <= `eps` are left unchanged
pub fn l2_normalize(values: &mut [f32], eps: f32) {
    let norm = values.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > eps {
        for v in values.iter_mut() {
            *v /= norm;
        }
    }
}

/// Dot product of two equal-length slices
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}
