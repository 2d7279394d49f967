use serde::{Serialize, Deserialize};

use crate::error::*;

///Sparse matrix of observed ratings in compressed-row form. Rows are
///the entities whose latent vectors are being sampled, columns are the
///counterpart entities. The matrix is immutable once built, and may be
///freely shared between sampling threads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatingMatrix {
    rows : usize,
    cols : usize,
    ///`row_ptr[i]..row_ptr[i + 1]` is the range of entries stored for row `i`
    row_ptr : Vec<usize>,
    col_indices : Vec<usize>,
    values : Vec<f64>
}

impl RatingMatrix {
    ///Builds a matrix of the given shape from `(row, col, value)` triplets,
    ///given in any order. Repeated coordinates have their values summed.
    pub fn from_triplets(rows : usize, cols : usize, triplets : &[(usize, usize, f64)]) -> SamplerResult<RatingMatrix> {
        for &(i, j, _) in triplets.iter() {
            if (i >= rows) {
                return Err(SamplerError::dims("rating row index", rows, i));
            }
            if (j >= cols) {
                return Err(SamplerError::dims("rating column index", cols, j));
            }
        }

        let mut sorted = triplets.to_vec();
        sorted.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_indices = Vec::with_capacity(sorted.len());
        let mut values : Vec<f64> = Vec::with_capacity(sorted.len());
        let mut last : Option<(usize, usize)> = None;

        for (i, j, value) in sorted {
            if (last == Some((i, j))) {
                if let Some(prev) = values.last_mut() {
                    *prev += value;
                }
                continue;
            }
            col_indices.push(j);
            values.push(value);
            row_ptr[i + 1] += 1;
            last = Some((i, j));
        }
        for i in 0..rows {
            row_ptr[i + 1] += row_ptr[i];
        }

        Ok(RatingMatrix {
            rows,
            cols,
            row_ptr,
            col_indices,
            values
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    ///Number of stored (observed) entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn row_cols(&self, row : usize) -> &[usize] {
        &self.col_indices[self.row_ptr[row]..self.row_ptr[row + 1]]
    }

    pub fn row_vals(&self, row : usize) -> &[f64] {
        &self.values[self.row_ptr[row]..self.row_ptr[row + 1]]
    }

    ///Iterates over the `(column, value)` pairs observed in `row`.
    pub fn row_entries(&self, row : usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.row_cols(row).iter().cloned()
            .zip(self.row_vals(row).iter().cloned())
    }

    ///Iterates over all `(row, column, value)` triplets in row-major order.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.rows).flat_map(move |i| {
            self.row_entries(i).map(move |(j, value)| (i, j, value))
        })
    }

    ///The view of the same observations from the counterpart side.
    pub fn transpose(&self) -> RatingMatrix {
        let mut row_ptr = vec![0usize; self.cols + 1];
        for &j in self.col_indices.iter() {
            row_ptr[j + 1] += 1;
        }
        for j in 0..self.cols {
            row_ptr[j + 1] += row_ptr[j];
        }

        let mut next = row_ptr.clone();
        let mut col_indices = vec![0usize; self.nnz()];
        let mut values = vec![0.0f64; self.nnz()];
        for (i, j, value) in self.triplets() {
            let dest = next[j];
            col_indices[dest] = i;
            values[dest] = value;
            next[j] += 1;
        }

        RatingMatrix {
            rows : self.cols,
            cols : self.rows,
            row_ptr,
            col_indices,
            values
        }
    }

    ///Mean of all observed values, used to center ratings before sampling.
    ///Zero for a matrix without observations.
    pub fn mean_value(&self) -> f64 {
        if (self.values.is_empty()) {
            return 0.0f64;
        }
        self.values.iter().sum::<f64>() / (self.values.len() as f64)
    }
}
