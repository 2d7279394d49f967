extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;
use ndarray_rand::RandomExt;
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use crate::params::*;
use crate::sparse_matrix::*;

pub fn seeded_rng(seed : u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn assert_equal_matrices(one : &Array2<f64>, two : &Array2<f64>) {
    assert_equal_matrices_to_within(one, two, DEFAULT_TEST_THRESH);
}

pub fn assert_equal_matrices_to_within(one : &Array2<f64>, two : &Array2<f64>, thresh : f64) {
    assert_eq!(one.shape(), two.shape());
    let diff = one - two;
    let frob_norm = diff.iter().map(|x| x * x).sum::<f64>().sqrt();
    if (frob_norm > thresh) {
        panic!("matrices differ by {} (threshold {}):\n{}\n{}", frob_norm, thresh, one, two);
    }
}

pub fn assert_equal_vectors(one : &Array1<f64>, two : &Array1<f64>) {
    assert_eq!(one.len(), two.len());
    let diff = one - two;
    let norm = diff.dot(&diff).sqrt();
    if (norm > DEFAULT_TEST_THRESH) {
        panic!("vectors differ by {}:\n{}\n{}", norm, one, two);
    }
}

pub fn random_vector<R : Rng>(rng : &mut R, t : usize) -> Array1<f64> {
    Array::random_using((t,), StandardNormal, rng)
}

pub fn random_matrix<R : Rng>(rng : &mut R, t : usize, s : usize) -> Array2<f64> {
    Array::random_using((t, s), StandardNormal, rng)
}

///A well-conditioned random symmetric positive definite matrix.
pub fn random_psd_matrix<R : Rng>(rng : &mut R, t : usize) -> Array2<f64> {
    let a = random_matrix(rng, t, t);
    let mut result = a.dot(&a.t());
    result /= t as f64;
    for i in 0..t {
        result[[i, i]] += 1.0f64;
    }
    result
}

///Builds a [`RatingMatrix`] with roughly `density` of its entries observed,
///generated from a random low rank product so that the values are coherent.
pub fn random_rating_matrix<R : Rng>(rng : &mut R, rows : usize, cols : usize, density : f64) -> RatingMatrix {
    let u = random_matrix(rng, 2, rows);
    let v = random_matrix(rng, 2, cols);
    let mut triplets = Vec::new();
    for i in 0..rows {
        for j in 0..cols {
            let p : f64 = rng.gen();
            if (p < density) {
                let value = u.column(i).dot(&v.column(j)) + 3.0f64;
                triplets.push((i, j, value));
            }
        }
    }
    RatingMatrix::from_triplets(rows, cols, &triplets).unwrap()
}
