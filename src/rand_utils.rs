extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;
use ndarray_rand::RandomExt;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::StandardNormal;

use crate::error::*;
use crate::linalg_utils::*;
use crate::params::*;

///Generates a vector of `dims` independent standard normal variates.
pub fn generate_standard_normal_random<R : Rng + ?Sized>(rng : &mut R, dims : usize) -> Array1<f64> {
    let as_vec : Vec<f64> = (0..dims).map(|_| rng.sample(StandardNormal)).collect();
    Array::from(as_vec)
}

///Generates a `rows x cols` matrix of independent standard normal variates.
pub fn generate_standard_normal_matrix<R : Rng>(rng : &mut R, rows : usize, cols : usize) -> Array2<f64> {
    Array::random_using((rows, cols), StandardNormal, rng)
}

///Draws `count` independent samples from `N(0, precision^{-1})`, one per column
///of the result.
pub fn mvnormal_prec<R : Rng>(rng : &mut R, precision : &Array2<f64>, count : usize) -> SamplerResult<Array2<f64>> {
    let factor = CholeskyFactor::new(precision, "multivariate normal precision")?;
    mvnormal_prec_factored(rng, &factor, count)
}

///As [`mvnormal_prec`], for a precision matrix which has already been factorized.
///If `precision = L L^T` and `z ~ N(0, I)` then `L^{-T} z ~ N(0, precision^{-1})`.
pub fn mvnormal_prec_factored<R : Rng>(rng : &mut R, factor : &CholeskyFactor, count : usize) -> SamplerResult<Array2<f64>> {
    let z = generate_standard_normal_matrix(rng, factor.dim(), count);
    factor.solve_upper(&z)
}

///Seed for the generator of row `row` in a sampling round seeded with `round_seed`.
pub fn row_seed(round_seed : u64, row : usize) -> u64 {
    round_seed.wrapping_add((row as u64).wrapping_mul(ROW_SEED_STRIDE))
}

///Independent generator for one row of a parallel sampling round. Rows
///never share a generator, so results do not depend on thread scheduling.
pub fn row_rng(round_seed : u64, row : usize) -> StdRng {
    StdRng::seed_from_u64(row_seed(round_seed, row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn mvnormal_prec_has_inverse_precision_covariance() {
        let mut rng = seeded_rng(21);
        let precision = random_psd_matrix(&mut rng, 3);
        let covariance = inverse_spd(&precision, "test").unwrap();

        let num_samps = 20000;
        let samples = mvnormal_prec(&mut rng, &precision, num_samps).unwrap();
        let mean = column_mean(samples.view());
        let mut empirical = samples.dot(&samples.t());
        empirical /= num_samps as f64;

        for i in 0..3 {
            assert!(mean[[i,]].abs() < 0.05, "mean {} too far from zero", mean);
        }
        assert_equal_matrices_to_within(&empirical, &covariance, 0.1);
    }

    #[test]
    fn mvnormal_prec_rejects_indefinite_precision() {
        let mut rng = seeded_rng(22);
        let mut precision : Array2<f64> = Array::eye(2);
        precision[[0, 0]] = -1.0;
        let result = mvnormal_prec(&mut rng, &precision, 4);
        assert!(result.unwrap_err().is_degenerate());
    }

    #[test]
    fn row_rngs_are_reproducible_and_distinct() {
        let mut first = row_rng(7, 3);
        let mut again = row_rng(7, 3);
        let mut other = row_rng(7, 4);
        let a : u64 = first.gen();
        let b : u64 = again.gen();
        let c : u64 = other.gen();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
