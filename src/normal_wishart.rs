extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;
use serde::{Serialize, Deserialize};

use rand::prelude::*;

use crate::error::*;
use crate::linalg_utils::*;
use crate::params::*;
use crate::rand_utils::*;
use crate::wishart::*;

///Fixed hyperparameters of the Normal-Wishart hyperprior over the
///mean and precision of the latent vectors. `wi` is the *inverse* of the
///Wishart scale matrix.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WishartPriorParameters {
    pub mu0 : Array1<f64>,
    ///Pseudo-observation count attached to `mu0`
    pub b0 : f64,
    pub wi : Array2<f64>,
    pub df : f64
}

///The mean and precision of the Gaussian prior which every latent vector
///is drawn from during one sampling round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriorState {
    pub mean : Array1<f64>,
    pub precision : Array2<f64>
}

impl PriorState {
    ///The state a prior starts out in before its first update:
    ///zero mean and a tight isotropic precision.
    pub fn initial(num_latent : usize) -> PriorState {
        let mut precision : Array2<f64> = Array::eye(num_latent);
        precision *= INITIAL_PRECISION_MULTIPLIER;
        PriorState {
            mean : Array::zeros((num_latent,)),
            precision
        }
    }

    pub fn num_latent(&self) -> usize {
        self.mean.len()
    }
}

impl WishartPriorParameters {
    ///The standard uninformative choice: zero prior mean with two pseudo-observations,
    ///identity inverse scale and `num_latent` degrees of freedom.
    pub fn standard(num_latent : usize) -> WishartPriorParameters {
        WishartPriorParameters {
            mu0 : Array::zeros((num_latent,)),
            b0 : PRIOR_PSEUDO_COUNT,
            wi : Array::eye(num_latent),
            df : num_latent as f64
        }
    }

    pub fn num_latent(&self) -> usize {
        self.mu0.len()
    }

    pub fn validate(&self) -> SamplerResult<()> {
        let num_latent = self.num_latent();
        check_square(self.wi.view(), num_latent, "Wishart inverse scale matrix")?;
        if (!(self.b0 > 0.0f64)) {
            return Err(SamplerError::InvalidHyperparameter(format!("b0 must be positive, got {}", self.b0)));
        }
        if (!(self.df > (num_latent as f64) - 1.0f64)) {
            return Err(SamplerError::InvalidHyperparameter(
                format!("degrees of freedom {} too small for {} latent dimensions", self.df, num_latent)));
        }
        Ok(())
    }

    ///Draws a new [`PriorState`] from the Normal-Wishart posterior given the columns of `factors`.
    pub fn update<R : Rng>(&self, rng : &mut R, factors : ArrayView2<f64>) -> SamplerResult<PriorState> {
        cond_normal_wishart(rng, factors, self.mu0.view(), self.b0, &self.wi, self.df)
    }
}

///Draws `precision ~ Wishart(scale, df)` and then `mean ~ N(mu, (kappa * precision)^{-1})`.
pub fn normal_wishart<R : Rng>(rng : &mut R, mu : Array1<f64>, kappa : f64,
                               scale : Array2<f64>, df : f64) -> SamplerResult<PriorState> {
    let wishart = Wishart::new(scale, df)?;
    let precision = wishart.sample(rng)?;

    let scaled_precision = kappa * &precision;
    let offset = mvnormal_prec(rng, &scaled_precision, 1)?;

    let mut mean = mu;
    mean += &offset.column(0);

    Ok(PriorState {
        mean,
        precision
    })
}

///Samples the mean and precision of the latent vectors from the conditional
///Normal-Wishart posterior, given the current latent vectors (the columns of `factors`)
///and the hyperprior `(mu0, b0, wi, df)`.
pub fn cond_normal_wishart<R : Rng>(rng : &mut R, factors : ArrayView2<f64>, mu0 : ArrayView1<f64>,
                                    b0 : f64, wi : &Array2<f64>, df : f64) -> SamplerResult<PriorState> {
    let num_latent = factors.shape()[0];
    let N = factors.shape()[1];
    if (N == 0) {
        return Err(SamplerError::dims("Normal-Wishart update with no latent vectors", 1, 0));
    }
    if (mu0.len() != num_latent) {
        return Err(SamplerError::dims("Normal-Wishart prior mean", num_latent, mu0.len()));
    }
    check_square(wi.view(), num_latent, "Wishart inverse scale matrix")?;

    let n = N as f64;
    let u_bar = column_mean(factors);
    let S = scatter(factors, u_bar.view());

    let mut mu_c = b0 * &mu0;
    mu_c.scaled_add(n, &u_bar);
    mu_c /= b0 + n;

    let b_c = b0 + n;

    let mu_diff = &mu0 - &u_bar;
    let mut inv_scale = wi + &S;
    inv_scale.scaled_add((b0 * n) / (b0 + n), &outer(mu_diff.view(), mu_diff.view()));
    let scale_c = inverse_spd(&inv_scale, "posterior Wishart inverse scale")?;

    let df_c = df + n;

    trace!("Normal-Wishart posterior over {} vectors: b_c = {}, df_c = {}", N, b_c, df_c);

    normal_wishart(rng, mu_c, b_c, scale_c, df_c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn initial_state_is_zero_mean_tight_precision() {
        let state = PriorState::initial(3);
        assert_eq!(state.num_latent(), 3);
        assert_equal_vectors(&state.mean, &Array::zeros((3,)));
        let expected : Array2<f64> = Array::eye(3) * 10.0;
        assert_equal_matrices(&state.precision, &expected);
    }

    #[test]
    fn update_is_reproducible_with_fixed_seed() {
        let mut data_rng = seeded_rng(41);
        let factors = random_matrix(&mut data_rng, 4, 30);
        let params = WishartPriorParameters::standard(4);

        let first = params.update(&mut seeded_rng(99), factors.view()).unwrap();
        let second = params.update(&mut seeded_rng(99), factors.view()).unwrap();
        assert_eq!(first, second);

        let third = params.update(&mut seeded_rng(100), factors.view()).unwrap();
        assert_ne!(first, third);
    }

    #[test]
    fn posterior_concentrates_on_empirical_moments() {
        let num_latent = 2;
        let num_vectors = 5000;
        let mut rng = seeded_rng(42);

        let true_mean = array![1.0, -2.0];
        let true_precision = array![[4.0, 1.0], [1.0, 2.0]];
        let mut factors = mvnormal_prec(&mut rng, &true_precision, num_vectors).unwrap();
        factors += &true_mean.view().insert_axis(Axis(1));

        let params = WishartPriorParameters::standard(num_latent);
        let state = params.update(&mut rng, factors.view()).unwrap();

        for i in 0..num_latent {
            assert!((state.mean[[i,]] - true_mean[[i,]]).abs() < 0.1, "mean {}", state.mean);
        }
        assert_equal_matrices_to_within(&state.precision, &true_precision, 0.6);
    }

    #[test]
    fn posterior_precision_is_symmetric_positive_definite() {
        let mut rng = seeded_rng(43);
        let factors = random_matrix(&mut rng, 5, 3);
        let params = WishartPriorParameters::standard(5);
        let state = params.update(&mut rng, factors.view()).unwrap();
        assert_equal_matrices(&state.precision, &state.precision.t().to_owned());
        assert!(CholeskyFactor::new(&state.precision, "posterior precision").is_ok());
    }

    #[test]
    fn empty_factor_matrix_is_rejected() {
        let mut rng = seeded_rng(44);
        let factors : Array2<f64> = Array::zeros((3, 0));
        let params = WishartPriorParameters::standard(3);
        match (params.update(&mut rng, factors.view())) {
            Result::Err(SamplerError::DimensionMismatch { .. }) => {},
            other => panic!("unexpected result {:?}", other)
        }
    }

    #[test]
    fn standard_parameters_validate() {
        assert!(WishartPriorParameters::standard(6).validate().is_ok());
        let mut bad = WishartPriorParameters::standard(6);
        bad.df = 2.0;
        assert!(bad.validate().is_err());
    }
}
