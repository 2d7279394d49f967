extern crate ndarray;

use ndarray::*;
use rand::RngCore;

use crate::error::*;
use crate::latent_prior::*;
use crate::normal_wishart::*;

///The plain BPMF prior: every latent vector is drawn from the same Gaussian,
///whose mean and precision carry a Normal-Wishart hyperprior.
#[derive(Clone, Debug)]
pub struct BpmfPrior {
    pub params : WishartPriorParameters,
    state : PriorState
}

impl BpmfPrior {
    ///Constructs a [`BpmfPrior`] with the standard hyperparameters.
    pub fn new(num_latent : usize) -> BpmfPrior {
        BpmfPrior {
            params : WishartPriorParameters::standard(num_latent),
            state : PriorState::initial(num_latent)
        }
    }

    pub fn with_parameters(params : WishartPriorParameters) -> SamplerResult<BpmfPrior> {
        params.validate()?;
        let state = PriorState::initial(params.num_latent());
        Ok(BpmfPrior {
            params,
            state
        })
    }
}

impl LatentPrior for BpmfPrior {
    fn num_latent(&self) -> usize {
        self.params.num_latent()
    }

    fn prior_state(&self) -> &PriorState {
        &self.state
    }

    fn offsets(&self) -> Option<ArrayView2<'_, f64>> {
        None
    }

    fn update_prior(&mut self, latents : ArrayView2<f64>, mut rng : &mut dyn RngCore) -> SamplerResult<()> {
        let state = self.params.update(&mut rng, latents)?;
        debug!("BPMF prior updated from {} latent vectors", latents.shape()[1]);
        self.state = state;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linalg_utils::*;
    use crate::test_utils::*;

    #[test]
    fn update_replaces_initial_state() {
        let mut rng = seeded_rng(61);
        let latents = random_matrix(&mut rng, 3, 40);
        let mut prior = BpmfPrior::new(3);
        let initial = prior.prior_state().clone();

        prior.update_prior(latents.view(), &mut rng).unwrap();
        assert_ne!(prior.prior_state(), &initial);
        assert!(CholeskyFactor::new(&prior.prior_state().precision, "precision").is_ok());
    }

    #[test]
    fn failed_update_keeps_previous_state() {
        let mut rng = seeded_rng(62);
        let mut prior = BpmfPrior::new(3);
        let initial = prior.prior_state().clone();
        let empty : Array2<f64> = Array::zeros((3, 0));
        assert!(prior.update_prior(empty.view(), &mut rng).is_err());
        assert_eq!(prior.prior_state(), &initial);
    }

    #[test]
    fn row_prior_mean_is_shared() {
        let prior = BpmfPrior::new(2);
        assert!(prior.offsets().is_none());
        assert_equal_vectors(&prior.row_prior_mean(0), &prior.prior_state().mean);
        assert_equal_vectors(&prior.row_prior_mean(7), &prior.prior_state().mean);
    }

    #[test]
    fn gibbs_rounds_fit_observed_ratings() {
        let mut rng = seeded_rng(63);
        let ratings = random_rating_matrix(&mut rng, 30, 25, 0.7);
        let ratings_t = ratings.transpose();
        let mean_value = ratings.mean_value();

        let mut u_prior = BpmfPrior::new(2);
        let mut v_prior = BpmfPrior::new(2);
        let mut u = random_matrix(&mut rng, 2, 30);
        let mut v = random_matrix(&mut rng, 2, 25);

        for iter in 0..40u64 {
            u_prior.update_prior(u.view(), &mut rng).unwrap();
            u_prior.sample_latents(&mut u, &ratings, mean_value, v.view(), 10.0, 2 * iter).unwrap();
            v_prior.update_prior(v.view(), &mut rng).unwrap();
            v_prior.sample_latents(&mut v, &ratings_t, mean_value, u.view(), 10.0, 2 * iter + 1).unwrap();
        }

        let mut sq_err = 0.0;
        for (i, j, value) in ratings.triplets() {
            let pred = u.column(i).dot(&v.column(j)) + mean_value;
            sq_err += (pred - value) * (pred - value);
        }
        let rmse = (sq_err / (ratings.nnz() as f64)).sqrt();
        assert!(rmse < 0.6, "training rmse {}", rmse);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut params = WishartPriorParameters::standard(3);
        params.b0 = 0.0;
        assert!(BpmfPrior::with_parameters(params).is_err());
    }

    #[test]
    fn updates_through_trait_object_match_direct_updates() {
        let mut rng = seeded_rng(64);
        let latents = random_matrix(&mut rng, 3, 30);

        let mut direct = BpmfPrior::new(3);
        direct.update_prior(latents.view(), &mut seeded_rng(8)).unwrap();

        let mut boxed : Box<dyn LatentPrior> = Box::new(BpmfPrior::new(3));
        let mut boxed_rng = seeded_rng(8);
        let rng_object : &mut dyn RngCore = &mut boxed_rng;
        boxed.update_prior(latents.view(), rng_object).unwrap();

        assert_eq!(boxed.prior_state(), direct.prior_state());
    }
}
