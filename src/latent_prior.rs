extern crate ndarray;

use ndarray::*;
use rand::RngCore;

use crate::conditional_sampler;
use crate::error::*;
use crate::normal_wishart::*;
use crate::sparse_matrix::*;

///A hierarchical prior over the latent vectors of one side of the factorization.
///
///A training loop alternates strictly between [`LatentPrior::update_prior`], which
///re-draws the prior's hyperparameters from the current latent vectors, and
///[`LatentPrior::sample_latents`], which re-draws every latent vector under the
///prior as it stood after the update.
pub trait LatentPrior {
    fn num_latent(&self) -> usize;

    ///The mean and precision shared by every row.
    fn prior_state(&self) -> &PriorState;

    ///Per-row offsets to the prior mean (one column per row), if the prior has any.
    fn offsets(&self) -> Option<ArrayView2<'_, f64>>;

    ///Re-draws the prior's hyperparameters given the current `latents`. The new
    ///state replaces the old one as a whole, and only if every step succeeded.
    fn update_prior(&mut self, latents : ArrayView2<f64>, rng : &mut dyn RngCore) -> SamplerResult<()>;

    ///The prior mean used for the latent vector of row `row`.
    fn row_prior_mean(&self, row : usize) -> Array1<f64> {
        let mean = &self.prior_state().mean;
        match (self.offsets()) {
            Some(offsets) => mean + &offsets.column(row),
            None => mean.clone()
        }
    }

    ///Re-draws every column of `latents` in parallel given `observations`
    ///(rows aligned with the columns of `latents`) and the counterpart latent
    ///matrix `other`. See [`conditional_sampler::sample_latents`].
    fn sample_latents(&self, latents : &mut Array2<f64>, observations : &RatingMatrix,
                      mean_value : f64, other : ArrayView2<f64>, alpha : f64,
                      round_seed : u64) -> SamplerResult<()> {
        conditional_sampler::sample_latents(latents, observations, mean_value, other, alpha,
                                            self.prior_state(), self.offsets(), round_seed)
    }
}
