extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;

use rayon::prelude::*;

use rand::prelude::*;

use crate::error::*;
use crate::linalg_utils::*;
use crate::normal_wishart::*;
use crate::rand_utils::*;
use crate::sparse_matrix::*;

fn check_alpha(alpha : f64) -> SamplerResult<()> {
    if (!(alpha > 0.0f64) || !alpha.is_finite()) {
        return Err(SamplerError::InvalidHyperparameter(format!("alpha must be positive, got {}", alpha)));
    }
    Ok(())
}

///The Gaussian conditional posterior of one latent vector given its observed
///ratings, the counterpart latent vectors and the prior. Stored in factored form:
///the posterior precision is `factor.lower * factor.upper`, and the posterior mean
///solves `precision * mean = linear_term`.
pub struct ConditionalPosterior {
    pub factor : CholeskyFactor,
    ///`prior_precision * prior_mean + alpha * sum_j (value_j - mean_value) * v_j`
    pub linear_term : Array1<f64>
}

impl ConditionalPosterior {
    ///Accumulates the posterior of row `row_index` of `observations`. `other` holds
    ///one latent vector per column of `observations`, `mean_value` is subtracted from
    ///every observed value, and `alpha` is the precision of the observation noise.
    pub fn new(other : ArrayView2<f64>, row_index : usize, observations : &RatingMatrix,
               mean_value : f64, prior_mean : ArrayView1<f64>, prior_precision : ArrayView2<f64>,
               alpha : f64) -> SamplerResult<ConditionalPosterior> {
        let num_latent = prior_mean.len();
        check_square(prior_precision, num_latent, "prior precision")?;
        check_alpha(alpha)?;
        if (row_index >= observations.rows()) {
            return Err(SamplerError::dims("row index", observations.rows(), row_index));
        }
        if (other.shape()[0] != num_latent) {
            return Err(SamplerError::dims("counterpart latent dimension", num_latent, other.shape()[0]));
        }
        if (other.shape()[1] != observations.cols()) {
            return Err(SamplerError::dims("counterpart latent vectors", observations.cols(), other.shape()[1]));
        }

        //Only the lower triangle is accumulated; the factorization never reads the rest
        let mut MM = prior_precision.to_owned();
        let mut rr : Array1<f64> = Array::zeros((num_latent,));
        for (j, value) in observations.row_entries(row_index) {
            let col = other.column(j);
            add_outer_lower(&mut MM, alpha, col);
            rr.scaled_add(alpha * (value - mean_value), &col);
        }

        let factor = CholeskyFactor::new(&MM, "conditional posterior precision")?;

        rr += &prior_precision.dot(&prior_mean);

        Ok(ConditionalPosterior {
            factor,
            linear_term : rr
        })
    }

    ///The (full, symmetric) posterior precision matrix.
    pub fn precision(&self) -> Array2<f64> {
        self.factor.lower.dot(&self.factor.upper)
    }

    ///The posterior mean, i.e. the draw without its random perturbation.
    pub fn mean(&self) -> SamplerResult<Array1<f64>> {
        self.factor.solve(&self.linear_term)
    }

    ///Draws from `N(mean, precision^{-1})`: one standard normal perturbation
    ///per latent dimension is injected between the two triangular solves.
    pub fn sample<R : Rng + ?Sized>(&self, rng : &mut R) -> SamplerResult<Array1<f64>> {
        let mut rr = self.factor.solve_lower(&self.linear_term)?;
        rr += &generate_standard_normal_random(rng, rr.len());
        self.factor.solve_upper(&rr)
    }
}

///Draws a new latent vector for row `row_index` of `observations` from its
///conditional posterior. See [`ConditionalPosterior::new`] for the arguments.
pub fn sample_row<R : Rng + ?Sized>(rng : &mut R, other : ArrayView2<f64>, row_index : usize,
                                    observations : &RatingMatrix, mean_value : f64,
                                    prior_mean : ArrayView1<f64>, prior_precision : ArrayView2<f64>,
                                    alpha : f64) -> SamplerResult<Array1<f64>> {
    let posterior = ConditionalPosterior::new(other, row_index, observations, mean_value,
                                              prior_mean, prior_precision, alpha)?;
    posterior.sample(rng)
}

///Resamples every column of `latents` in parallel. Column `n` is drawn from the
///conditional posterior of row `n` of `observations` under the prior `N(prior.mean +
///offsets[:, n], prior.precision^{-1})`, where `offsets` defaults to zero.
///
///Each column is an independent unit of work: it reads only `other`, `observations`,
///`prior` and `offsets`, and writes only its own column, and only once its draw succeeded.
///Row `n` uses a generator seeded from `round_seed` and `n`, so the result does not depend
///on how rows are scheduled onto threads. The first failure aborts the round.
pub fn sample_latents(latents : &mut Array2<f64>, observations : &RatingMatrix, mean_value : f64,
                      other : ArrayView2<f64>, alpha : f64, prior : &PriorState,
                      offsets : Option<ArrayView2<f64>>, round_seed : u64) -> SamplerResult<()> {
    let num_latent = prior.num_latent();
    if (latents.shape()[0] != num_latent) {
        return Err(SamplerError::dims("latent dimension", num_latent, latents.shape()[0]));
    }
    if (latents.shape()[1] != observations.rows()) {
        return Err(SamplerError::dims("latent vectors", observations.rows(), latents.shape()[1]));
    }
    if let Some(offsets) = &offsets {
        if (offsets.shape() != latents.shape()) {
            return Err(SamplerError::dims("latent offsets", latents.shape()[1], offsets.shape()[1]));
        }
    }
    check_alpha(alpha)?;

    debug!("Sampling {} latent vectors of dimension {} from {} observations",
           observations.rows(), num_latent, observations.nnz());

    latents.axis_iter_mut(Axis(1))
           .into_par_iter()
           .enumerate()
           .try_for_each(|(n, mut column)| -> SamplerResult<()> {
               let mut rng = row_rng(round_seed, n);
               let row_mean = match (&offsets) {
                   Some(offsets) => &prior.mean + &offsets.column(n),
                   None => prior.mean.clone()
               };
               let new_column = sample_row(&mut rng, other, n, observations, mean_value,
                                           row_mean.view(), prior.precision.view(), alpha)?;
               trace!("Row {}: {} observations", n, observations.row_cols(n).len());
               column.assign(&new_column);
               Ok(())
           })
}
