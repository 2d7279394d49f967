extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;
use serde::{Serialize, Deserialize};
use rand::prelude::*;

use crate::error::*;
use crate::latent_prior::*;
use crate::linalg_utils::*;
use crate::normal_wishart::*;
use crate::params::*;
use crate::rand_utils::*;

///Options for the side-information (Macau) prior.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SideInfoConfig {
    ///Ridge penalty on the link matrix `beta`
    pub lambda_beta : f64,
    ///Whether to cache the Gram matrix `F^T F` of the features on construction.
    ///Sampling `beta` currently requires the cache.
    pub precompute_gram : bool
}

impl Default for SideInfoConfig {
    fn default() -> SideInfoConfig {
        SideInfoConfig {
            lambda_beta : DEFAULT_LAMBDA_BETA,
            precompute_gram : true
        }
    }
}

///One joint draw of every hyperparameter of a [`MacauPrior`].
#[derive(Clone, Debug)]
pub struct MacauDraw {
    pub state : PriorState,
    pub beta : Array2<f64>,
    pub uhat : Array2<f64>
}

///The Macau prior: a BPMF prior whose mean is shifted, per row, by a linear
///function of that row's side-information features. Row `n` of the features
///maps to the prior mean `state.mean + beta * F[n, :]^T`.
#[derive(Clone, Debug)]
pub struct MacauPrior {
    pub params : WishartPriorParameters,
    state : PriorState,
    ///One row per entity, one column per feature
    features : Array2<f64>,
    features_gram : Option<Array2<f64>>,
    lambda_beta : f64,
    ///`num_latent x num_features` link matrix
    beta : Array2<f64>,
    ///Always equal to `beta * features^T`; only written alongside `beta`
    uhat : Array2<f64>
}

///Computes the latent offsets `beta * F^T` induced by the link matrix `beta`.
pub fn compute_uhat(features : ArrayView2<f64>, beta : ArrayView2<f64>) -> Array2<f64> {
    beta.dot(&features.t())
}

fn check_lambda_beta(lambda_beta : f64) -> SamplerResult<()> {
    if (!lambda_beta.is_finite() || lambda_beta < 0.0f64) {
        return Err(SamplerError::InvalidHyperparameter(
            format!("lambda_beta must be finite and non-negative, got {}", lambda_beta)));
    }
    Ok(())
}

impl MacauPrior {
    ///Constructs a [`MacauPrior`] with the standard Normal-Wishart hyperparameters,
    ///`beta = 0`, and the given side-information `features` (one row per entity).
    pub fn new(num_latent : usize, features : Array2<f64>, config : &SideInfoConfig) -> SamplerResult<MacauPrior> {
        MacauPrior::with_parameters(WishartPriorParameters::standard(num_latent), features, config)
    }

    pub fn with_parameters(params : WishartPriorParameters, features : Array2<f64>,
                           config : &SideInfoConfig) -> SamplerResult<MacauPrior> {
        params.validate()?;
        check_lambda_beta(config.lambda_beta)?;

        let num_latent = params.num_latent();
        let num_entities = features.shape()[0];
        let num_features = features.shape()[1];

        let features_gram = if (config.precompute_gram) {
            Some(gram(features.view()))
        } else {
            warn!("Side information without a cached Gram matrix: link matrix updates will fail");
            None
        };

        debug!("Macau prior over {} entities with {} features", num_entities, num_features);

        Ok(MacauPrior {
            params,
            state : PriorState::initial(num_latent),
            features,
            features_gram,
            lambda_beta : config.lambda_beta,
            beta : Array::zeros((num_latent, num_features)),
            uhat : Array::zeros((num_latent, num_entities))
        })
    }

    pub fn num_features(&self) -> usize {
        self.features.shape()[1]
    }

    pub fn num_entities(&self) -> usize {
        self.features.shape()[0]
    }

    pub fn features(&self) -> &Array2<f64> {
        &self.features
    }

    pub fn features_gram(&self) -> Option<&Array2<f64>> {
        self.features_gram.as_ref()
    }

    pub fn beta(&self) -> &Array2<f64> {
        &self.beta
    }

    pub fn uhat(&self) -> &Array2<f64> {
        &self.uhat
    }

    pub fn lambda_beta(&self) -> f64 {
        self.lambda_beta
    }

    pub fn set_lambda_beta(&mut self, lambda_beta : f64) -> SamplerResult<()> {
        check_lambda_beta(lambda_beta)?;
        self.lambda_beta = lambda_beta;
        Ok(())
    }

    ///Replaces `beta`, recomputing `uhat` to match.
    pub fn set_beta(&mut self, beta : Array2<f64>) -> SamplerResult<()> {
        if (beta.shape() != self.beta.shape()) {
            return Err(SamplerError::dims("link matrix", self.num_features(), beta.shape()[1]));
        }
        self.uhat = compute_uhat(self.features.view(), beta.view());
        self.beta = beta;
        Ok(())
    }

    ///Draws new hyperparameters given the current `latents` without modifying `self`:
    ///first the mean and precision from the part of `latents` left unexplained by the
    ///side information, then `beta` given that mean and precision.
    pub fn draw<R : Rng>(&self, latents : ArrayView2<f64>, rng : &mut R) -> SamplerResult<MacauDraw> {
        if (latents.shape()[0] != self.params.num_latent()) {
            return Err(SamplerError::dims("latent dimension", self.params.num_latent(), latents.shape()[0]));
        }
        if (latents.shape()[1] != self.num_entities()) {
            return Err(SamplerError::dims("latent vectors", self.num_entities(), latents.shape()[1]));
        }
        let gram = match (&self.features_gram) {
            Some(gram) => gram,
            None => {
                return Err(SamplerError::UnimplementedConfiguration(
                    "sampling the link matrix requires a precomputed feature Gram matrix".to_string()));
            }
        };

        let resid = &latents - &self.uhat;

        //Large link coefficients widen the inverse scale, shrinking the precision
        let mut wi = self.params.wi.clone();
        wi.scaled_add(self.lambda_beta, &self.beta.dot(&self.beta.t()));
        let df = self.params.df + (self.num_features() as f64);

        let state = cond_normal_wishart(rng, resid.view(), self.params.mu0.view(), self.params.b0, &wi, df)?;
        let beta = self.sample_beta(latents, &state, gram, rng)?;
        let uhat = compute_uhat(self.features.view(), beta.view());

        Ok(MacauDraw {
            state,
            beta,
            uhat
        })
    }

    ///Draws `beta` from its conditional posterior given the mean and precision in `state`.
    ///
    ///With `Ft_y = (latents + E1 - mean) F + sqrt(lambda_beta) E2`, where the columns
    ///of `E1` and `E2` are independent `N(0, precision^{-1})` draws, the sample is
    ///`beta = Ft_y (F^T F + lambda_beta I)^{-1}`.
    fn sample_beta<R : Rng>(&self, latents : ArrayView2<f64>, state : &PriorState, gram : &Array2<f64>,
                            rng : &mut R) -> SamplerResult<Array2<f64>> {
        let num_entities = self.num_entities();
        let num_features = self.num_features();

        let precision_factor = CholeskyFactor::new(&state.precision, "latent precision")?;

        let mut target = mvnormal_prec_factored(rng, &precision_factor, num_entities)?;
        target += &latents;
        target -= &state.mean.view().insert_axis(Axis(1));

        let mut Ft_y = target.dot(&self.features);
        let coef_noise = mvnormal_prec_factored(rng, &precision_factor, num_features)?;
        Ft_y.scaled_add(self.lambda_beta.sqrt(), &coef_noise);

        let mut K = gram.clone();
        add_to_diagonal(&mut K, self.lambda_beta);
        let K_factor = CholeskyFactor::new(&K, "side information ridge system")?;

        //K is symmetric, so beta^T = K^{-1} Ft_y^T
        let beta_t = K_factor.solve(&Ft_y.t().to_owned())?;
        Ok(beta_t.t().to_owned())
    }
}

impl LatentPrior for MacauPrior {
    fn num_latent(&self) -> usize {
        self.params.num_latent()
    }

    fn prior_state(&self) -> &PriorState {
        &self.state
    }

    fn offsets(&self) -> Option<ArrayView2<'_, f64>> {
        Some(self.uhat.view())
    }

    fn update_prior(&mut self, latents : ArrayView2<f64>, mut rng : &mut dyn RngCore) -> SamplerResult<()> {
        let draw = self.draw(latents, &mut rng)?;
        debug!("Macau prior updated: |beta|^2 = {}", draw.beta.iter().map(|x| x * x).sum::<f64>());
        self.state = draw.state;
        self.beta = draw.beta;
        self.uhat = draw.uhat;
        Ok(())
    }
}
