//! Gibbs sampling core for **B**ayesian **P**robabilistic **M**atrix **F**actorization,
//! with the **Macau** extension for side information.
//!
//! Given a sparse matrix of observed ratings, the crate draws posterior samples of
//! one latent vector per row under a Gaussian prior whose mean and precision carry a
//! Normal-Wishart hyperprior. The Macau prior additionally shifts each row's prior
//! mean by a linear function of that row's side-information features, and samples
//! the link matrix by Bayesian ridge regression.
//!
//! A training loop alternates, for each side of the factorization, between
//! [`latent_prior::LatentPrior::update_prior`] and
//! [`latent_prior::LatentPrior::sample_latents`]; see [`bpmf_prior::BpmfPrior`] and
//! [`macau_prior::MacauPrior`] for the two available priors, and
//! [`conditional_sampler`] for the per-row sampler they share.
//!
//! Every numerical failure surfaces as an [`error::SamplerError`]. A Cholesky
//! factorization failure is reported as `NumericalDegeneracy` and is never retried.

#![allow(non_snake_case)]
#![allow(unused_parens)]

#[macro_use] extern crate log;

pub mod params;
pub mod error;
pub mod linalg_utils;
pub mod rand_utils;
pub mod wishart;
pub mod normal_wishart;
pub mod sparse_matrix;
pub mod conditional_sampler;
pub mod latent_prior;
pub mod bpmf_prior;
pub mod macau_prior;

#[cfg(test)]
pub mod test_utils;
