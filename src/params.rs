//Prior defaults for the Normal-Wishart hyperprior
//
//Pseudo-observation count attached to the prior mean `mu0`
pub const PRIOR_PSEUDO_COUNT : f64 = 2.0f64;
//The latent precision starts out tight, so that the first sampling round
//stays close to the initial latent matrix
pub const INITIAL_PRECISION_MULTIPLIER : f64 = 10.0f64;

//Side information defaults
//
//Ridge penalty on the link matrix. Larger values shrink the side-information offsets.
pub const DEFAULT_LAMBDA_BETA : f64 = 5.0f64;

//Parallel sampling constants
//
//Stride between the seeds of consecutive rows' random number generators
pub const ROW_SEED_STRIDE : u64 = 0x9E37_79B9_7F4A_7C15u64;

//Numerical tolerances used by tests and sanity checks
pub const ZEROING_THRESH : f64 = 1e-9f64;

pub const DEFAULT_TEST_THRESH : f64 = 1e-6f64;
