extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;

use rand::prelude::*;
use rand_distr::{ChiSquared, Distribution, StandardNormal};

use crate::error::*;
use crate::linalg_utils::*;

///Wishart distribution over `dim x dim` symmetric positive definite matrices
///with mean `degrees_of_freedom * scale_mat`.
pub struct Wishart {
    pub scale_mat : Array2<f64>,
    pub scale_cholesky_factor : CholeskyFactor,
    pub degrees_of_freedom : f64,
    pub dim : usize
}

impl Wishart {
    pub fn new(scale_mat : Array2<f64>, degrees_of_freedom : f64) -> SamplerResult<Wishart> {
        let dim = scale_mat.shape()[0];
        check_square(scale_mat.view(), dim, "Wishart scale matrix")?;
        //The Bartlett decomposition needs chi-square variates with
        //degrees_of_freedom - (dim - 1) > 0 degrees of freedom
        if (!(degrees_of_freedom > (dim as f64) - 1.0f64)) {
            return Err(SamplerError::InvalidHyperparameter(
                format!("Wishart degrees of freedom {} too small for dimension {}", degrees_of_freedom, dim)));
        }
        let scale_cholesky_factor = CholeskyFactor::new(&scale_mat, "Wishart scale matrix")?;
        Ok(Wishart {
            scale_mat,
            scale_cholesky_factor,
            degrees_of_freedom,
            dim
        })
    }

    pub fn sample<R : Rng + ?Sized>(&self, rng : &mut R) -> SamplerResult<Array2<f64>> {
        let L = self.sample_cholesky_factor(rng)?;
        let result = L.dot(&L.t());
        Ok(result)
    }

    ///Samples the lower Cholesky factor of a Wishart draw.
    pub fn sample_cholesky_factor<R : Rng + ?Sized>(&self, rng : &mut R) -> SamplerResult<Array2<f64>> {
        //Bartlett decomposition, following https://github.com/scipy/scipy/blob/v1.5.1/scipy/stats/_multivariate.py
        //and https://www.math.wustl.edu/~sawyer/hmhandouts/Wishart.pdf:
        //a lower-triangular matrix with standard normal off-diagonal elements
        //and square roots of chi-square variates on the diagonal

        //Off-diagonal elems
        let mut A : Array2<f64> = Array::zeros((self.dim, self.dim));
        for i in 0..self.dim {
            for j in 0..i {
                A[[i, j]] = rng.sample(StandardNormal);
            }
        }
        //Diagonal elems
        for i in 0..self.dim {
            let chi_dof = self.degrees_of_freedom - (i as f64);
            let chi = ChiSquared::new(chi_dof).map_err(|_| SamplerError::InvalidHyperparameter(
                format!("chi-square degrees of freedom {} must be positive", chi_dof)))?;
            let chi_sample : f64 = chi.sample(rng);
            A[[i, i]] = chi_sample.sqrt();
        }

        Ok(self.scale_cholesky_factor.lower.dot(&A))
    }
}
