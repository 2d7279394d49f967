extern crate ndarray;
extern crate ndarray_linalg;

use ndarray::*;
use ndarray_linalg::*;

use crate::error::*;

///Computes the outer product `ab^T` of vectors `a` and `b`.
pub fn outer(a : ArrayView1<f64>, b : ArrayView1<f64>) -> Array2<f64> {
    let a_column = a.insert_axis(Axis(1));
    let b_row = b.insert_axis(Axis(0));
    a_column.dot(&b_row)
}

///Adds `alpha * v v^T` to the lower triangle (diagonal included) of `mat`,
///leaving the strict upper triangle untouched.
pub fn add_outer_lower(mat : &mut Array2<f64>, alpha : f64, v : ArrayView1<f64>) {
    let n = v.len();
    for i in 0..n {
        let scaled = alpha * v[[i,]];
        for j in 0..(i + 1) {
            mat[[i, j]] += scaled * v[[j,]];
        }
    }
}

///Computes the Gram matrix `F^T F` of the columns of `f`.
pub fn gram(f : ArrayView2<f64>) -> Array2<f64> {
    f.t().dot(&f)
}

///Adds `value` to every diagonal element of the square matrix `mat`.
pub fn add_to_diagonal(mat : &mut Array2<f64>, value : f64) {
    for elem in mat.diag_mut().iter_mut() {
        *elem += value;
    }
}

///Mean of the columns of `mat`, i.e. a vector with one entry per row.
pub fn column_mean(mat : ArrayView2<f64>) -> Array1<f64> {
    let n = mat.shape()[1];
    let mut result = mat.sum_axis(Axis(1));
    result /= n as f64;
    result
}

///Scatter matrix `sum_n (x_n - mean)(x_n - mean)^T` of the columns of `mat`
///about the given `mean`.
pub fn scatter(mat : ArrayView2<f64>, mean : ArrayView1<f64>) -> Array2<f64> {
    let centered = &mat - &mean.insert_axis(Axis(1));
    centered.dot(&centered.t())
}

///Checks that `mat` is square with side `dim`, reporting `context` otherwise.
pub fn check_square(mat : ArrayView2<f64>, dim : usize, context : &str) -> SamplerResult<()> {
    if (mat.shape()[0] != dim) {
        return Err(SamplerError::dims(context, dim, mat.shape()[0]));
    }
    if (mat.shape()[1] != dim) {
        return Err(SamplerError::dims(context, dim, mat.shape()[1]));
    }
    Ok(())
}

///Lower Cholesky factor `L` of a symmetric positive definite matrix `A = L L^T`,
///together with its transpose, which is kept around for the backward solves.
///Only the lower triangle of the factorized matrix is ever read.
#[derive(Clone, Debug)]
pub struct CholeskyFactor {
    pub lower : Array2<f64>,
    pub upper : Array2<f64>
}

impl CholeskyFactor {
    ///Factorizes `mat`. Fails with [`SamplerError::NumericalDegeneracy`] if `mat`
    ///is not (numerically) positive definite; `context` names the matrix in the error.
    pub fn new<S : Data<Elem = f64>>(mat : &ArrayBase<S, Ix2>, context : &str) -> SamplerResult<CholeskyFactor> {
        let lower = match (mat.cholesky(UPLO::Lower)) {
            Result::Ok(lower) => lower,
            Result::Err(err) => {
                error!("Cholesky factorization of {} failed: {}", context, err);
                return Err(SamplerError::degenerate(context));
            }
        };
        //LAPACK only reports failure through a non-positive pivot, so a NaN
        //slipping through would otherwise poison every later solve
        if (lower.diag().iter().any(|x| !x.is_finite() || *x <= 0.0f64)) {
            error!("Cholesky factor of {} has a non-positive pivot", context);
            return Err(SamplerError::degenerate(context));
        }
        let upper = lower.t().to_owned();
        Ok(CholeskyFactor {
            lower,
            upper
        })
    }

    pub fn dim(&self) -> usize {
        self.lower.shape()[0]
    }

    ///Solves `L x = b`.
    pub fn solve_lower<D : Dimension>(&self, b : &Array<f64, D>) -> SamplerResult<Array<f64, D>>
        where Array2<f64> : SolveTriangular<f64, OwnedRepr<f64>, D> {
        self.lower.solve_triangular(UPLO::Lower, Diag::NonUnit, b)
                  .map_err(|_| SamplerError::degenerate("lower triangular solve"))
    }

    ///Solves `L^T x = b`.
    pub fn solve_upper<D : Dimension>(&self, b : &Array<f64, D>) -> SamplerResult<Array<f64, D>>
        where Array2<f64> : SolveTriangular<f64, OwnedRepr<f64>, D> {
        self.upper.solve_triangular(UPLO::Upper, Diag::NonUnit, b)
                  .map_err(|_| SamplerError::degenerate("upper triangular solve"))
    }

    ///Solves `A x = b` with the forward and backward triangular solves.
    pub fn solve<D : Dimension>(&self, b : &Array<f64, D>) -> SamplerResult<Array<f64, D>>
        where Array2<f64> : SolveTriangular<f64, OwnedRepr<f64>, D> {
        let y = self.solve_lower(b)?;
        self.solve_upper(&y)
    }

    ///Computes `A^{-1}`.
    pub fn inverse(&self) -> SamplerResult<Array2<f64>> {
        let eye : Array2<f64> = Array::eye(self.dim());
        let result = self.solve(&eye)?;
        //Symmetrize away the rounding asymmetry of the two solves
        let sym = 0.5f64 * (&result + &result.t());
        Ok(sym)
    }
}

///Inverts a symmetric positive definite matrix through its Cholesky factorization.
pub fn inverse_spd(mat : &Array2<f64>, context : &str) -> SamplerResult<Array2<f64>> {
    let factor = CholeskyFactor::new(mat, context)?;
    factor.inverse()
}
