use thiserror::Error;

///Failures of the sampling core. None of these are transient: the
///owning training loop decides whether to abort or restart the run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SamplerError {
    ///A matrix which should have been symmetric positive definite
    ///could not be Cholesky-factorized.
    #[error("numerical degeneracy: Cholesky factorization of {context} failed")]
    NumericalDegeneracy { context : String },
    #[error("unimplemented configuration: {0}")]
    UnimplementedConfiguration(String),
    #[error("dimension mismatch in {context}: expected {expected}, found {found}")]
    DimensionMismatch {
        context : String,
        expected : usize,
        found : usize
    },
    #[error("invalid hyperparameter: {0}")]
    InvalidHyperparameter(String)
}

impl SamplerError {
    pub fn degenerate(context : &str) -> SamplerError {
        SamplerError::NumericalDegeneracy {
            context : context.to_string()
        }
    }

    pub fn dims(context : &str, expected : usize, found : usize) -> SamplerError {
        SamplerError::DimensionMismatch {
            context : context.to_string(),
            expected,
            found
        }
    }

    ///Whether this error came from a failed factorization, as opposed to
    ///a misconfigured caller.
    pub fn is_degenerate(&self) -> bool {
        match (self) {
            SamplerError::NumericalDegeneracy { .. } => true,
            _ => false
        }
    }
}

pub type SamplerResult<T> = Result<T, SamplerError>;
