use densemat_linalg::AlgebraError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("exponent must be an integer")]
    ToInteger,
    #[error("exponent does not fit in 64 bits")]
    Overflow,
}

#[derive(Error, Debug)]
pub enum PowerError {
    #[error("{0}")]
    Algebra(#[from] AlgebraError),
    #[error("{0}")]
    Exponent(#[from] ConversionError),
    /// Object elements are only multiplied as single 2-D matrices.
    #[error("matrix_power not supported for stacks of object arrays")]
    UnsupportedStack,
}
