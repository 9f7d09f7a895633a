use ndarray::ShapeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AlgebraError {
    /// Fail due to operations on structures of unexpected differing lengths.
    #[error("Unexpected different lengths: {0} and {1}")]
    DifferentLengths(usize, usize),
    #[error("{0}-dimensional array given. Array must be at least two-dimensional")]
    RankTooLow(usize),
    #[error("{0}-dimensional array given. Array must be two-dimensional")]
    NotTwoDimensional(usize),
    #[error("Last 2 dimensions of the array must be square")]
    NotSquare,
    #[error("Singular matrix")]
    Singular,
    /// An element has no finite floating-point counterpart.
    #[error("Element cannot be represented as a real number")]
    NotReal,
    #[error("{0} array(s) given. Expecting at least two arrays")]
    TooFewArrays(usize),
    #[error("{0}")]
    Shape(#[from] ShapeError),
}
