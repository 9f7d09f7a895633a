//! Dense matrix primitives over `ndarray`, with decompositions delegated to
//! `nalgebra`.

#[macro_use]
extern crate ark_std;

mod error;
pub mod numeric;
pub mod ops;
pub mod scalar;

pub use error::AlgebraError;
pub use nalgebra::Complex;
pub use numeric::{det, eigvals, inv, matrix_rank, matrix_rank_hermitian, solve};
pub use ops::{assert_nd_square, assert_rank_at_least_2, dot, eye_like, matmul, wrapping_dot, Stack};
pub use scalar::{RealScalar, Scalar, ScalarKind};
