//! Matrix powers and product-chain ordering on top of `densemat-linalg`.

mod chain_order;
mod error;
mod exponent;
mod matrix_power;
mod multi_dot;

pub use chain_order::{chain_order, ChainOrder, MatrixShape};
pub use densemat_linalg::{AlgebraError, Scalar, ScalarKind};
pub use error::{ConversionError, PowerError};
pub use exponent::Exponent;
pub use matrix_power::{matrix_power, Powered};
pub use multi_dot::multi_dot;
