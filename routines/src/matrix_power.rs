use densemat_linalg::{
    assert_nd_square, dot, eye_like, inv, matmul, AlgebraError, Scalar, ScalarKind,
};
use ark_std::vec::Vec;
use ndarray::{ArrayBase, ArrayD, Data, Dimension};
use num_integer::Integer;

use crate::{Exponent, PowerError};

/// Result of [`matrix_power`].
///
/// Non-negative exponents keep the element type of the input. Negative ones
/// go through an inversion and therefore produce the floating type
/// [`Scalar::Real`].
#[derive(Clone, Debug, PartialEq)]
pub enum Powered<T: Scalar> {
    Exact(ArrayD<T>),
    Inverted(ArrayD<T::Real>),
}

impl<T: Scalar> Powered<T> {
    pub fn is_inverted(&self) -> bool {
        matches!(self, Self::Inverted(_))
    }

    pub fn exact(self) -> Option<ArrayD<T>> {
        match self {
            Self::Exact(a) => Some(a),
            Self::Inverted(_) => None,
        }
    }

    pub fn inverted(self) -> Option<ArrayD<T::Real>> {
        match self {
            Self::Exact(_) => None,
            Self::Inverted(a) => Some(a),
        }
    }

    /// The power in floating point, whichever way it was computed.
    ///
    /// Returns `None` if an exact element has no real counterpart.
    pub fn into_real(self) -> Option<ArrayD<T::Real>> {
        match self {
            Self::Exact(a) => {
                let vals = a.iter().map(Scalar::to_real).collect::<Option<Vec<_>>>()?;
                ArrayD::from_shape_vec(a.raw_dim(), vals).ok()
            }
            Self::Inverted(a) => Some(a),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Multiply {
    /// Stack-wise product with the element's own kernel.
    Batched,
    /// Single 2-D product, the only shape object elements support.
    Dot,
}

impl Multiply {
    fn select<T: Scalar>(ndim: usize) -> Result<Self, PowerError> {
        match (T::KIND, ndim) {
            (ScalarKind::Numeric, _) => Ok(Self::Batched),
            (ScalarKind::Object, 2) => Ok(Self::Dot),
            (ScalarKind::Object, _) => Err(PowerError::UnsupportedStack),
        }
    }

    fn apply<U: Scalar>(self, a: &ArrayD<U>, b: &ArrayD<U>) -> Result<ArrayD<U>, AlgebraError> {
        match self {
            Self::Batched => matmul(&a.view(), &b.view()),
            Self::Dot => dot(&a.view(), &b.view()),
        }
    }
}

/// Raises a square matrix, or every matrix of a stack, to the integer power `n`.
///
/// `n == 0` yields identities shaped like `a` whatever its contents. A
/// negative `n` inverts `a` first and raises the inverse to `|n|`.
/// Larger powers are computed by repeated squaring, using
/// `floor(log2(n)) + popcount(n) - 1` products.
///
/// Integer elements multiply in wrapping arithmetic, so entries that overflow
/// their type wrap around modulo `2^bits` instead of panicking.
///
/// # Errors
/// - [`AlgebraError::RankTooLow`] or [`AlgebraError::NotSquare`] for
///   malformed input,
/// - [`crate::ConversionError`] when `n` is not an exact integer,
/// - [`PowerError::UnsupportedStack`] for stacks of object elements,
/// - [`AlgebraError::Singular`] when a negative power meets a singular matrix.
pub fn matrix_power<T, S, D, E>(a: &ArrayBase<S, D>, n: E) -> Result<Powered<T>, PowerError>
where
    T: Scalar,
    S: Data<Elem = T>,
    D: Dimension,
    E: Exponent,
{
    let a = a.view().into_dyn();
    assert_nd_square(&a)?;
    let n = n.to_exponent()?;
    let multiply = Multiply::select::<T>(a.ndim())?;

    log::trace!(
        "matrix_power: shape {:?}, n = {}, {:?} multiply",
        a.shape(),
        n,
        multiply
    );

    match n {
        0 => Ok(Powered::Exact(eye_like(&a)?)),
        n if n < 0 => {
            let a_inv = inv(&a)?;
            Ok(Powered::Inverted(binary_power(a_inv, n.unsigned_abs(), multiply)?))
        }
        n => Ok(Powered::Exact(binary_power(
            a.to_owned(),
            n.unsigned_abs(),
            multiply,
        )?)),
    }
}

fn binary_power<U: Scalar>(
    a: ArrayD<U>,
    n: u64,
    multiply: Multiply,
) -> Result<ArrayD<U>, AlgebraError> {
    match n {
        1 => return Ok(a),
        2 => return multiply.apply(&a, &a),
        3 => return multiply.apply(&multiply.apply(&a, &a)?, &a),
        _ => {}
    }

    // Walk the bits of n from the least significant one. z holds a^(2^k) and
    // result collects the powers whose bit is set.
    let mut n = n;
    let mut z: Option<ArrayD<U>> = None;
    let mut result: Option<ArrayD<U>> = None;
    while n > 0 {
        let square = match z.take() {
            None => a.clone(),
            Some(z) => multiply.apply(&z, &z)?,
        };
        let (rest, bit) = n.div_rem(&2);
        n = rest;
        if bit == 1 {
            result = Some(match result.take() {
                None => square.clone(),
                Some(r) => multiply.apply(&r, &square)?,
            });
        }
        z = Some(square);
    }

    match result {
        Some(r) => Ok(r),
        None => eye_like(&a.view()),
    }
}
