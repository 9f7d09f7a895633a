use ark_std::fmt::Debug;
use ndarray::{Array2, ArrayView2, LinalgScalar};
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive, Zero};

use crate::ops::{generic_dot, wrapping_dot};

/// How a scalar type gets multiplied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScalarKind {
    /// Primitive numbers, multiplied with ndarray's kernels. Any stack shape works.
    Numeric,
    /// Boxed values multiplied through a clone-and-accumulate dot.
    /// Only single matrices are supported.
    Object,
}

/// Element type of a dense matrix or of a stack of matrices.
pub trait Scalar: 'static + Clone + Debug + PartialEq + Zero + One + Send + Sync {
    const KIND: ScalarKind;

    /// Floating type produced when the matrix gets inverted.
    type Real: RealScalar;

    fn to_real(&self) -> Option<Self::Real>;

    /// 2-D matrix product. Shapes are checked by the caller.
    fn dot(a: &ArrayView2<Self>, b: &ArrayView2<Self>) -> Array2<Self>;
}

/// Scalars that the delegated decompositions operate on.
pub trait RealScalar: Scalar<Real = Self> + nalgebra::RealField + Copy {
    /// Distance from 1.0 to the next representable value.
    const EPSILON: Self;
}

macro_rules! numeric_scalar {
    ($real:ty, $kernel:ident => $($t:ty),+) => {
        $(
            impl Scalar for $t {
                const KIND: ScalarKind = ScalarKind::Numeric;
                type Real = $real;

                #[inline]
                fn to_real(&self) -> Option<$real> {
                    Some(*self as $real)
                }

                #[inline]
                fn dot(a: &ArrayView2<Self>, b: &ArrayView2<Self>) -> Array2<Self> {
                    $kernel(a, b)
                }
            }
        )+
    };
}

#[inline]
fn float_dot<T: LinalgScalar>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> Array2<T> {
    a.dot(b)
}

// Integer products wrap around on overflow, in debug and release builds alike.
numeric_scalar!(f64, wrapping_dot => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
numeric_scalar!(f64, float_dot => f64);
numeric_scalar!(f32, float_dot => f32);

impl RealScalar for f64 {
    const EPSILON: Self = f64::EPSILON;
}

impl RealScalar for f32 {
    const EPSILON: Self = f32::EPSILON;
}

impl Scalar for BigInt {
    const KIND: ScalarKind = ScalarKind::Object;
    type Real = f64;

    fn to_real(&self) -> Option<f64> {
        self.to_f64().filter(|r| r.is_finite())
    }

    fn dot(a: &ArrayView2<Self>, b: &ArrayView2<Self>) -> Array2<Self> {
        generic_dot(a, b)
    }
}
