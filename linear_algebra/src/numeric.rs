//! Decompositions delegated to `nalgebra`.
//!
//! Every routine accepts `ndarray` input of any storage, validates the shape
//! with the guards from [`crate::ops`] and maps over stacks of matrices, so
//! batch axes are preserved in the output.

use crate::{
    ops::{assert_nd_square, Stack},
    AlgebraError, RealScalar, Scalar,
};
use nalgebra::{Complex, ComplexField, DMatrix, DVector};
use ndarray::{arr0, Array1, Array2, ArrayBase, ArrayD, ArrayView2, ArrayViewD, Data, Dimension, Ix2};
use ark_std::vec::Vec;
use num_traits::Zero;

fn to_nalgebra<T: Scalar>(m: &ArrayView2<T>) -> Result<DMatrix<T::Real>, AlgebraError> {
    let vals = m
        .iter()
        .map(|x| x.to_real().ok_or(AlgebraError::NotReal))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DMatrix::from_row_slice(m.nrows(), m.ncols(), &vals))
}

fn from_nalgebra<R: RealScalar>(m: &DMatrix<R>) -> Array2<R> {
    Array2::from_shape_fn(m.shape(), |(i, j)| m[(i, j)])
}

fn square_stack<T>(a: ArrayViewD<'_, T>) -> Result<Stack<'_, T>, AlgebraError> {
    assert_nd_square(&a)?;
    Stack::new(a)
}

/// Inverse of each matrix in `a`.
///
/// Fails with [`AlgebraError::Singular`] as soon as one matrix of the stack
/// cannot be inverted.
pub fn inv<T, S, D>(a: &ArrayBase<S, D>) -> Result<ArrayD<T::Real>, AlgebraError>
where
    T: Scalar,
    S: Data<Elem = T>,
    D: Dimension,
{
    let stack = square_stack(a.view().into_dyn())?;
    let (n, _) = stack.dim();
    stack.try_map(&[n, n], |m| {
        to_nalgebra(m)?
            .try_inverse()
            .map(|m_inv| from_nalgebra(&m_inv))
            .ok_or(AlgebraError::Singular)
    })
}

/// Determinant of each matrix in `a`. The output has the batch shape of `a`.
pub fn det<T, S, D>(a: &ArrayBase<S, D>) -> Result<ArrayD<T::Real>, AlgebraError>
where
    T: Scalar,
    S: Data<Elem = T>,
    D: Dimension,
{
    let stack = square_stack(a.view().into_dyn())?;
    stack.try_map(&[], |m| Ok(arr0(to_nalgebra(m)?.determinant())))
}

/// Eigenvalues of each matrix in `a`, in no particular order.
pub fn eigvals<T, S, D>(a: &ArrayBase<S, D>) -> Result<ArrayD<Complex<T::Real>>, AlgebraError>
where
    T: Scalar,
    S: Data<Elem = T>,
    D: Dimension,
{
    let stack = square_stack(a.view().into_dyn())?;
    let (n, _) = stack.dim();
    stack.try_map(&[n], |m| {
        let ev = to_nalgebra(m)?.complex_eigenvalues();
        Ok(Array1::from_iter(ev.iter().copied()))
    })
}

/// Solves `a x = b` for a square `a`. `b` holds one right-hand side (1-D) or
/// one per column (2-D); `x` has the shape of `b`.
pub fn solve<T, S1, S2, D1, D2>(
    a: &ArrayBase<S1, D1>,
    b: &ArrayBase<S2, D2>,
) -> Result<ArrayD<T::Real>, AlgebraError>
where
    T: Scalar,
    S1: Data<Elem = T>,
    S2: Data<Elem = T>,
    D1: Dimension,
    D2: Dimension,
{
    let a = a.view().into_dyn();
    assert_nd_square(&a)?;
    if a.ndim() != 2 {
        return Err(AlgebraError::NotTwoDimensional(a.ndim()));
    }
    let a = to_nalgebra(&a.into_dimensionality::<Ix2>()?)?;
    let n = a.nrows();

    let b = b.view().into_dyn();
    let rhs = match b.ndim() {
        1 => {
            let vals = b
                .iter()
                .map(|x| x.to_real().ok_or(AlgebraError::NotReal))
                .collect::<Result<Vec<_>, _>>()?;
            DMatrix::from_column_slice(vals.len(), 1, &vals)
        }
        2 => to_nalgebra(&b.view().into_dimensionality::<Ix2>()?)?,
        d => return Err(AlgebraError::NotTwoDimensional(d)),
    };
    if rhs.nrows() != n {
        return Err(AlgebraError::DifferentLengths(n, rhs.nrows()));
    }

    let x = a.lu().solve(&rhs).ok_or(AlgebraError::Singular)?;

    if b.ndim() == 1 {
        Ok(Array1::from_iter(x.iter().copied()).into_dyn())
    } else {
        Ok(from_nalgebra(&x).into_dyn())
    }
}

/// Rank of each matrix in `a` from its singular values.
///
/// A singular value counts when it exceeds `s_max * max(M, N) * eps`.
/// A 1-D input has rank 1 unless all of its elements are zero.
pub fn matrix_rank<T, S, D>(a: &ArrayBase<S, D>) -> Result<ArrayD<usize>, AlgebraError>
where
    T: Scalar,
    S: Data<Elem = T>,
    D: Dimension,
{
    rank_with(a.view().into_dyn(), |m: DMatrix<T::Real>| m.singular_values())
}

/// Same as [`matrix_rank`] for symmetric matrices, using the absolute
/// eigenvalues in place of the singular values.
pub fn matrix_rank_hermitian<T, S, D>(a: &ArrayBase<S, D>) -> Result<ArrayD<usize>, AlgebraError>
where
    T: Scalar,
    S: Data<Elem = T>,
    D: Dimension,
{
    let a = a.view().into_dyn();
    if a.ndim() >= 2 {
        assert_nd_square(&a)?;
    }
    rank_with(a, |m: DMatrix<T::Real>| {
        m.symmetric_eigenvalues().map(|x| ComplexField::abs(x))
    })
}

fn rank_with<T, F>(a: ArrayViewD<T>, spectrum: F) -> Result<ArrayD<usize>, AlgebraError>
where
    T: Scalar,
    F: Fn(DMatrix<T::Real>) -> DVector<T::Real> + Send + Sync,
{
    if a.ndim() < 2 {
        let nonzero = a.iter().any(|x| !x.is_zero());
        return Ok(arr0(usize::from(nonzero)).into_dyn());
    }

    let stack = Stack::new(a)?;
    let (rows, cols) = stack.dim();
    stack.try_map(&[], |m| {
        let s = spectrum(to_nalgebra(m)?);
        let s_max = s
            .iter()
            .copied()
            .fold(T::Real::zero(), |acc, x| if x > acc { x } else { acc });
        let size: T::Real = nalgebra::convert(rows.max(cols) as f64);
        let tol = s_max * size * T::Real::EPSILON;
        Ok(arr0(s.iter().filter(|&&x| x > tol).count()))
    })
}
