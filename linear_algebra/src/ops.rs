use crate::{AlgebraError, Scalar};
use ark_std::{ops::Mul, vec::Vec};
use ndarray::{Array, Array2, ArrayD, ArrayView2, ArrayViewD, Axis, Dimension, Ix2, IxDyn};
use num_traits::{WrappingAdd, WrappingMul, Zero};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

pub fn assert_rank_at_least_2<T>(a: &ArrayViewD<T>) -> Result<(), AlgebraError> {
    if a.ndim() < 2 {
        return Err(AlgebraError::RankTooLow(a.ndim()));
    }
    Ok(())
}

pub fn assert_nd_square<T>(a: &ArrayViewD<T>) -> Result<(), AlgebraError> {
    assert_rank_at_least_2(a)?;
    let shape = a.shape();
    if shape[shape.len() - 2] != shape[shape.len() - 1] {
        return Err(AlgebraError::NotSquare);
    }
    Ok(())
}

/// An array of rank >= 2 seen as a row-major sequence of matrices over its
/// last two axes.
#[derive(Clone, Debug)]
pub struct Stack<'a, T> {
    batch: Vec<usize>,
    dim: (usize, usize),
    matrices: Vec<ArrayView2<'a, T>>,
}

impl<'a, T> Stack<'a, T> {
    pub fn new(a: ArrayViewD<'a, T>) -> Result<Self, AlgebraError> {
        assert_rank_at_least_2(&a)?;
        let shape = a.shape();
        let nd = shape.len();
        let batch = shape[..nd - 2].to_vec();
        let dim = (shape[nd - 2], shape[nd - 1]);

        let mut matrices = Vec::with_capacity(batch.iter().product());
        collect_matrices(a, &mut matrices)?;

        Ok(Self {
            batch,
            dim,
            matrices,
        })
    }

    pub fn batch_shape(&self) -> &[usize] {
        &self.batch
    }

    /// Rows and columns shared by every matrix of the stack.
    pub fn dim(&self) -> (usize, usize) {
        self.dim
    }

    pub fn matrices(&self) -> &[ArrayView2<'a, T>] {
        &self.matrices
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }
}

impl<'a, T: Sync> Stack<'a, T> {
    /// Applies `f` to every matrix and lays the results out under the batch
    /// axes. `inner` is the shape of a single result.
    pub fn try_map<U, D, F>(&self, inner: &[usize], f: F) -> Result<ArrayD<U>, AlgebraError>
    where
        U: Clone + Send,
        D: Dimension,
        F: Fn(&ArrayView2<'a, T>) -> Result<Array<U, D>, AlgebraError> + Send + Sync,
    {
        let parts = cfg_iter!(self.matrices)
            .map(&f)
            .collect::<Result<Vec<_>, _>>()?;

        assemble(&self.batch, inner, parts)
    }
}

fn collect_matrices<'a, T>(
    a: ArrayViewD<'a, T>,
    out: &mut Vec<ArrayView2<'a, T>>,
) -> Result<(), AlgebraError> {
    if a.ndim() == 2 {
        out.push(a.into_dimensionality::<Ix2>()?);
        return Ok(());
    }
    for i in 0..a.len_of(Axis(0)) {
        collect_matrices(a.clone().index_axis_move(Axis(0), i), out)?;
    }
    Ok(())
}

fn assemble<U: Clone, D: Dimension>(
    batch: &[usize],
    inner: &[usize],
    parts: Vec<Array<U, D>>,
) -> Result<ArrayD<U>, AlgebraError> {
    let shape: Vec<usize> = batch.iter().chain(inner).copied().collect();
    let mut data = Vec::with_capacity(shape.iter().product());
    for part in parts.iter() {
        data.extend(part.iter().cloned());
    }
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), data)?)
}

/// Batched matrix product over two stacks of identical batch shape.
pub fn matmul<T: Scalar>(a: &ArrayViewD<T>, b: &ArrayViewD<T>) -> Result<ArrayD<T>, AlgebraError> {
    let lhs = Stack::new(a.view())?;
    let rhs = Stack::new(b.view())?;
    if lhs.batch_shape() != rhs.batch_shape() {
        return Err(AlgebraError::DifferentLengths(lhs.len(), rhs.len()));
    }
    let (n, k) = lhs.dim();
    let (k_rhs, m) = rhs.dim();
    if k != k_rhs {
        return Err(AlgebraError::DifferentLengths(k, k_rhs));
    }

    let parts = cfg_iter!(lhs.matrices)
        .zip(cfg_iter!(rhs.matrices))
        .map(|(x, y)| T::dot(x, y))
        .collect::<Vec<_>>();

    assemble(lhs.batch_shape(), &[n, m], parts)
}

/// Product of two 2-D arrays.
pub fn dot<T: Scalar>(a: &ArrayViewD<T>, b: &ArrayViewD<T>) -> Result<ArrayD<T>, AlgebraError> {
    let a = as_matrix(a)?;
    let b = as_matrix(b)?;
    if a.ncols() != b.nrows() {
        return Err(AlgebraError::DifferentLengths(a.ncols(), b.nrows()));
    }
    Ok(T::dot(&a, &b).into_dyn())
}

fn as_matrix<'a, T>(a: &'a ArrayViewD<T>) -> Result<ArrayView2<'a, T>, AlgebraError> {
    if a.ndim() != 2 {
        return Err(AlgebraError::NotTwoDimensional(a.ndim()));
    }
    Ok(a.view().into_dimensionality::<Ix2>()?)
}

/// Matrix product for element types without a specialized kernel.
pub fn generic_dot<T>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> Array2<T>
where
    T: Clone + Zero + for<'r> Mul<&'r T, Output = T>,
{
    Array2::from_shape_fn((a.nrows(), b.ncols()), |(i, j)| {
        a.row(i)
            .iter()
            .zip(b.column(j))
            .fold(T::zero(), |acc, (x, y)| acc + x.clone() * y)
    })
}

/// Matrix product in two's complement arithmetic: overflowing sums and
/// products wrap around instead of panicking.
pub fn wrapping_dot<T>(a: &ArrayView2<T>, b: &ArrayView2<T>) -> Array2<T>
where
    T: Zero + WrappingAdd + WrappingMul,
{
    Array2::from_shape_fn((a.nrows(), b.ncols()), |(i, j)| {
        a.row(i)
            .iter()
            .zip(b.column(j))
            .fold(T::zero(), |acc, (x, y)| acc.wrapping_add(&x.wrapping_mul(y)))
    })
}

/// Identity matrices with the shape and element type of `a`.
pub fn eye_like<T: Scalar>(a: &ArrayViewD<T>) -> Result<ArrayD<T>, AlgebraError> {
    assert_nd_square(a)?;
    let nd = a.ndim();
    Ok(ArrayD::from_shape_fn(a.raw_dim(), |idx| {
        if idx[nd - 1] == idx[nd - 2] {
            T::one()
        } else {
            T::zero()
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array3};
    use num_bigint::BigInt;

    fn sample_stack() -> Array3<i64> {
        array![[[1, 2], [3, 4]], [[0, 1], [1, 0]], [[2, 0], [0, 2]]]
    }

    #[test]
    fn test_shape_guards() {
        let v = array![1, 2, 3].into_dyn();
        assert!(matches!(
            assert_rank_at_least_2(&v.view()),
            Err(AlgebraError::RankTooLow(1))
        ));

        let wide = array![[1, 2, 3], [1, 2, 2]].into_dyn();
        assert!(assert_rank_at_least_2(&wide.view()).is_ok());
        assert!(matches!(
            assert_nd_square(&wide.view()),
            Err(AlgebraError::NotSquare)
        ));

        let stack = sample_stack().into_dyn();
        assert!(assert_nd_square(&stack.view()).is_ok());
    }

    #[test]
    fn test_stack_order() {
        let a = sample_stack().into_dyn();
        let stack = Stack::new(a.view()).unwrap();

        assert_eq!(stack.batch_shape(), &[3]);
        assert_eq!(stack.dim(), (2, 2));
        assert_eq!(stack.len(), 3);
        assert_eq!(stack.matrices()[1], array![[0, 1], [1, 0]]);
    }

    #[test]
    fn test_nested_batch_roundtrips_through_try_map() {
        let a = ArrayD::from_shape_fn(IxDyn(&[2, 3, 2, 2]), |idx| {
            (idx[0] * 100 + idx[1] * 10 + idx[2] * 2 + idx[3]) as i64
        });
        let stack = Stack::new(a.view()).unwrap();
        assert_eq!(stack.len(), 6);

        let copy = stack.try_map(&[2, 2], |m| Ok(m.to_owned())).unwrap();
        assert_eq!(copy, a);
    }

    #[test]
    fn test_matmul_batched() {
        let a = sample_stack().into_dyn();
        let product = matmul(&a.view(), &a.view()).unwrap();

        let expected = array![[[7, 10], [15, 22]], [[1, 0], [0, 1]], [[4, 0], [0, 4]]];
        assert_eq!(product, expected.into_dyn());
    }

    #[test]
    fn test_matmul_rejects_mismatch() {
        let a = sample_stack().into_dyn();
        let b = array![[1, 2], [3, 4]].into_dyn();
        assert!(matmul(&a.view(), &b.view()).is_err());

        let c = Array3::<i64>::zeros((3, 3, 2)).into_dyn();
        assert!(matches!(
            matmul(&a.view(), &c.view()),
            Err(AlgebraError::DifferentLengths(2, 3))
        ));
    }

    #[test]
    fn test_dot_requires_matrices() {
        let a = sample_stack().into_dyn();
        assert!(matches!(
            dot(&a.view(), &a.view()),
            Err(AlgebraError::NotTwoDimensional(3))
        ));

        let m = array![[1, 2, 3], [4, 5, 6]].into_dyn();
        let n = array![[1], [0], [1]].into_dyn();
        assert_eq!(dot(&m.view(), &n.view()).unwrap(), array![[4], [10]].into_dyn());
        assert!(dot(&m.view(), &m.view()).is_err());
    }

    #[test]
    fn test_generic_dot_object_elements() {
        let a = array![[1, 2], [1, 2]].mapv(BigInt::from);
        let expected = array![[3, 6], [3, 6]].mapv(BigInt::from);
        assert_eq!(generic_dot(&a.view(), &a.view()), expected);
    }

    #[test]
    fn test_wrapping_dot_overflows_silently() {
        let a = array![[i64::MAX, 1], [0, 2]];
        let b = array![[2, 0], [i64::MAX, 1]];
        assert_eq!(
            wrapping_dot(&a.view(), &b.view()),
            array![[i64::MAX - 2, 1], [-2, 2]]
        );

        let small = array![[200u8, 1], [3, 4]];
        assert_eq!(
            wrapping_dot(&small.view(), &small.view()),
            array![[67u8, 204], [100, 19]]
        );
    }

    #[test]
    fn test_eye_like() {
        let a = sample_stack().into_dyn();
        let eye = eye_like(&a.view()).unwrap();
        for m in Stack::new(eye.view()).unwrap().matrices() {
            assert_eq!(m, &array![[1, 0], [0, 1]]);
        }

        let f = array![[2.5f32, 1.0], [0.0, 3.0]].into_dyn();
        assert_eq!(
            eye_like(&f.view()).unwrap(),
            array![[1.0f32, 0.0], [0.0, 1.0]].into_dyn()
        );
    }
}
