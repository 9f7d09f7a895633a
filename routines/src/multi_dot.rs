use ark_std::vec::Vec;
use densemat_linalg::{AlgebraError, Scalar};
use ndarray::{Array2, ArrayD, ArrayView2, ArrayViewD, Axis, CowArray, Ix1, Ix2, IxDyn};

use crate::{chain_order, ChainOrder};

/// Multiplies two or more arrays in the cheapest order.
///
/// A 1-D first argument is taken as a row vector and a 1-D last argument as a
/// column vector; the matching result axes are dropped again, so two vector
/// ends give a 0-D result. Every other argument must be 2-D.
pub fn multi_dot<T: Scalar>(arrays: &[ArrayViewD<T>]) -> Result<ArrayD<T>, AlgebraError> {
    let n = arrays.len();
    if n < 2 {
        return Err(AlgebraError::TooFewArrays(n));
    }
    let first_is_vector = arrays[0].ndim() == 1;
    let last_is_vector = arrays[n - 1].ndim() == 1;

    let mut matrices: Vec<ArrayView2<T>> = Vec::with_capacity(n);
    for (i, a) in arrays.iter().enumerate() {
        let m = match a.ndim() {
            1 if i == 0 => a.view().into_dimensionality::<Ix1>()?.insert_axis(Axis(0)),
            1 if i == n - 1 => a.view().into_dimensionality::<Ix1>()?.insert_axis(Axis(1)),
            2 => a.view().into_dimensionality::<Ix2>()?,
            d => return Err(AlgebraError::NotTwoDimensional(d)),
        };
        matrices.push(m);
    }
    for pair in matrices.windows(2) {
        if pair[0].ncols() != pair[1].nrows() {
            return Err(AlgebraError::DifferentLengths(pair[0].ncols(), pair[1].nrows()));
        }
    }

    let result = match n {
        2 => T::dot(&matrices[0], &matrices[1]),
        3 => multi_dot_three(&matrices[0], &matrices[1], &matrices[2]),
        _ => {
            let order = chain_order(&matrices);
            log::trace!("multi_dot: order {}", order.parenthesize());
            multiply_along(&matrices, &order, 0, n - 1).into_owned()
        }
    };

    let (rows, cols) = result.dim();
    let shape = match (first_is_vector, last_is_vector) {
        (true, true) => vec![],
        (true, false) => vec![cols],
        (false, true) => vec![rows],
        (false, false) => vec![rows, cols],
    };
    Ok(result.into_shape(IxDyn(&shape))?)
}

fn multi_dot_three<T: Scalar>(a: &ArrayView2<T>, b: &ArrayView2<T>, c: &ArrayView2<T>) -> Array2<T> {
    let (a0, a1b0) = a.dim();
    let (b1c0, c1) = c.dim();
    // (AB)C
    let cost1 = a0 * b1c0 * (a1b0 + c1);
    // A(BC)
    let cost2 = a1b0 * c1 * (a0 + b1c0);

    if cost1 < cost2 {
        T::dot(&T::dot(a, b).view(), c)
    } else {
        T::dot(a, &T::dot(b, c).view())
    }
}

fn multiply_along<'a, T: Scalar>(
    matrices: &[ArrayView2<'a, T>],
    order: &ChainOrder,
    i: usize,
    j: usize,
) -> CowArray<'a, T, Ix2> {
    if i == j {
        return CowArray::from(matrices[i].clone());
    }
    let k = order.split[[i, j]];
    let lhs = multiply_along(matrices, order, i, k);
    let rhs = multiply_along(matrices, order, k + 1, j);
    CowArray::from(T::dot(&lhs.view(), &rhs.view()))
}
