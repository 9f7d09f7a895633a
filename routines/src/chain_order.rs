use ark_std::{
    string::{String, ToString},
    vec::Vec,
};
use ndarray::{Array2, ArrayBase, Ix2, RawData};
use serde::{Deserialize, Serialize};

/// Anything that can stand for a matrix in a product chain.
pub trait MatrixShape {
    /// `(rows, columns)`
    fn dims(&self) -> (usize, usize);
}

impl<S: RawData> MatrixShape for ArrayBase<S, Ix2> {
    fn dims(&self) -> (usize, usize) {
        self.dim()
    }
}

impl MatrixShape for (usize, usize) {
    fn dims(&self) -> (usize, usize) {
        *self
    }
}

impl<M: MatrixShape + ?Sized> MatrixShape for &M {
    fn dims(&self) -> (usize, usize) {
        (**self).dims()
    }
}

/// Optimal parenthesization of a matrix chain `A_0 A_1 ... A_{n-1}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainOrder {
    /// `split[[i, j]]` is the `k` at which `A_i..A_j` is best computed as
    /// `(A_i..A_k)(A_{k+1}..A_j)`. Only entries with `i < j` are meaningful.
    pub split: Array2<usize>,
    /// `cost[[i, j]]` is the minimal number of scalar multiplications needed
    /// for `A_i..A_j`. Only entries with `i <= j` are meaningful.
    pub cost: Array2<f64>,
}

impl ChainOrder {
    /// Number of matrices in the chain.
    pub fn len(&self) -> usize {
        self.split.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Scalar multiplications needed for the whole chain.
    pub fn total_cost(&self) -> Option<f64> {
        let n = self.len();
        (n > 0).then(|| self.cost[[0, n - 1]])
    }

    pub fn into_split(self) -> Array2<usize> {
        self.split
    }

    pub fn into_parts(self) -> (Array2<usize>, Array2<f64>) {
        (self.split, self.cost)
    }

    /// Renders the order as nested parentheses over `A0..A{n-1}`, e.g.
    /// `((A0(A1A2))((A3A4)A5))`.
    pub fn parenthesize(&self) -> String {
        let mut out = String::new();
        if !self.is_empty() {
            self.write_parens(&mut out, 0, self.len() - 1);
        }
        out
    }

    fn write_parens(&self, out: &mut String, i: usize, j: usize) {
        if i == j {
            out.push('A');
            out.push_str(&i.to_string());
            return;
        }
        let k = self.split[[i, j]];
        out.push('(');
        self.write_parens(out, i, k);
        self.write_parens(out, k + 1, j);
        out.push(')');
    }
}

/// Finds the multiplication order of `arrays` that minimizes the number of
/// scalar multiplications.
///
/// Classic interval dynamic program (Cormen et al., *Introduction to
/// Algorithms*, section 15.2), `O(n^3)` time and `O(n^2)` space. Among
/// equally cheap splits the smallest `k` is kept.
///
/// Only the shapes are read. Consecutive matrices are expected to be
/// conformable, which is not checked here. An empty chain yields an empty
/// order.
pub fn chain_order<M: MatrixShape>(arrays: &[M]) -> ChainOrder {
    let n = arrays.len();
    // A_{10x100}, B_{100x5}, C_{5x50} --> p = [10, 100, 5, 50]
    let p: Vec<f64> = arrays
        .iter()
        .map(|a| a.dims().0)
        .chain(arrays.last().map(|a| a.dims().1))
        .map(|d| d as f64)
        .collect();

    let mut cost = Array2::<f64>::zeros((n, n));
    let mut split = Array2::<usize>::zeros((n, n));

    log::trace!("chain_order: p = {:?}", p);

    for l in 1..n {
        for i in 0..n - l {
            let j = i + l;
            cost[[i, j]] = f64::INFINITY;
            for k in i..j {
                let q = cost[[i, k]] + cost[[k + 1, j]] + p[i] * p[k + 1] * p[j + 1];
                if q < cost[[i, j]] {
                    cost[[i, j]] = q;
                    split[[i, j]] = k;
                }
            }
        }
    }

    log::trace!("chain_order: cost = {:?}", cost);
    log::trace!("chain_order: split = {:?}", split);

    ChainOrder { split, cost }
}
