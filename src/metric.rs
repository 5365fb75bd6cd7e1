//! Euclidean distance helpers for finite metric spaces.

use ndarray::{Array2, ArrayBase, Data, Ix2};

use crate::float::Float;

/// Matrix of pairwise Euclidean distances between the rows of `x`.
pub fn pairwise_distances<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Array2<F> {
    let n = x.nrows();
    let mut distances = Array2::zeros((n, n));

    for i in 0..n {
        for j in (i + 1)..n {
            let dist = row_distance(x, i, x, j);
            distances[(i, j)] = dist;
            distances[(j, i)] = dist;
        }
    }

    distances
}

/// Matrix of Euclidean distances between the rows of `x` and the rows of `y`.
pub fn cross_distances<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    y: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> Array2<F> {
    let mut distances = Array2::zeros((x.nrows(), y.nrows()));

    for i in 0..x.nrows() {
        for j in 0..y.nrows() {
            distances[(i, j)] = row_distance(x, i, y, j);
        }
    }

    distances
}

/// Diameter of a point cloud, i.e. its largest pairwise distance.
pub fn diameter<F: Float>(x: &ArrayBase<impl Data<Elem = F>, Ix2>) -> F {
    let mut max = F::zero();

    for i in 0..x.nrows() {
        for j in (i + 1)..x.nrows() {
            max = max.max(row_distance(x, i, x, j));
        }
    }

    max
}

/// Hausdorff distance between two finite point clouds.
///
/// The clouds must share the dimensionality of their ambient space but may
/// differ in cardinality.
pub fn hausdorff_distance<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    y: &ArrayBase<impl Data<Elem = F>, Ix2>,
) -> F {
    let distances = cross_distances(x, y);

    let d_xy = distances
        .rows()
        .into_iter()
        .map(|row| row.iter().cloned().fold(F::infinity(), F::min))
        .fold(F::zero(), F::max);

    let d_yx = distances
        .columns()
        .into_iter()
        .map(|col| col.iter().cloned().fold(F::infinity(), F::min))
        .fold(F::zero(), F::max);

    d_xy.max(d_yx)
}

fn row_distance<F: Float>(
    x: &ArrayBase<impl Data<Elem = F>, Ix2>,
    i: usize,
    y: &ArrayBase<impl Data<Elem = F>, Ix2>,
    j: usize,
) -> F {
    x.row(i)
        .iter()
        .zip(y.row(j).iter())
        .map(|(&a, &b)| (a - b) * (a - b))
        .sum::<F>()
        .sqrt()
}
