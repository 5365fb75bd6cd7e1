use std::iter::Sum;
use std::ops::AddAssign;

use ndarray::NdFloat;
use num_traits::{FromPrimitive, NumAssignOps, NumCast, Signed};

/// Floating point numbers the condensation scheme operates on.
///
/// This provides a stable ABI over `f32` and `f64`, carrying all bounds
/// required by the distance, kernel and eigendecomposition routines.
pub trait Float:
    NdFloat
    + FromPrimitive
    + Default
    + Signed
    + Sum
    + NumAssignOps
    + for<'a> AddAssign<&'a Self>
    + approx::AbsDiffEq<Epsilon = Self>
{
    /// Cast a numeric value, panicking only on values that cannot be
    /// represented at all (e.g. NaN to integer types).
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}
impl Float for f64 {}
