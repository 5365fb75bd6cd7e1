//! Kernel functions for the diffusion operator.
//!
//! Every kernel maps a pairwise distance and a bandwidth `epsilon` to an
//! affinity in `[0, 1]`. Row-normalising the resulting affinity matrix
//! yields the diffusion operator of a single condensation step.

use std::str::FromStr;

use ndarray::Array2;

use crate::error::Error;
use crate::float::Float;

/// The distance-to-affinity function used when building the diffusion
/// operator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelMethod<F> {
    /// Gaussian kernel `exp(-(d / eps)^2)`
    Gaussian,
    /// Laplacian kernel `exp(-d / eps)`
    Laplacian,
    /// Alpha-decaying kernel `exp(-(d / eps)^decay)`, sharpening the
    /// neighbourhood boundary for larger decay values
    Alpha(F),
    /// Indicator of the `eps`-neighbourhood
    Box,
    /// Constant affinity, turning the operator into a plain average
    Constant,
}

impl<F: Float> KernelMethod<F> {
    /// Affinity of a single pairwise distance.
    pub fn weight(&self, dist: F, epsilon: F) -> F {
        match *self {
            KernelMethod::Gaussian => (-(dist / epsilon).powi(2)).exp(),
            KernelMethod::Laplacian => (-dist / epsilon).exp(),
            KernelMethod::Alpha(decay) => (-(dist / epsilon).powf(decay)).exp(),
            KernelMethod::Box => {
                if dist <= epsilon {
                    F::one()
                } else {
                    F::zero()
                }
            }
            KernelMethod::Constant => F::one(),
        }
    }

    /// Evaluate the kernel elementwise on a pairwise distance matrix.
    pub fn apply(&self, distances: &Array2<F>, epsilon: F) -> Array2<F> {
        distances.mapv(|d| self.weight(d, epsilon))
    }

    /// Default decay exponent of the alpha kernel.
    pub fn default_alpha_decay() -> F {
        F::cast(10)
    }
}

impl<F: Float> Default for KernelMethod<F> {
    fn default() -> Self {
        KernelMethod::Gaussian
    }
}

impl<F: Float> FromStr for KernelMethod<F> {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "gaussian" => Ok(KernelMethod::Gaussian),
            "laplacian" => Ok(KernelMethod::Laplacian),
            "alpha" => Ok(KernelMethod::Alpha(Self::default_alpha_decay())),
            "box" => Ok(KernelMethod::Box),
            "constant" => Ok(KernelMethod::Constant),
            _ => Err(Error::UnknownKernel(name.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn autotraits() {
        fn has_autotraits<T: Send + Sync + Sized + Unpin>() {}
        has_autotraits::<KernelMethod<f64>>();
    }

    #[test]
    fn zero_distance_has_unit_affinity() {
        let kernels = [
            KernelMethod::Gaussian,
            KernelMethod::Laplacian,
            KernelMethod::Alpha(10.0),
            KernelMethod::Box,
            KernelMethod::Constant,
        ];

        for kernel in &kernels {
            assert_abs_diff_eq!(kernel.weight(0.0, 0.5), 1.0);
        }
    }

    #[test]
    fn affinities_decrease_with_distance() {
        let kernels = [
            KernelMethod::Gaussian,
            KernelMethod::Laplacian,
            KernelMethod::Alpha(10.0),
        ];

        for kernel in &kernels {
            let near = kernel.weight(0.1, 1.0);
            let far = kernel.weight(2.0, 1.0);
            assert!(near > far);
        }
    }

    #[test]
    fn box_kernel_cuts_off_at_epsilon() {
        let kernel = KernelMethod::Box;
        assert_abs_diff_eq!(kernel.weight(0.99, 1.0), 1.0);
        assert_abs_diff_eq!(kernel.weight(1.01, 1.0), 0.0);
    }

    #[test]
    fn gaussian_matches_closed_form() {
        let kernel = KernelMethod::Gaussian;
        let distances = array![[0.0, 1.0], [1.0, 0.0]];
        let affinities = kernel.apply(&distances, 1.0);

        assert_abs_diff_eq!(affinities[(0, 1)], (-1.0f64).exp(), epsilon = 1e-12);
        assert_abs_diff_eq!(affinities[(0, 0)], 1.0);
    }

    #[test]
    fn kernel_names_parse() {
        assert_eq!(
            "gaussian".parse::<KernelMethod<f64>>().unwrap(),
            KernelMethod::Gaussian
        );
        assert_eq!(
            "alpha".parse::<KernelMethod<f64>>().unwrap(),
            KernelMethod::Alpha(10.0)
        );
        assert!(matches!(
            "ripley".parse::<KernelMethod<f64>>(),
            Err(Error::UnknownKernel(_))
        ));
    }
}
