use crate::error::Error;
use crate::float::Float;
use crate::kernel::KernelMethod;
use crate::param_guard::ParamGuard;

#[derive(Clone, Debug, PartialEq)]
/// The set of hyperparameters that can be specified for the execution of
/// the [diffusion condensation scheme](crate::DiffusionCondensation).
pub struct DiffusionCondensationValidParams<F: Float> {
    /// Kernel bandwidth; `None` estimates it from the input data.
    epsilon: Option<F>,
    /// Weight of the freshly computed diffusion operator when mixing it
    /// with the operator of the previous step. A value of one disables
    /// the operator memory entirely.
    alpha: F,
    /// Distance-to-affinity function of the diffusion operator.
    kernel: KernelMethod<F>,
    /// Distance below which two points count as merged.
    merge_threshold: F,
    /// Upper bound on condensation steps when the cloud fails to collapse.
    max_iterations: usize,
}

#[derive(Clone, Debug, PartialEq)]
/// A helper struct used to construct a set of [valid hyperparameters](DiffusionCondensationValidParams)
/// for the diffusion condensation scheme (using the builder pattern).
pub struct DiffusionCondensationParams<F: Float>(DiffusionCondensationValidParams<F>);

impl<F: Float> DiffusionCondensationParams<F> {
    /// `new` configures the condensation scheme with its defaults:
    ///
    /// * `epsilon = None` (estimated from the data),
    /// * `alpha = 1`, i.e. no operator memory,
    /// * `kernel = Gaussian`,
    /// * `merge_threshold = 1e-3`,
    /// * `max_iterations = 128`.
    pub fn new() -> Self {
        Self(DiffusionCondensationValidParams {
            epsilon: None,
            alpha: F::one(),
            kernel: KernelMethod::Gaussian,
            merge_threshold: F::cast(1e-3),
            max_iterations: 128,
        })
    }

    /// Set the kernel bandwidth explicitly.
    pub fn epsilon(mut self, epsilon: F) -> Self {
        self.0.epsilon = Some(epsilon);
        self
    }

    /// Set the kernel bandwidth from an optional value, keeping the
    /// data-driven estimate for `None`.
    pub fn epsilon_opt(mut self, epsilon: Option<F>) -> Self {
        self.0.epsilon = epsilon;
        self
    }

    /// Change the weight of the current operator in the memory term.
    pub fn alpha(mut self, alpha: F) -> Self {
        self.0.alpha = alpha;
        self
    }

    /// Change the kernel function.
    pub fn kernel(mut self, kernel: KernelMethod<F>) -> Self {
        self.0.kernel = kernel;
        self
    }

    /// Change the merge threshold.
    pub fn merge_threshold(mut self, merge_threshold: F) -> Self {
        self.0.merge_threshold = merge_threshold;
        self
    }

    /// Change the iteration limit.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }
}

impl<F: Float> Default for DiffusionCondensationParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> ParamGuard for DiffusionCondensationParams<F> {
    type Checked = DiffusionCondensationValidParams<F>;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if let Some(epsilon) = self.0.epsilon {
            if epsilon <= F::zero() {
                return Err(Error::Parameters(format!(
                    "epsilon must be positive, got {}",
                    epsilon
                )));
            }
        }

        if self.0.alpha <= F::zero() || self.0.alpha > F::one() {
            return Err(Error::Parameters(format!(
                "alpha must lie in (0, 1], got {}",
                self.0.alpha
            )));
        }

        if self.0.merge_threshold <= F::zero() {
            return Err(Error::Parameters(format!(
                "merge threshold must be positive, got {}",
                self.0.merge_threshold
            )));
        }

        if self.0.max_iterations == 0 {
            return Err(Error::Parameters(
                "max_iterations cannot be 0".to_string(),
            ));
        }

        Ok(&self.0)
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> DiffusionCondensationValidParams<F> {
    /// Kernel bandwidth, if set explicitly.
    pub fn epsilon(&self) -> Option<F> {
        self.epsilon
    }

    /// Weight of the current operator in the memory term.
    pub fn alpha(&self) -> F {
        self.alpha
    }

    /// Kernel function of the diffusion operator.
    pub fn kernel(&self) -> KernelMethod<F> {
        self.kernel
    }

    /// Distance below which two points count as merged.
    pub fn merge_threshold(&self) -> F {
        self.merge_threshold
    }

    /// Upper bound on condensation steps.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }
}
