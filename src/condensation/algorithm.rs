use log::{info, warn};
use ndarray::{Array2, ArrayBase, Axis, Data, Ix2};

use crate::archive::{time_key, ArchiveBuilder};
use crate::callbacks::Callback;
use crate::error::{Error, Result};
use crate::float::Float;
use crate::metric::pairwise_distances;
use crate::traits::Transformer;

use super::hyperparams::{DiffusionCondensationParams, DiffusionCondensationValidParams};

/// Result of a diffusion condensation run.
///
/// Diffusion condensation repeatedly smooths a point cloud with a diffusion
/// operator built from the cloud itself: the kernel affinities of the
/// current pairwise distances are row-normalised into a transition matrix
/// `P_t`, and the cloud moves to `X_{t+1} = P_t · X_t`. Points drift towards
/// local centres of gravity and merge once their distance falls below the
/// merge threshold, so the full time series of clouds and operators encodes
/// the multi-scale cluster structure of the data.
///
/// The scheme stops once every pairwise distance lies below the merge
/// threshold, i.e. the cloud has collapsed into a single cluster, or when
/// the iteration limit is reached.
///
/// # Example
///
/// ```
/// use pecan::prelude::*;
/// use ndarray::array;
///
/// let cloud = array![[0.0, 0.0], [0.2, 0.0], [0.1, 0.2]];
///
/// let run = DiffusionCondensation::params()
///     .epsilon(1.0)
///     .check()
///     .unwrap()
///     .transform(&cloud)
///     .unwrap();
///
/// assert!(run.converged());
/// assert_eq!(run.steps()[0].nrows(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DiffusionCondensation<F> {
    steps: Vec<Array2<F>>,
    operators: Vec<Array2<F>>,
    epsilon: F,
    converged: bool,
}

impl<F: Float> DiffusionCondensation<F> {
    /// Creates the set of default parameters.
    pub fn params() -> DiffusionCondensationParams<F> {
        DiffusionCondensationParams::new()
    }

    /// The point cloud of every condensation step, starting with the
    /// original data at `t = 0`.
    pub fn steps(&self) -> &[Array2<F>] {
        &self.steps
    }

    /// The diffusion operator of every condensation step.
    pub fn operators(&self) -> &[Array2<F>] {
        &self.operators
    }

    /// The kernel bandwidth the run was performed with, either the
    /// explicit parameter or the data-driven estimate.
    pub fn epsilon(&self) -> F {
        self.epsilon
    }

    /// Whether the cloud collapsed into a single cluster before the
    /// iteration limit.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Number of recorded steps, including the initial cloud.
    pub fn n_steps(&self) -> usize {
        self.steps.len()
    }

    /// The fully condensed point cloud.
    pub fn final_cloud(&self) -> &Array2<F> {
        &self.steps[self.steps.len() - 1]
    }

    /// Serialise the run into an archive builder, using the time-keyed
    /// layout `data_t_{t}` / `P_t_{t}` plus an `epsilon` scalar.
    pub fn to_archive(&self) -> ArchiveBuilder<F> {
        let mut builder = ArchiveBuilder::new();

        for (t, cloud) in self.steps.iter().enumerate() {
            builder.insert(time_key("data", t), cloud.clone().into_dyn());
        }

        for (t, operator) in self.operators.iter().enumerate() {
            builder.insert(time_key("P", t), operator.clone().into_dyn());
        }

        builder.insert_scalar("epsilon", self.epsilon);

        builder
    }
}

impl<F: Float> DiffusionCondensationValidParams<F> {
    /// Run the condensation scheme on `records`, feeding every step to the
    /// given callbacks.
    ///
    /// Each step observes the tuple `(t, X, P, D)`: the step counter, the
    /// current cloud, its diffusion operator and its pairwise distances.
    pub fn condense(
        &self,
        records: &ArrayBase<impl Data<Elem = F>, Ix2>,
        callbacks: &mut [Box<dyn Callback<F>>],
    ) -> Result<DiffusionCondensation<F>> {
        let n_samples = records.nrows();

        if n_samples < 2 {
            return Err(Error::InvalidData(format!(
                "diffusion condensation requires at least two samples, got {}",
                n_samples
            )));
        }

        if records.ncols() == 0 {
            return Err(Error::InvalidData(
                "point cloud has no feature dimensions".to_string(),
            ));
        }

        let epsilon = match self.epsilon() {
            Some(epsilon) => epsilon,
            None => {
                let epsilon = estimate_epsilon(records);
                info!("estimated kernel bandwidth as {:.4}", epsilon);
                epsilon
            }
        };

        let alpha = self.alpha();
        let mut x = records.to_owned();
        let mut previous: Option<Array2<F>> = None;

        let mut steps = Vec::new();
        let mut operators = Vec::new();
        let mut converged = false;

        for t in 0..=self.max_iterations() {
            let distances = pairwise_distances(&x);
            let affinities = self.kernel().apply(&distances, epsilon);

            let degrees = affinities.sum_axis(Axis(1));
            let mut operator = &affinities / &degrees.insert_axis(Axis(1));

            // Mixing stochastic matrices keeps the rows stochastic, so the
            // memory term needs no re-normalisation.
            if let Some(previous) = &previous {
                if alpha < F::one() {
                    operator = &operator * alpha + &(previous * (F::one() - alpha));
                }
            }

            for callback in callbacks.iter_mut() {
                callback.on_step(t, &x, &operator, &distances)?;
            }

            steps.push(x.clone());
            operators.push(operator.clone());

            let spread = distances.iter().cloned().fold(F::zero(), F::max);
            if spread < self.merge_threshold() {
                converged = true;
                break;
            }

            if t == self.max_iterations() {
                break;
            }

            x = operator.dot(&x);
            previous = Some(operator);
        }

        if !converged {
            warn!(
                "point cloud failed to collapse into a single cluster within {} steps",
                self.max_iterations()
            );
        }

        Ok(DiffusionCondensation {
            steps,
            operators,
            epsilon,
            converged,
        })
    }
}

impl<F: Float, D: Data<Elem = F>> Transformer<&ArrayBase<D, Ix2>, Result<DiffusionCondensation<F>>>
    for DiffusionCondensationValidParams<F>
{
    /// Run the condensation scheme without observers.
    fn transform(&self, records: &ArrayBase<D, Ix2>) -> Result<DiffusionCondensation<F>> {
        self.condense(records, &mut [])
    }
}

/// Estimate the kernel bandwidth of a point cloud as the mean distance to
/// the k-th nearest neighbour, with `k = ln(n)` clamped to the valid range.
///
/// This follows the usual connectivity heuristic for neighbourhood graphs:
/// `ln(n)` neighbours keep a random geometric graph connected, so the mean
/// distance at that rank captures the local scale of the data without being
/// dominated by outliers.
pub fn estimate_epsilon<F: Float>(records: &ArrayBase<impl Data<Elem = F>, Ix2>) -> F {
    let n_samples = records.nrows();

    if n_samples < 2 {
        return F::one();
    }

    let k = ((n_samples as f64).ln() as usize).max(1).min(n_samples - 1);

    let distances = pairwise_distances(records);
    let mut total = F::zero();

    for (i, row) in distances.rows().into_iter().enumerate() {
        let mut neighbours: Vec<F> = row
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, &d)| d)
            .collect();

        neighbours.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        total += neighbours[k - 1];
    }

    total / F::cast(n_samples)
}
