use linfa_linalg::eigh::*;
use ndarray::{Array1, Array2};

use crate::archive::{time_key, ArchiveBuilder};
use crate::error::Result;
use crate::float::Float;

use super::Callback;

/// Return probabilities calculation callback.
///
/// For every step this computes, per point, the probability that a random
/// walk of length `k` under the diffusion operator returns to its origin,
/// for all `k` up to the configured walk length. With the symmetric
/// eigendecomposition `P = V Λ Vᵀ` the return probability of point `i`
/// after `k` steps is `Σ_j V_ij² λ_j^k`, so a single decomposition per
/// step covers all walk lengths. Results are archived per step as
/// `return_probabilities_t_{t}` with shape `(n, walk_length)`.
pub struct ReturnProbabilities<F> {
    walk_length: usize,
    per_step: Vec<(usize, Array2<F>)>,
}

impl<F: Float> ReturnProbabilities<F> {
    /// Create a new instance computing walks up to `walk_length` steps.
    pub fn new(walk_length: usize) -> Self {
        ReturnProbabilities {
            walk_length,
            per_step: Vec::new(),
        }
    }

    /// Recorded return probabilities, one matrix per observed step.
    pub fn per_step(&self) -> &[(usize, Array2<F>)] {
        &self.per_step
    }
}

impl<F: Float> Default for ReturnProbabilities<F> {
    fn default() -> Self {
        Self::new(8)
    }
}

impl<F: Float> Callback<F> for ReturnProbabilities<F> {
    fn on_step(&mut self, t: usize, _x: &Array2<F>, p: &Array2<F>, _d: &Array2<F>) -> Result<()> {
        let (eigenvalues, eigenvectors) = p.eigh()?;
        let squared = &eigenvectors * &eigenvectors;

        let n_samples = p.nrows();
        let mut probabilities = Array2::zeros((n_samples, self.walk_length));

        for k in 0..self.walk_length {
            let powers: Array1<F> = eigenvalues.mapv(|value| value.powi(k as i32));
            let per_point = squared.dot(&powers);
            probabilities.column_mut(k).assign(&per_point);
        }

        self.per_step.push((t, probabilities));

        Ok(())
    }

    fn finalise(&mut self, archive: &mut ArchiveBuilder<F>) -> Result<()> {
        for (t, probabilities) in &self.per_step {
            archive.insert(
                time_key("return_probabilities", *t),
                probabilities.clone().into_dyn(),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn identity_operator_always_returns() {
        let mut callback = ReturnProbabilities::<f64>::new(4);
        let x = Array2::zeros((3, 2));
        let d = Array2::zeros((3, 3));
        let p = Array2::eye(3);

        callback.on_step(0, &x, &p, &d).unwrap();

        let (_, probabilities) = &callback.per_step()[0];
        for &probability in probabilities {
            assert_abs_diff_eq!(probability, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn uniform_operator_spreads_the_walk() {
        let mut callback = ReturnProbabilities::new(3);
        let x = Array2::zeros((2, 2));
        let d = Array2::zeros((2, 2));
        let p = array![[0.5, 0.5], [0.5, 0.5]];

        callback.on_step(0, &x, &p, &d).unwrap();

        let (_, probabilities) = &callback.per_step()[0];
        // walks of length zero always return
        assert_abs_diff_eq!(probabilities[(0, 0)], 1.0, epsilon = 1e-9);
        // afterwards the walker sits on either point with equal probability
        assert_abs_diff_eq!(probabilities[(0, 1)], 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(probabilities[(0, 2)], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn finalise_uses_time_keys() {
        let mut callback = ReturnProbabilities::<f64>::new(2);
        let x = Array2::zeros((2, 2));
        let d = Array2::zeros((2, 2));
        let p = Array2::eye(2);

        callback.on_step(5, &x, &p, &d).unwrap();

        let mut archive = ArchiveBuilder::new();
        callback.finalise(&mut archive).unwrap();

        let keys: Vec<_> = archive.keys().collect();
        assert_eq!(keys, vec!["return_probabilities_t_5"]);
    }
}
