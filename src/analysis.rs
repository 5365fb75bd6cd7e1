//! Metric-space statistics of archived condensation runs.
//!
//! Summarises how the point cloud contracts over condensation time:
//! per-step diameters, Hausdorff distances between consecutive steps and
//! the leading spectrum of the diffusion operator.

use linfa_linalg::eigh::*;
use ndarray::Array1;

use crate::archive::Archive;
use crate::error::Result;
use crate::metric::{diameter, hausdorff_distance};

/// Number of leading operator eigenvalues reported per step.
pub const N_EIGENVALUES: usize = 10;

/// Statistics of a single condensation step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepSummary {
    /// Condensation time of this step.
    pub t: usize,
    /// Hausdorff distance to the reference cloud; zero for the final step
    /// when consecutive steps are compared.
    pub hausdorff_distance: f64,
    /// Diameter of the cloud at this step.
    pub diameter: f64,
    /// Leading eigenvalues of the diffusion operator, in descending order.
    /// Contains fewer than [`N_EIGENVALUES`] entries for tiny clouds.
    pub eigenvalues: Vec<f64>,
}

/// Per-step summary of an archived condensation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricSpaceSummary {
    pub steps: Vec<StepSummary>,
}

impl MetricSpaceSummary {
    /// Summarise an archive.
    ///
    /// With `from_origin` set, Hausdorff distances are measured against
    /// the initial cloud instead of the respective next step.
    pub fn from_archive(archive: &Archive, from_origin: bool) -> Result<Self> {
        let clouds = archive.time_series("data")?;
        let operators = archive.time_series("P")?;

        let mut steps = Vec::with_capacity(clouds.len());

        for (t, cloud) in clouds.iter().enumerate() {
            let hausdorff = if from_origin {
                hausdorff_distance(cloud, &clouds[0])
            } else if t + 1 < clouds.len() {
                hausdorff_distance(cloud, &clouds[t + 1])
            } else {
                // keeps the final step aligned with the other statistics
                0.0
            };

            let eigenvalues = operators
                .get(t)
                .map(|operator| leading_eigenvalues(operator))
                .transpose()?
                .unwrap_or_default();

            steps.push(StepSummary {
                t,
                hausdorff_distance: hausdorff,
                diameter: diameter(cloud),
                eigenvalues,
            });
        }

        Ok(MetricSpaceSummary { steps })
    }
}

fn leading_eigenvalues(operator: &ndarray::Array2<f64>) -> Result<Vec<f64>> {
    let eigenvalues: Array1<f64> = operator.eigvalsh()?;

    let mut eigenvalues: Vec<f64> = eigenvalues.to_vec();
    eigenvalues.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    eigenvalues.truncate(N_EIGENVALUES);

    Ok(eigenvalues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveBuilder;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn toy_archive() -> Archive {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toy.npz");

        let mut builder = ArchiveBuilder::new();
        builder.insert("data_t_0", array![[0.0, 0.0], [2.0, 0.0]].into_dyn());
        builder.insert("data_t_1", array![[0.5, 0.0], [1.5, 0.0]].into_dyn());
        builder.insert("P_t_0", array![[0.75, 0.25], [0.25, 0.75]].into_dyn());
        builder.insert("P_t_1", array![[0.5, 0.5], [0.5, 0.5]].into_dyn());
        builder.write(&path).unwrap();

        Archive::read(&path).unwrap()
    }

    #[test]
    fn summary_tracks_contraction() {
        let summary = MetricSpaceSummary::from_archive(&toy_archive(), false).unwrap();

        assert_eq!(summary.steps.len(), 2);
        assert_abs_diff_eq!(summary.steps[0].diameter, 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.steps[1].diameter, 1.0, epsilon = 1e-12);

        // consecutive-step Hausdorff distance, final step pinned to zero
        assert_abs_diff_eq!(summary.steps[0].hausdorff_distance, 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.steps[1].hausdorff_distance, 0.0);
    }

    #[test]
    fn origin_mode_measures_against_the_initial_cloud() {
        let summary = MetricSpaceSummary::from_archive(&toy_archive(), true).unwrap();

        assert_abs_diff_eq!(summary.steps[0].hausdorff_distance, 0.0);
        assert_abs_diff_eq!(summary.steps[1].hausdorff_distance, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn eigenvalues_are_sorted_descending() {
        let summary = MetricSpaceSummary::from_archive(&toy_archive(), false).unwrap();

        let eigenvalues = &summary.steps[0].eigenvalues;
        assert_eq!(eigenvalues.len(), 2);
        assert_abs_diff_eq!(eigenvalues[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(eigenvalues[1], 0.5, epsilon = 1e-9);
    }
}
