//! Observers that run alongside the condensation process.
//!
//! A callback sees every condensation step and may derive additional data
//! from it; once the run has finished, [`Callback::finalise`] lets it add
//! that data to the output archive. Unknown callback names are skipped
//! with a warning rather than failing the run, so experiment scripts stay
//! robust against configuration drift.

mod diffusion_homology;
mod persistent_homology;
mod return_probabilities;

pub use diffusion_homology::DiffusionHomology;
pub use persistent_homology::PersistentHomology;
pub use return_probabilities::ReturnProbabilities;

use log::warn;
use ndarray::Array2;

use crate::archive::ArchiveBuilder;
use crate::error::Result;
use crate::float::Float;

/// Update function family for the condensation loop.
pub trait Callback<F: Float> {
    /// Observe a single condensation step.
    ///
    /// * `t` — step counter, starting at zero for the initial cloud,
    /// * `x` — current point cloud, samples in rows,
    /// * `p` — diffusion operator of this step,
    /// * `d` — pairwise distances of `x`, provided for convenience.
    fn on_step(&mut self, t: usize, x: &Array2<F>, p: &Array2<F>, d: &Array2<F>) -> Result<()>;

    /// Finish processing and add derived data to the archive.
    fn finalise(&mut self, archive: &mut ArchiveBuilder<F>) -> Result<()>;
}

/// The callbacks used when an experiment does not request specific ones.
pub fn default_callbacks<F: Float>() -> Vec<Box<dyn Callback<F>>> {
    vec![
        Box::new(DiffusionHomology::default()),
        Box::new(PersistentHomology::default()),
    ]
}

/// Resolve callback names into instances with default parameters.
///
/// Names that do not match any known callback are ignored with a warning.
pub fn from_names<F: Float>(names: &[String]) -> Vec<Box<dyn Callback<F>>> {
    let mut callbacks: Vec<Box<dyn Callback<F>>> = Vec::new();

    for name in names {
        match name.as_str() {
            "diffusion_homology" => callbacks.push(Box::new(DiffusionHomology::default())),
            "persistent_homology" => callbacks.push(Box::new(PersistentHomology::default())),
            "return_probabilities" => callbacks.push(Box::new(ReturnProbabilities::default())),
            unknown => warn!("ignoring unknown callback '{}'", unknown),
        }
    }

    callbacks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_names_are_skipped() {
        let names = vec![
            "diffusion_homology".to_string(),
            "does_not_exist".to_string(),
            "return_probabilities".to_string(),
        ];

        let callbacks = from_names::<f64>(&names);
        assert_eq!(callbacks.len(), 2);
    }

    #[test]
    fn defaults_cover_both_homology_flavours() {
        assert_eq!(default_callbacks::<f64>().len(), 2);
    }
}
