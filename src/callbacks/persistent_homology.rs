use ndarray::Array2;

use crate::archive::{time_key, ArchiveBuilder};
use crate::error::Result;
use crate::float::Float;
use crate::homology::{self, PersistenceDiagram};

use super::Callback;

/// Persistent homology calculation callback.
///
/// Computes a Vietoris--Rips persistence diagram from the distance matrix
/// of every condensation step, treating the underlying point cloud as a
/// dynamic metric space. Diagrams are archived per step as
/// `persistence_points_t_{t}` (birth, death, dimension rows) together with
/// the creator/destroyer pairings under `persistence_pairs_t_{t}`.
///
/// The filtration is truncated at the enclosing radius of each step, which
/// leaves the diagram unchanged while bounding the number of triangles.
pub struct PersistentHomology<F> {
    dimension: usize,
    max_cardinality: usize,
    diagrams: Vec<(usize, PersistenceDiagram<F>)>,
}

impl<F: Float> PersistentHomology<F> {
    /// Create a new instance.
    ///
    /// * `dimension` — maximum homology dimension to compute (at most 1),
    /// * `max_cardinality` — clouds with more samples are skipped, since
    ///   the filtration size grows cubically.
    pub fn new(dimension: usize, max_cardinality: usize) -> Self {
        PersistentHomology {
            dimension,
            max_cardinality,
            diagrams: Vec::new(),
        }
    }

    /// Diagrams recorded so far, one per observed step.
    pub fn diagrams(&self) -> &[(usize, PersistenceDiagram<F>)] {
        &self.diagrams
    }
}

impl<F: Float> Default for PersistentHomology<F> {
    fn default() -> Self {
        Self::new(1, 512)
    }
}

impl<F: Float> Callback<F> for PersistentHomology<F> {
    fn on_step(&mut self, t: usize, x: &Array2<F>, _p: &Array2<F>, d: &Array2<F>) -> Result<()> {
        if x.nrows() > self.max_cardinality {
            return Ok(());
        }

        let radius = homology::enclosing_radius(d);
        let diagram = homology::vietoris_rips(d, radius, self.dimension);
        self.diagrams.push((t, diagram));

        Ok(())
    }

    fn finalise(&mut self, archive: &mut ArchiveBuilder<F>) -> Result<()> {
        for (t, diagram) in &self.diagrams {
            archive.insert(time_key("persistence_pairs", *t), diagram.to_pairs().into_dyn());
            archive.insert(
                time_key("persistence_points", *t),
                diagram.to_points().into_dyn(),
            );
        }

        Ok(())
    }
}
