use ndarray::Array2;

use crate::archive::ArchiveBuilder;
use crate::error::Result;
use crate::float::Float;
use crate::homology::UnionFind;

use super::Callback;

/// Diffusion homology calculation callback.
///
/// Tracks connected components as points merge over condensation time.
/// This is the natural analogue of persistent homology with the filtration
/// running over time steps instead of distance scales: every component is
/// born at `t = 0`, and a component dies at the step in which it is
/// absorbed into another one. The resulting persistence pairs are archived
/// under `diffusion_homology_persistence_pairs`.
pub struct DiffusionHomology<F> {
    threshold: F,
    union_find: Option<UnionFind>,
    persistence_pairs: Vec<(usize, usize)>,
}

impl<F: Float> DiffusionHomology<F> {
    /// Create a new instance with the given merge threshold: a pair of
    /// points closer than this counts as merged.
    pub fn new(threshold: F) -> Self {
        DiffusionHomology {
            threshold,
            union_find: None,
            persistence_pairs: Vec::new(),
        }
    }

    /// The recorded `(birth, death)` pairs.
    pub fn persistence_pairs(&self) -> &[(usize, usize)] {
        &self.persistence_pairs
    }
}

impl<F: Float> Default for DiffusionHomology<F> {
    fn default() -> Self {
        Self::new(F::cast(1e-3))
    }
}

impl<F: Float> Callback<F> for DiffusionHomology<F> {
    fn on_step(&mut self, t: usize, x: &Array2<F>, _p: &Array2<F>, d: &Array2<F>) -> Result<()> {
        let union_find = self
            .union_find
            .get_or_insert_with(|| UnionFind::new(x.nrows()));

        for i in 0..d.nrows() {
            for j in (i + 1)..d.ncols() {
                if d[(i, j)] < self.threshold && union_find.union(i, j) {
                    // Components all appear at t = 0, so the pair records
                    // only the death time.
                    self.persistence_pairs.push((0, t));
                }
            }
        }

        Ok(())
    }

    fn finalise(&mut self, archive: &mut ArchiveBuilder<F>) -> Result<()> {
        let mut pairs = Array2::zeros((self.persistence_pairs.len(), 2));

        for (mut row, &(birth, death)) in pairs.rows_mut().into_iter().zip(&self.persistence_pairs)
        {
            row[0] = F::cast(birth);
            row[1] = F::cast(death);
        }

        archive.insert("diffusion_homology_persistence_pairs", pairs.into_dyn());

        Ok(())
    }
}
