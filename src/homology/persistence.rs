//! Persistent homology of a Vietoris--Rips filtration.
//!
//! This is the standard boundary-matrix reduction over Z/2Z: simplices are
//! ordered by appearance in the filtration, columns are reduced against
//! earlier columns with the same pivot, and each surviving pivot pairs a
//! creator simplex with its destroyer. Unpaired creators become essential
//! classes with infinite persistence.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use ndarray::{Array2, ArrayBase, Data, Ix2};

use crate::float::Float;

/// A single interval `[birth, death)` of the persistence diagram.
///
/// Essential classes carry `death = inf`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PersistenceInterval<F> {
    pub birth: F,
    pub death: F,
    pub dimension: usize,
}

impl<F: Float> PersistenceInterval<F> {
    /// Lifetime of the topological feature.
    pub fn persistence(&self) -> F {
        self.death - self.birth
    }

    /// Whether the feature never dies within the filtration.
    pub fn is_essential(&self) -> bool {
        self.death == F::infinity()
    }
}

/// Persistence diagram of a single filtration.
#[derive(Debug, Clone, Default)]
pub struct PersistenceDiagram<F> {
    intervals: Vec<PersistenceInterval<F>>,
    pairings: Vec<(usize, usize)>,
}

impl<F: Float> PersistenceDiagram<F> {
    /// All intervals of the diagram.
    pub fn intervals(&self) -> &[PersistenceInterval<F>] {
        &self.intervals
    }

    /// Creator/destroyer filtration index pairs, one per finite interval.
    pub fn pairings(&self) -> &[(usize, usize)] {
        &self.pairings
    }

    /// Intervals of a fixed dimension.
    pub fn dimension(&self, d: usize) -> impl Iterator<Item = &PersistenceInterval<F>> {
        self.intervals.iter().filter(move |i| i.dimension == d)
    }

    /// Finite intervals of a fixed dimension.
    pub fn finite(&self, d: usize) -> impl Iterator<Item = &PersistenceInterval<F>> {
        self.dimension(d).filter(|i| !i.is_essential())
    }

    /// The diagram as an `(n_intervals, 3)` matrix of birth, death and
    /// dimension rows, the layout persisted into archives.
    pub fn to_points(&self) -> Array2<F> {
        let mut points = Array2::zeros((self.intervals.len(), 3));

        for (mut row, interval) in points.rows_mut().into_iter().zip(&self.intervals) {
            row[0] = interval.birth;
            row[1] = interval.death;
            row[2] = F::cast(interval.dimension);
        }

        points
    }

    /// The creator/destroyer pairs as an `(n_pairs, 2)` index matrix.
    pub fn to_pairs(&self) -> Array2<F> {
        let mut pairs = Array2::zeros((self.pairings.len(), 2));

        for (mut row, &(creator, destroyer)) in pairs.rows_mut().into_iter().zip(&self.pairings) {
            row[0] = F::cast(creator);
            row[1] = F::cast(destroyer);
        }

        pairs
    }
}

/// A simplex of the filtration together with its appearance value.
#[derive(Debug, Clone)]
struct FiltrationSimplex<F> {
    vertices: Vec<usize>,
    appearance: F,
}

impl<F> FiltrationSimplex<F> {
    fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }
}

/// Sparse Z/2Z boundary column keyed by filtration index.
#[derive(Debug, Clone, Default)]
struct BoundaryColumn {
    entries: BTreeSet<usize>,
}

impl BoundaryColumn {
    fn toggle(&mut self, index: usize) {
        if !self.entries.remove(&index) {
            self.entries.insert(index);
        }
    }

    /// Largest remaining filtration index, the column's pivot.
    fn pivot(&self) -> Option<usize> {
        self.entries.iter().next_back().copied()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Z/2Z column addition, i.e. the symmetric difference of the entries.
    fn add(&mut self, other: &BoundaryColumn) {
        for &index in &other.entries {
            self.toggle(index);
        }
    }
}

/// Persistent homology of the Vietoris--Rips filtration of a distance
/// matrix, up to and including `max_dimension` (at most 1).
///
/// Simplices appearing after `max_appearance` are not part of the
/// filtration. Passing the enclosing radius of the metric space here is
/// lossless for the diagram while keeping the triangle count in check.
pub fn vietoris_rips<F: Float>(
    distances: &ArrayBase<impl Data<Elem = F>, Ix2>,
    max_appearance: F,
    max_dimension: usize,
) -> PersistenceDiagram<F> {
    let simplices = build_filtration(distances, max_appearance, max_dimension);
    reduce(&simplices)
}

/// Enclosing radius of a finite metric space.
///
/// Beyond this value the Rips complex is a cone and therefore contractible,
/// so no feature of positive dimension survives past it.
pub fn enclosing_radius<F: Float>(distances: &ArrayBase<impl Data<Elem = F>, Ix2>) -> F {
    distances
        .rows()
        .into_iter()
        .map(|row| row.iter().cloned().fold(F::zero(), F::max))
        .fold(F::infinity(), F::min)
}

fn build_filtration<F: Float>(
    distances: &ArrayBase<impl Data<Elem = F>, Ix2>,
    max_appearance: F,
    max_dimension: usize,
) -> Vec<FiltrationSimplex<F>> {
    let n = distances.nrows();
    let mut simplices = Vec::new();

    for i in 0..n {
        simplices.push(FiltrationSimplex {
            vertices: vec![i],
            appearance: F::zero(),
        });
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let d = distances[(i, j)];
            if d <= max_appearance {
                simplices.push(FiltrationSimplex {
                    vertices: vec![i, j],
                    appearance: d,
                });
            }
        }
    }

    // Triangles enter when their longest edge does; they are required to
    // kill one-dimensional classes.
    if max_dimension >= 1 {
        for i in 0..n {
            for j in (i + 1)..n {
                let dij = distances[(i, j)];
                if dij > max_appearance {
                    continue;
                }

                for k in (j + 1)..n {
                    let appearance = dij.max(distances[(i, k)]).max(distances[(j, k)]);
                    if appearance <= max_appearance {
                        simplices.push(FiltrationSimplex {
                            vertices: vec![i, j, k],
                            appearance,
                        });
                    }
                }
            }
        }
    }

    simplices.sort_by(|a, b| {
        a.appearance
            .partial_cmp(&b.appearance)
            .unwrap_or(Ordering::Equal)
            .then(a.dimension().cmp(&b.dimension()))
            .then(a.vertices.cmp(&b.vertices))
    });

    simplices
}

fn reduce<F: Float>(simplices: &[FiltrationSimplex<F>]) -> PersistenceDiagram<F> {
    let index_of: HashMap<&[usize], usize> = simplices
        .iter()
        .enumerate()
        .map(|(index, simplex)| (simplex.vertices.as_slice(), index))
        .collect();

    let mut columns: Vec<BoundaryColumn> = Vec::with_capacity(simplices.len());
    let mut pivot_owner: HashMap<usize, usize> = HashMap::new();

    for simplex in simplices {
        let mut column = BoundaryColumn::default();

        if simplex.dimension() > 0 {
            let mut face = simplex.vertices.clone();
            for omit in 0..simplex.vertices.len() {
                face.remove(omit);
                if let Some(&face_index) = index_of.get(face.as_slice()) {
                    column.toggle(face_index);
                }
                face.insert(omit, simplex.vertices[omit]);
            }
        }

        while let Some(pivot) = column.pivot() {
            match pivot_owner.get(&pivot) {
                Some(&owner) => column.add(&columns[owner]),
                None => break,
            }
        }

        if let Some(pivot) = column.pivot() {
            pivot_owner.insert(pivot, columns.len());
        }

        columns.push(column);
    }

    let mut diagram = PersistenceDiagram::default();
    let mut destroyed = vec![false; simplices.len()];

    for (destroyer, column) in columns.iter().enumerate() {
        if let Some(creator) = column.pivot() {
            destroyed[creator] = true;
            destroyed[destroyer] = true;

            let birth = simplices[creator].appearance;
            let death = simplices[destroyer].appearance;

            if death > birth {
                diagram.intervals.push(PersistenceInterval {
                    birth,
                    death,
                    dimension: simplices[creator].dimension(),
                });
                diagram.pairings.push((creator, destroyer));
            }
        }
    }

    for (index, simplex) in simplices.iter().enumerate() {
        if !destroyed[index] && columns[index].is_empty() {
            diagram.intervals.push(PersistenceInterval {
                birth: simplex.appearance,
                death: F::infinity(),
                dimension: simplex.dimension(),
            });
        }
    }

    diagram
}
