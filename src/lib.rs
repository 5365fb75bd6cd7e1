//! `pecan` implements topology-based diffusion condensation for point clouds.
//!
//! Diffusion condensation is an iterative manifold-learning scheme: at every
//! step a diffusion operator is built from the current point cloud and the
//! cloud is smoothed with it, so that points drift towards local centres of
//! gravity until they collapse into clusters. Tracking *when* points merge
//! yields a topological summary of the data across scales, the natural
//! analogue of persistent homology with time taking the role of the scale
//! parameter.
//!
//! The crate is organised around three pieces:
//!
//! * [`condensation`] — the condensation scheme itself, configured through
//!   builder-checked hyperparameters ([`DiffusionCondensationParams`]).
//! * [`callbacks`] — observers that run alongside the condensation process
//!   and derive additional data from it (diffusion homology, persistent
//!   homology, return probabilities).
//! * [`archive`] — NumPy-compatible `.npz` persistence of a finished run,
//!   which the companion `pecan-cli` crate sweeps over parameter grids and
//!   the [`analysis`] module summarises again.
//!
//! ```
//! use pecan::prelude::*;
//! use ndarray::array;
//!
//! let cloud = array![[0.0, 0.0], [0.1, 0.0], [2.0, 2.0], [2.1, 2.0]];
//!
//! let run = DiffusionCondensation::params()
//!     .epsilon(0.5)
//!     .max_iterations(64)
//!     .check()
//!     .unwrap()
//!     .transform(&cloud)
//!     .unwrap();
//!
//! assert!(run.n_steps() >= 1);
//! ```

pub mod analysis;
pub mod archive;
pub mod callbacks;
pub mod condensation;
pub mod error;
mod float;
pub mod homology;
pub mod kernel;
pub mod metric;
mod param_guard;
pub mod prelude;
pub mod traits;

pub use condensation::{
    DiffusionCondensation, DiffusionCondensationParams, DiffusionCondensationValidParams,
};
pub use error::{Error, Result};
pub use float::Float;
pub use kernel::KernelMethod;
pub use param_guard::ParamGuard;
