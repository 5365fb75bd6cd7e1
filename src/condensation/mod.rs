//! Diffusion condensation of point clouds.

mod algorithm;
mod hyperparams;

pub use algorithm::{estimate_epsilon, DiffusionCondensation};
pub use hyperparams::{DiffusionCondensationParams, DiffusionCondensationValidParams};
