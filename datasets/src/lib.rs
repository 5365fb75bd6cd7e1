//! Synthetic point clouds for diffusion condensation experiments.
//!
//! The generators here produce the small two-dimensional data sets used
//! throughout the condensation experiments: annuli, petals, moons, blobs
//! and hyperuniform samplings of circles and ellipses. Every stochastic
//! generator takes the random number generator as an argument, so seeded
//! experiment runs stay reproducible.
//!
//! [`from_name`] dispatches on the data set names used by the command
//! line interface; [`load_matrix`] reads externally supplied point clouds
//! from whitespace-separated text files.

pub mod generate;
mod load;

pub use generate::{
    add_uniform_noise, annulus, barbell, blobs, double_annulus, from_name, hyperuniform_circle,
    hyperuniform_ellipse, moons, petals, GeneratorConfig, DATASET_NAMES,
};
pub use load::load_matrix;
