//! Error types in pecan
//!

use std::path::PathBuf;

use thiserror::Error;

use ndarray::ShapeError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    Parameters(String),
    #[error("invalid input data: {0}")]
    InvalidData(String),
    #[error("unknown dataset '{0}', expected one of: {1}")]
    UnknownDataset(String, String),
    #[error("unknown kernel '{0}', expected one of: alpha, box, constant, gaussian, laplacian")]
    UnknownKernel(String),
    #[error("archive is missing required key prefix '{0}'")]
    MissingKey(String),
    #[error("refusing to overwrite existing file {}; use `--force` to change this behaviour", .0.display())]
    ArchiveExists(PathBuf),
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
    #[error(transparent)]
    Linalg(#[from] linfa_linalg::LinalgError),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("writing .npz archive failed: {0}")]
    WriteNpz(#[from] ndarray_npy::WriteNpzError),
    #[error("reading .npz archive failed: {0}")]
    ReadNpz(#[from] ndarray_npy::ReadNpzError),
}
