//! NumPy-compatible persistence of condensation runs.
//!
//! A run is stored as an uncompressed `.npz` archive. Time-varying
//! quantities use keys of the form `{prefix}_t_{t}`, e.g. `data_t_0` for
//! the initial point cloud and `P_t_4` for the diffusion operator of step
//! four, so that the archives interoperate with the NumPy analysis
//! tooling that grew around this key scheme.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use ndarray::{Array2, ArrayD, IxDyn};
use ndarray_npy::{NpzReader, NpzWriter, ReadableElement, WritableElement};

use crate::error::{Error, Result};
use crate::float::Float;

/// Ordered collection of keyed arrays, written out as one `.npz` archive.
#[derive(Debug, Clone, Default)]
pub struct ArchiveBuilder<F> {
    entries: Vec<(String, ArrayD<F>)>,
}

impl<F: Float> ArchiveBuilder<F> {
    pub fn new() -> Self {
        ArchiveBuilder {
            entries: Vec::new(),
        }
    }

    /// Add an array under `key`. Keys are kept in insertion order.
    pub fn insert(&mut self, key: impl Into<String>, array: ArrayD<F>) {
        self.entries.push((key.into(), array));
    }

    /// Add a scalar under `key`, stored as a zero-dimensional array.
    pub fn insert_scalar(&mut self, key: impl Into<String>, value: F) {
        self.insert(key, ArrayD::from_elem(IxDyn(&[]), value));
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<F: Float + WritableElement> ArchiveBuilder<F> {
    /// Write the archive to `path`, creating parent directories as needed.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut npz = NpzWriter::new(File::create(path)?);
        for (key, array) in &self.entries {
            npz.add_array(key.as_str(), array)?;
        }
        npz.finish()?;

        Ok(())
    }
}

/// A condensation archive read back from disk.
#[derive(Debug, Clone)]
pub struct Archive {
    arrays: BTreeMap<String, ArrayD<f64>>,
}

impl Archive {
    /// Read an `.npz` archive from `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let mut npz = NpzReader::new(File::open(path.as_ref())?)?;

        let mut arrays = BTreeMap::new();
        for name in npz.names()? {
            let key = name.strip_suffix(".npy").unwrap_or(&name).to_string();
            let array: ArrayD<f64> = read_entry(&mut npz, &name)
                .or_else(|_| read_entry(&mut npz, &key))?;
            arrays.insert(key, array);
        }

        Ok(Archive { arrays })
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.arrays.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&ArrayD<f64>> {
        self.arrays.get(key)
    }

    /// All steps of a time-keyed quantity, ordered by time step.
    ///
    /// Returns [`Error::MissingKey`] if no key of the form
    /// `{prefix}_t_{t}` exists, and a shape error if any step is not a
    /// two-dimensional array.
    pub fn time_series(&self, prefix: &str) -> Result<Vec<Array2<f64>>> {
        let mut steps: Vec<(usize, &ArrayD<f64>)> = self
            .arrays
            .iter()
            .filter_map(|(key, array)| {
                parse_time_key(key)
                    .filter(|(p, _)| *p == prefix)
                    .map(|(_, t)| (t, array))
            })
            .collect();

        if steps.is_empty() {
            return Err(Error::MissingKey(prefix.into()));
        }

        steps.sort_by_key(|(t, _)| *t);

        steps
            .into_iter()
            .map(|(_, array)| {
                array
                    .clone()
                    .into_dimensionality()
                    .map_err(Error::NdShape)
            })
            .collect()
    }
}

fn read_entry<F: ReadableElement>(npz: &mut NpzReader<File>, name: &str) -> Result<ArrayD<F>> {
    Ok(npz.by_name(name)?)
}

/// Split a key of the form `{prefix}_t_{t}` into its prefix and time step.
pub fn parse_time_key(key: &str) -> Option<(&str, usize)> {
    let at = key.rfind("_t_")?;
    let t = key[at + 3..].parse().ok()?;
    Some((&key[..at], t))
}

/// Key under which a time-varying quantity is stored for step `t`.
pub fn time_key(prefix: &str, t: usize) -> String {
    format!("{}_t_{}", prefix, t)
}

/// Canonical archive filename of an experiment, encoding the dataset name
/// and the swept parameters.
pub fn output_filename(data: &str, n_samples: usize, radius: f64, alpha: f64, seed: u64) -> String {
    format!("{}_{}_{}_{}_{}.npz", data, n_samples, radius, alpha, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn time_keys_round_trip() {
        assert_eq!(parse_time_key("data_t_12"), Some(("data", 12)));
        assert_eq!(parse_time_key("P_t_0"), Some(("P", 0)));
        assert_eq!(parse_time_key(&time_key("data", 3)), Some(("data", 3)));

        assert_eq!(parse_time_key("epsilon"), None);
        assert_eq!(parse_time_key("data_t_"), None);
        assert_eq!(parse_time_key("data_t_x"), None);
    }

    #[test]
    fn filenames_encode_sweep_parameters() {
        assert_eq!(
            output_filename("annulus", 128, 0.5, 1.0, 42),
            "annulus_128_0.5_1_42.npz"
        );
    }

    #[test]
    fn archives_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.npz");

        let mut builder = ArchiveBuilder::new();
        builder.insert("data_t_0", array![[0.0, 1.0], [2.0, 3.0]].into_dyn());
        builder.insert("data_t_1", array![[0.5, 1.5], [1.5, 2.5]].into_dyn());
        builder.insert_scalar("epsilon", 0.25);
        builder.write(&path).unwrap();

        let archive = Archive::read(&path).unwrap();
        let steps = archive.time_series("data").unwrap();

        assert_eq!(steps.len(), 2);
        assert_abs_diff_eq!(steps[1][(0, 0)], 0.5);
        assert_abs_diff_eq!(archive.get("epsilon").unwrap().sum(), 0.25);
    }

    #[test]
    fn missing_prefixes_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.npz");

        let mut builder = ArchiveBuilder::<f64>::new();
        builder.insert_scalar("epsilon", 1.0);
        builder.write(&path).unwrap();

        let archive = Archive::read(&path).unwrap();
        assert!(matches!(
            archive.time_series("data"),
            Err(Error::MissingKey(_))
        ));
    }
}
