use std::fs;
use std::path::Path;

use ndarray::Array2;

use pecan::{Error, Result};

/// Load a point cloud from a whitespace-separated text file, one sample
/// per line. Empty lines and lines starting with `#` are skipped, matching
/// the NumPy `loadtxt` interchange format.
pub fn load_matrix(path: impl AsRef<Path>) -> Result<Array2<f64>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let mut values = Vec::new();
    let mut n_rows = 0;
    let mut n_cols = None;

    for (line_number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let row: Vec<f64> = line
            .split_whitespace()
            .map(|token| {
                token.parse().map_err(|_| {
                    Error::InvalidData(format!(
                        "{}:{}: '{}' is not a number",
                        path.display(),
                        line_number + 1,
                        token
                    ))
                })
            })
            .collect::<Result<_>>()?;

        match n_cols {
            None => n_cols = Some(row.len()),
            Some(expected) if expected != row.len() => {
                return Err(Error::InvalidData(format!(
                    "{}:{}: expected {} columns, found {}",
                    path.display(),
                    line_number + 1,
                    expected,
                    row.len()
                )));
            }
            _ => {}
        }

        values.extend(row);
        n_rows += 1;
    }

    let n_cols = n_cols.ok_or_else(|| {
        Error::InvalidData(format!("{}: no data rows found", path.display()))
    })?;

    Ok(Array2::from_shape_vec((n_rows, n_cols), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::io::Write;

    fn write_file(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cloud.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, "{}", contents).unwrap();
        (dir, path)
    }

    #[test]
    fn matrices_load_with_comments_and_blank_lines() {
        let (_dir, path) = write_file("# a toy cloud\n0.0 1.0\n\n2.5 -3.0\n");
        let cloud = load_matrix(&path).unwrap();

        assert_eq!(cloud.dim(), (2, 2));
        assert_abs_diff_eq!(cloud[(1, 1)], -3.0);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let (_dir, path) = write_file("0.0 1.0\n2.0\n");
        assert!(matches!(load_matrix(&path), Err(Error::InvalidData(_))));
    }

    #[test]
    fn non_numeric_tokens_are_rejected() {
        let (_dir, path) = write_file("0.0 banana\n");
        assert!(matches!(load_matrix(&path), Err(Error::InvalidData(_))));
    }

    #[test]
    fn empty_files_are_rejected() {
        let (_dir, path) = write_file("# only comments\n");
        assert!(matches!(load_matrix(&path), Err(Error::InvalidData(_))));
    }
}
