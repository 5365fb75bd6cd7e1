//! Utility functions for randomly generating point clouds

use ndarray::{s, Array1, Array2, ArrayBase, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
    RandomExt,
};
use num_traits::float::FloatConst;

use pecan::{Error, Result};

/// Names accepted by [`from_name`], in the order they are reported in
/// error messages.
pub const DATASET_NAMES: &[&str] = &[
    "annulus",
    "barbell",
    "blobs",
    "double_annulus",
    "hyperuniform_circle",
    "hyperuniform_ellipse",
    "moons",
    "petals",
];

/// Parameters forwarded to the individual generators where appropriate.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Number of samples to draw.
    pub n_samples: usize,
    /// Inner radius of annuli; minor semi-axis of ellipses.
    pub inner_radius: f64,
    /// Outer radius of annuli; major semi-axis of ellipses.
    pub outer_radius: f64,
    /// Shape parameter for distributions that support one, currently the
    /// bar thickness of the barbell.
    pub beta: f64,
    /// Number of petals of the flower data set.
    pub n_petals: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            n_samples: 128,
            inner_radius: 0.5,
            outer_radius: 1.0,
            beta: 1.0,
            n_petals: 4,
        }
    }
}

/// Dispatch a generator by its data set name.
///
/// Unknown names are rejected with the list of valid choices; radius
/// parameters are validated for the data sets that consume them.
pub fn from_name(name: &str, config: &GeneratorConfig, rng: &mut impl Rng) -> Result<Array2<f64>> {
    let n = config.n_samples;

    match name {
        "annulus" => {
            check_radii(config)?;
            Ok(annulus(n, config.inner_radius, config.outer_radius, rng))
        }
        "double_annulus" => {
            check_radii(config)?;
            let (cloud, _) = double_annulus(n, config.inner_radius, config.outer_radius, rng);
            Ok(cloud)
        }
        "petals" => {
            let (cloud, _) = petals(n, config.n_petals.max(1), rng);
            Ok(cloud)
        }
        "moons" => {
            let (cloud, _) = moons(n, 0.0, rng);
            Ok(cloud)
        }
        "blobs" => {
            let centroids = default_blob_centroids();
            let blob_size = (n as f64 / centroids.nrows() as f64).ceil() as usize;
            Ok(blobs(blob_size, &centroids, rng))
        }
        "barbell" => {
            let (cloud, _) = barbell(n, config.beta, rng);
            Ok(cloud)
        }
        "hyperuniform_circle" => Ok(hyperuniform_circle(n)),
        "hyperuniform_ellipse" => {
            check_radii(config)?;
            Ok(hyperuniform_ellipse(
                n,
                config.outer_radius,
                config.inner_radius,
            ))
        }
        unknown => Err(Error::UnknownDataset(
            unknown.into(),
            DATASET_NAMES.join(", "),
        )),
    }
}

fn check_radii(config: &GeneratorConfig) -> Result<()> {
    if config.inner_radius <= 0.0 || config.inner_radius >= config.outer_radius {
        return Err(Error::Parameters(format!(
            "radii must satisfy 0 < r < R, got r = {}, R = {}",
            config.inner_radius, config.outer_radius
        )));
    }

    Ok(())
}

/// Sample `n` points uniformly (by area) from the annulus with inner
/// radius `r` and outer radius `R`.
pub fn annulus(n: usize, r: f64, big_r: f64, rng: &mut impl Rng) -> Array2<f64> {
    let mut cloud = Array2::zeros((n, 2));

    for mut row in cloud.rows_mut() {
        let radius = (rng.gen_range(r * r..big_r * big_r)).sqrt();
        let angle = rng.gen_range(0.0..2.0 * f64::PI());

        row[0] = radius * angle.cos();
        row[1] = radius * angle.sin();
    }

    cloud
}

/// Two overlapping annuli of different scale, with labels telling the
/// annuli apart.
pub fn double_annulus(
    n: usize,
    r: f64,
    big_r: f64,
    rng: &mut impl Rng,
) -> (Array2<f64>, Array1<usize>) {
    let n_first = n / 2;
    let mut cloud = Array2::zeros((n, 2));
    let mut labels = Array1::zeros(n);

    let first = annulus(n_first, r, big_r, rng);
    cloud.slice_mut(s![..n_first, ..]).assign(&first);

    // the second annulus is scaled down and shifted to touch the first
    let scale = 0.6;
    let second = annulus(n - n_first, r * scale, big_r * scale, rng);
    for (mut row, source) in cloud
        .slice_mut(s![n_first.., ..])
        .rows_mut()
        .into_iter()
        .zip(second.rows())
    {
        row[0] = source[0] + big_r * (1.0 + scale);
        row[1] = source[1];
    }

    labels.slice_mut(s![n_first..]).fill(1);

    (cloud, labels)
}

/// A flower: `n_petals` Gaussian clusters arranged on the unit circle,
/// labelled by petal.
pub fn petals(n: usize, n_petals: usize, rng: &mut impl Rng) -> (Array2<f64>, Array1<usize>) {
    let mut cloud = Array2::zeros((n, 2));
    let mut labels = Array1::zeros(n);

    for i in 0..n {
        let petal = i % n_petals;
        let angle = 2.0 * f64::PI() * petal as f64 / n_petals as f64;

        cloud[(i, 0)] = angle.cos() + 0.15 * normal(rng);
        cloud[(i, 1)] = angle.sin() + 0.15 * normal(rng);
        labels[i] = petal;
    }

    (cloud, labels)
}

/// Two interleaved half-moons with additive Gaussian noise of the given
/// standard deviation, labelled by moon.
pub fn moons(n: usize, noise: f64, rng: &mut impl Rng) -> (Array2<f64>, Array1<usize>) {
    let n_upper = n / 2;
    let mut cloud = Array2::zeros((n, 2));
    let mut labels = Array1::zeros(n);

    for i in 0..n {
        let (x, y, label) = if i < n_upper {
            let t = f64::PI() * i as f64 / (n_upper.max(2) - 1) as f64;
            (t.cos(), t.sin(), 0)
        } else {
            let j = i - n_upper;
            let t = f64::PI() * j as f64 / ((n - n_upper).max(2) - 1) as f64;
            (1.0 - t.cos(), 0.5 - t.sin(), 1)
        };

        cloud[(i, 0)] = x + noise * normal(rng);
        cloud[(i, 1)] = y + noise * normal(rng);
        labels[i] = label;
    }

    (cloud, labels)
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` points (a "blob") around each of the blob centroids,
/// sampled from a standard normal distribution centred in the centroid.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut cloud: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        cloud.slice_mut(indexes).assign(&blob);
    }

    cloud
}

fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array2::random_using(shape, StandardNormal, rng);
    origin_blob + blob_centroid
}

fn default_blob_centroids() -> Array2<f64> {
    ndarray::array![[0.0, 0.0], [8.0, 0.0], [0.0, 8.0]]
}

/// Two discs joined by a thin bar; `beta` scales the bar thickness.
/// Labels distinguish the left disc, the bar and the right disc.
pub fn barbell(n: usize, beta: f64, rng: &mut impl Rng) -> (Array2<f64>, Array1<usize>) {
    let mut cloud = Array2::zeros((n, 2));
    let mut labels = Array1::zeros(n);

    for i in 0..n {
        // 40% per disc, 20% bar
        let share = rng.gen_range(0.0..1.0);

        let (x, y, label) = if share < 0.4 {
            let (x, y) = disc_point(0.5, rng);
            (x - 1.0, y, 0)
        } else if share < 0.8 {
            let (x, y) = disc_point(0.5, rng);
            (x + 1.0, y, 2)
        } else {
            let height = 0.1 * beta;
            let y = if height > 0.0 {
                rng.gen_range(-height..height)
            } else {
                0.0
            };
            (rng.gen_range(-0.5..0.5), y, 1)
        };

        cloud[(i, 0)] = x;
        cloud[(i, 1)] = y;
        labels[i] = label;
    }

    (cloud, labels)
}

fn disc_point(radius: f64, rng: &mut impl Rng) -> (f64, f64) {
    let r = radius * rng.gen_range(0.0f64..1.0).sqrt();
    let angle = rng.gen_range(0.0..2.0 * f64::PI());
    (r * angle.cos(), r * angle.sin())
}

/// `n` evenly spaced points on the unit circle.
///
/// The sampling is deterministic; it realises the most evenly spread, or
/// "hyperuniform", configuration on the circle.
pub fn hyperuniform_circle(n: usize) -> Array2<f64> {
    let mut cloud = Array2::zeros((n, 2));

    for (i, mut row) in cloud.rows_mut().into_iter().enumerate() {
        let angle = 2.0 * f64::PI() * i as f64 / n as f64;
        row[0] = angle.cos();
        row[1] = angle.sin();
    }

    cloud
}

/// `n` points on the ellipse with semi-axes `a` and `b`, spaced evenly by
/// arc length.
///
/// The arc length of an ellipse has no closed form, so the perimeter is
/// discretised finely and inverted numerically.
pub fn hyperuniform_ellipse(n: usize, a: f64, b: f64) -> Array2<f64> {
    const RESOLUTION: usize = 4096;

    // cumulative arc length over a fine polygonal approximation
    let mut arc_lengths = Vec::with_capacity(RESOLUTION + 1);
    arc_lengths.push(0.0);

    let mut previous = (a, 0.0);
    for i in 1..=RESOLUTION {
        let angle = 2.0 * f64::PI() * i as f64 / RESOLUTION as f64;
        let current = (a * angle.cos(), b * angle.sin());

        let segment = ((current.0 - previous.0).powi(2) + (current.1 - previous.1).powi(2)).sqrt();
        arc_lengths.push(arc_lengths[i - 1] + segment);
        previous = current;
    }

    let perimeter = arc_lengths[RESOLUTION];
    let mut cloud = Array2::zeros((n, 2));

    let mut segment = 0;
    for (i, mut row) in cloud.rows_mut().into_iter().enumerate() {
        let target = perimeter * i as f64 / n as f64;

        while arc_lengths[segment + 1] < target {
            segment += 1;
        }

        // interpolate the angle within the bracketing segment
        let span = arc_lengths[segment + 1] - arc_lengths[segment];
        let fraction = if span > 0.0 {
            (target - arc_lengths[segment]) / span
        } else {
            0.0
        };
        let angle = 2.0 * f64::PI() * (segment as f64 + fraction) / RESOLUTION as f64;

        row[0] = a * angle.cos();
        row[1] = b * angle.sin();
    }

    cloud
}

/// Add uniform noise from `[0, level)` to every coordinate in place.
pub fn add_uniform_noise(cloud: &mut Array2<f64>, level: f64, rng: &mut impl Rng) {
    if level <= 0.0 {
        return;
    }

    for value in cloud.iter_mut() {
        *value += level * rng.gen_range(0.0..1.0);
    }
}

fn normal(rng: &mut impl Rng) -> f64 {
    StandardNormal.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    fn rng() -> Xoshiro256Plus {
        Xoshiro256Plus::seed_from_u64(42)
    }

    #[test]
    fn annulus_respects_the_radii() {
        let cloud = annulus(256, 0.5, 1.0, &mut rng());

        assert_eq!(cloud.dim(), (256, 2));
        for row in cloud.rows() {
            let radius = (row[0] * row[0] + row[1] * row[1]).sqrt();
            assert!((0.5..=1.0).contains(&radius));
        }
    }

    #[test]
    fn double_annulus_labels_both_components() {
        let (cloud, labels) = double_annulus(100, 0.5, 1.0, &mut rng());

        assert_eq!(cloud.nrows(), 100);
        assert_eq!(labels.iter().filter(|&&l| l == 0).count(), 50);
        assert_eq!(labels.iter().filter(|&&l| l == 1).count(), 50);
    }

    #[test]
    fn petals_form_distinct_clusters() {
        let (cloud, labels) = petals(80, 4, &mut rng());

        assert_eq!(cloud.nrows(), 80);
        assert_eq!(labels.iter().max().unwrap(), &3);

        // every petal centre is on the unit circle, so all points stay
        // within a loose band around it
        for row in cloud.rows() {
            let radius = (row[0] * row[0] + row[1] * row[1]).sqrt();
            assert!(radius < 2.0);
        }
    }

    #[test]
    fn moons_split_into_halves() {
        let (cloud, labels) = moons(64, 0.0, &mut rng());

        assert_eq!(cloud.nrows(), 64);
        assert_eq!(labels.iter().filter(|&&l| l == 0).count(), 32);

        // the noiseless first moon lies on the unit circle
        let radius = (cloud[(0, 0)].powi(2) + cloud[(0, 1)].powi(2)).sqrt();
        assert_abs_diff_eq!(radius, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn blobs_follow_their_centroids() {
        let centroids = ndarray::array![[0.0, 0.0], [20.0, 20.0]];
        let cloud = blobs(50, &centroids, &mut rng());

        assert_eq!(cloud.dim(), (100, 2));

        // blob means approximate the centroids
        let first = cloud.slice(s![..50, ..]).mean_axis(ndarray::Axis(0)).unwrap();
        assert!(first[0].abs() < 1.0 && first[1].abs() < 1.0);
    }

    #[test]
    fn hyperuniform_circle_is_evenly_spaced() {
        let cloud = hyperuniform_circle(8);

        for row in cloud.rows() {
            let radius = (row[0] * row[0] + row[1] * row[1]).sqrt();
            assert_abs_diff_eq!(radius, 1.0, epsilon = 1e-12);
        }

        // consecutive gaps are identical on the circle
        let gap = |i: usize, j: usize| {
            ((cloud[(i, 0)] - cloud[(j, 0)]).powi(2) + (cloud[(i, 1)] - cloud[(j, 1)]).powi(2))
                .sqrt()
        };
        assert_abs_diff_eq!(gap(0, 1), gap(1, 2), epsilon = 1e-12);
    }

    #[test]
    fn hyperuniform_ellipse_spaces_by_arc_length() {
        let cloud = hyperuniform_ellipse(64, 2.0, 1.0);

        assert_eq!(cloud.nrows(), 64);

        // all points satisfy the ellipse equation
        for row in cloud.rows() {
            let value = (row[0] / 2.0).powi(2) + row[1].powi(2);
            assert_abs_diff_eq!(value, 1.0, epsilon = 1e-3);
        }

        // arc-length spacing keeps consecutive gaps nearly constant, which
        // uniform angle sampling does not on an eccentric ellipse
        let gap = |i: usize, j: usize| {
            ((cloud[(i, 0)] - cloud[(j, 0)]).powi(2) + (cloud[(i, 1)] - cloud[(j, 1)]).powi(2))
                .sqrt()
        };
        let first = gap(0, 1);
        for i in 1..63 {
            assert_abs_diff_eq!(gap(i, i + 1), first, epsilon = first * 0.1);
        }
    }

    #[test]
    fn barbell_stays_within_its_silhouette() {
        let (cloud, labels) = barbell(200, 1.0, &mut rng());

        assert_eq!(cloud.nrows(), 200);
        for (row, &label) in cloud.rows().into_iter().zip(labels.iter()) {
            match label {
                0 => assert!(row[0] <= -0.5),
                1 => assert!(row[0].abs() <= 0.5 && row[1].abs() <= 0.1),
                2 => assert!(row[0] >= 0.5),
                _ => unreachable!(),
            }
        }
    }

    #[test]
    fn noise_perturbs_within_bounds() {
        let mut cloud = Array2::zeros((50, 2));
        add_uniform_noise(&mut cloud, 0.1, &mut rng());

        assert!(cloud.iter().all(|&v| (0.0..0.1).contains(&v)));
        assert!(cloud.iter().any(|&v| v > 0.0));
    }

    #[test]
    fn zero_noise_is_a_no_op() {
        let mut cloud = Array2::from_elem((10, 2), 0.5);
        add_uniform_noise(&mut cloud, 0.0, &mut rng());

        assert!(cloud.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn names_dispatch_to_generators() {
        let config = GeneratorConfig {
            n_samples: 30,
            ..GeneratorConfig::default()
        };

        for name in DATASET_NAMES {
            let cloud = from_name(name, &config, &mut rng()).unwrap();
            assert!(cloud.nrows() >= 30);
            assert_eq!(cloud.ncols(), 2);
        }
    }

    #[test]
    fn unknown_names_are_rejected() {
        let res = from_name("klein_bottle", &GeneratorConfig::default(), &mut rng());
        assert!(matches!(res, Err(pecan::Error::UnknownDataset(..))));
    }

    #[test]
    fn degenerate_radii_are_rejected() {
        let config = GeneratorConfig {
            inner_radius: 1.0,
            outer_radius: 0.5,
            ..GeneratorConfig::default()
        };

        let res = from_name("annulus", &config, &mut rng());
        assert!(matches!(res, Err(pecan::Error::Parameters(_))));
    }
}
