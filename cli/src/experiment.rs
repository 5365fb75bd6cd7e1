//! A single condensation experiment: data, condensation, archive.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Args;
use log::info;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use pecan::archive::output_filename;
use pecan::callbacks;
use pecan::prelude::*;
use pecan_datasets::{add_uniform_noise, from_name, load_matrix, GeneratorConfig};

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Data set generator name, or a text file with one sample per line
    #[arg(short, long, default_value = "hyperuniform_ellipse")]
    pub data: String,

    /// Number of samples to generate
    #[arg(short, long, default_value_t = 128)]
    pub num_samples: usize,

    /// Kernel bandwidth; estimated from the data when omitted
    #[arg(short, long)]
    pub epsilon: Option<f64>,

    /// Kernel for the diffusion condensation process
    #[arg(short, long, default_value = "gaussian")]
    pub kernel: String,

    /// Weight of the current operator when mixing in the memory of
    /// previous operators; one disables the memory
    #[arg(short, long, default_value_t = 1.0)]
    pub alpha: f64,

    /// Random seed; derived from the wall clock when omitted
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Uniform noise level added to the data set
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Inner radius for annuli and related data sets
    #[arg(short = 'r', default_value_t = 0.5)]
    pub inner_radius: f64,

    /// Outer radius for annuli and related data sets
    #[arg(short = 'R', default_value_t = 1.0)]
    pub outer_radius: f64,

    /// Beta parameter for distributions that support one
    #[arg(short, long, default_value_t = 1.0)]
    pub beta: f64,

    /// Callback names; diffusion and persistent homology when omitted
    #[arg(short, long, num_args(1..))]
    pub callbacks: Option<Vec<String>>,

    /// Output directory (the filename is generated automatically) or
    /// output filename
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Overwrite existing output files
    #[arg(short, long)]
    pub force: bool,
}

/// Run one experiment and return the path of the written archive.
pub fn run(args: RunArgs) -> Result<PathBuf> {
    let seed = args.seed.unwrap_or_else(wall_clock_seed);
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);

    let mut cloud = if Path::new(&args.data).is_file() {
        info!("loading point cloud from {}", args.data);
        load_matrix(&args.data)?
    } else {
        info!("using generator routine '{}'", args.data);
        let config = GeneratorConfig {
            n_samples: args.num_samples,
            inner_radius: args.inner_radius,
            outer_radius: args.outer_radius,
            beta: args.beta,
            ..GeneratorConfig::default()
        };
        from_name(&args.data, &config, &mut rng)?
    };

    if args.noise > 0.0 {
        add_uniform_noise(&mut cloud, args.noise, &mut rng);
    }

    info!("data set: {}", args.data);
    info!("number of samples: {}", cloud.nrows());
    info!("random seed: {}", seed);

    let output = resolve_output(&args, seed);

    // check early on whether there is anything to do at all
    if output.exists() && !args.force {
        return Err(Error::ArchiveExists(output));
    }

    let kernel: KernelMethod<f64> = args.kernel.parse()?;
    let params = DiffusionCondensation::params()
        .epsilon_opt(args.epsilon)
        .alpha(args.alpha)
        .kernel(kernel)
        .check()?;

    let mut observers = match &args.callbacks {
        Some(names) => callbacks::from_names(names),
        None => callbacks::default_callbacks(),
    };

    let run = params.condense(&cloud, &mut observers)?;
    info!("epsilon: {:.4}", run.epsilon());

    let mut builder = run.to_archive();
    for observer in &mut observers {
        observer.finalise(&mut builder)?;
    }
    builder.insert_scalar("seed", seed as f64);

    info!("storing results in {}", output.display());
    builder.write(&output)?;

    Ok(output)
}

/// Archive path of an experiment: inside a directory the filename is
/// generated from the experiment parameters, otherwise the given path is
/// used verbatim.
pub fn resolve_output(args: &RunArgs, seed: u64) -> PathBuf {
    if args.output.is_dir() {
        args.output.join(output_filename(
            &args.data,
            args.num_samples,
            args.inner_radius,
            args.alpha,
            seed,
        ))
    } else {
        args.output.clone()
    }
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}
