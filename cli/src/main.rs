//! Command line entry point for diffusion condensation experiments.

use clap::{Parser, Subcommand};
use log::error;

mod analyse;
mod experiment;
mod sweep;

#[derive(Parser)]
#[command(name = "pecan")]
#[command(
    version,
    about = "Run, sweep and analyse diffusion condensation experiments"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single condensation experiment and archive the result
    Run(experiment::RunArgs),
    /// Run a grid of experiments, one archive per parameter combination
    Sweep(sweep::SweepArgs),
    /// Summarise archived runs as tab-separated metric-space statistics
    Analyse(analyse::AnalyseArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Run(args) => experiment::run(args).map(|_| ()),
        Command::Sweep(args) => sweep::run(args),
        Command::Analyse(args) => analyse::run(args),
    };

    if let Err(err) = result {
        error!("{}", err);
        std::process::exit(1);
    }
}
