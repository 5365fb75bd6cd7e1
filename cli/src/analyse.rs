//! Tab-separated metric-space summaries of archived runs.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;

use pecan::analysis::{MetricSpaceSummary, N_EIGENVALUES};
use pecan::archive::Archive;
use pecan::Result;

#[derive(Args, Debug)]
pub struct AnalyseArgs {
    /// Archives to analyse
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Measure Hausdorff distances from the initial cloud instead of
    /// between consecutive time steps
    #[arg(short, long)]
    pub origin: bool,
}

pub fn run(args: AnalyseArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    write_header(&mut out)?;

    for input in &args.inputs {
        let archive = Archive::read(input)?;
        let summary = MetricSpaceSummary::from_archive(&archive, args.origin)?;
        write_summary(&mut out, &input.display().to_string(), &summary)?;
    }

    Ok(())
}

fn write_header(out: &mut impl Write) -> io::Result<()> {
    write!(out, "filename\tt\thausdorff_distance\tdiameter")?;
    for i in 0..N_EIGENVALUES {
        write!(out, "\teigenvalue_{}", i)?;
    }
    writeln!(out)
}

fn write_summary(
    out: &mut impl Write,
    filename: &str,
    summary: &MetricSpaceSummary,
) -> io::Result<()> {
    for step in &summary.steps {
        write!(
            out,
            "{}\t{}\t{}\t{}",
            filename, step.t, step.hausdorff_distance, step.diameter
        )?;

        for i in 0..N_EIGENVALUES {
            match step.eigenvalues.get(i) {
                Some(eigenvalue) => write!(out, "\t{}", eigenvalue)?,
                // tiny clouds have fewer eigenvalues than columns
                None => write!(out, "\t")?,
            }
        }

        writeln!(out)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pecan::analysis::StepSummary;

    #[test]
    fn summaries_render_as_tsv_rows() {
        let summary = MetricSpaceSummary {
            steps: vec![StepSummary {
                t: 0,
                hausdorff_distance: 0.5,
                diameter: 2.0,
                eigenvalues: vec![1.0, 0.25],
            }],
        };

        let mut buffer = Vec::new();
        write_header(&mut buffer).unwrap();
        write_summary(&mut buffer, "toy.npz", &summary).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("filename\tt\thausdorff_distance\tdiameter"));
        assert!(header.ends_with("eigenvalue_9"));

        let row = lines.next().unwrap();
        assert!(row.starts_with("toy.npz\t0\t0.5\t2"));
        // two eigenvalues, eight empty columns
        assert_eq!(row.matches('\t').count(), 13);
    }
}
