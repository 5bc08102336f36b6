use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use nucleorad::summary::DEFAULT_BINS;
use nucleorad::utils::sampling::sample_boundary;
use nucleorad::{compute_metrics, table, MetricsSummary};

#[derive(Parser)]
#[command(name = "nucleorad")]
#[command(about = "Radial positions of centromeres inside a fitted nucleus ellipse")]
struct Cmd {
    /// Measurement CSV; the last row describes the nucleus
    input: PathBuf,

    /// Augmented table [default: <input stem>_radial.csv next to the input]
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Write descriptive statistics and histograms as JSON
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Write sampled ellipse boundary points as an X,Y CSV
    #[arg(long)]
    boundary: Option<PathBuf>,

    #[arg(long, default_value_t = 360)]
    boundary_samples: usize,

    /// Histogram bins per metric
    #[arg(long, default_value_t = DEFAULT_BINS)]
    bins: usize,

    /// Log at debug level unless RUST_LOG is set
    #[arg(long, short)]
    verbose: bool,
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "measurements".to_owned());
    input.with_file_name(format!("{stem}_radial.csv"))
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();

    let default_level = if cmd.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    run(&cmd)
}

fn run(cmd: &Cmd) -> Result<()> {
    let df = table::read_table(&cmd.input)
        .with_context(|| format!("reading {}", cmd.input.display()))?;
    let (ellipse, points) = table::split_table(&df)?;

    tracing::info!(
        center_x = ellipse.center().x,
        center_y = ellipse.center().y,
        semi_major = ellipse.semi_major(),
        semi_minor = ellipse.semi_minor(),
        rotation = ellipse.rotation(),
        points = points.len(),
        "nucleus"
    );
    if ellipse.semi_minor() > ellipse.semi_major() {
        tracing::warn!("MinFeret exceeds Feret; the local x-axis is the shorter axis");
    }

    let metrics = compute_metrics(&ellipse, &points);
    let summary = MetricsSummary::new(&ellipse, &metrics, cmd.bins)?;
    if summary.inside < summary.points {
        tracing::warn!(
            outside = summary.points - summary.inside,
            total = summary.points,
            "points lie outside the nucleus ellipse"
        );
    }

    let output = cmd.output.clone().unwrap_or_else(|| default_output(&cmd.input));
    let mut augmented = table::augment_table(&df, &metrics)?;
    table::write_table(&output, &mut augmented)
        .with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(path = %output.display(), "wrote radial metrics");

    tracing::info!("distance statistics\n{summary}");

    if let Some(path) = &cmd.summary {
        let file = table::create_file(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &summary)?;
        tracing::info!(path = %path.display(), "wrote summary");
    }

    if let Some(path) = &cmd.boundary {
        let mut boundary = table::points_table(&sample_boundary(&ellipse, cmd.boundary_samples))?;
        table::write_table(path, &mut boundary)
            .with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), samples = cmd.boundary_samples, "wrote boundary");
    }

    Ok(())
}
