//! beatchart - chart a song from its onset curve
//!
//! # Usage
//!
//! ```bash
//! # Chart to stdout, stage summary on stderr
//! beatchart song.yaml onsets.json
//!
//! # Write the chart to a file with a different seed
//! beatchart song.yaml onsets.json -o chart.json --seed 7
//!
//! # Start a song spec from the built-in six-stage ramp
//! beatchart --print-default-spec > song.yaml
//! ```
//!
//! Set `RUST_LOG=beatchart=debug` for per-stage intermediate counts.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use beatchart::{format_summary, generate_chart, to_chart_json, OnsetCurve, SongSpec};

/// Generate a four-lane rhythm chart from an onset curve
#[derive(Parser)]
#[command(name = "beatchart")]
#[command(version)]
struct Cli {
    /// Song spec (YAML)
    #[arg(required_unless_present = "print_default_spec")]
    song: Option<PathBuf>,

    /// Onset curve (JSON with `times` and `strengths`)
    #[arg(required_unless_present = "print_default_spec")]
    onsets: Option<PathBuf>,

    /// Write the chart here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Override the spec's lane seed
    #[arg(long)]
    seed: Option<u64>,

    /// Pin the grid phase in seconds instead of estimating it
    #[arg(long)]
    phase: Option<f64>,

    /// Print the default song spec and exit
    #[arg(long)]
    print_default_spec: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.print_default_spec {
        print!("{}", SongSpec::default().to_yaml()?);
        return Ok(());
    }

    let (Some(song_path), Some(onset_path)) = (cli.song, cli.onsets) else {
        anyhow::bail!("both a song spec and an onset curve are required");
    };

    let song_source = fs::read_to_string(&song_path)
        .with_context(|| format!("Failed to read song spec '{}'", song_path.display()))?;
    let mut spec = SongSpec::from_yaml(&song_source)
        .with_context(|| format!("Failed to parse song spec '{}'", song_path.display()))?;

    let onset_source = fs::read_to_string(&onset_path)
        .with_context(|| format!("Failed to read onset curve '{}'", onset_path.display()))?;
    let curve = OnsetCurve::from_json(&onset_source)
        .with_context(|| format!("Failed to parse onset curve '{}'", onset_path.display()))?;

    if let Some(seed) = cli.seed {
        spec.seed = seed;
    }
    if let Some(phase) = cli.phase {
        spec.phase = Some(phase);
    }

    let report = generate_chart(&spec, &curve)?;
    let json = to_chart_json(&report.notes)?;

    match cli.output {
        Some(path) => {
            fs::write(&path, &json)
                .with_context(|| format!("Failed to write chart to '{}'", path.display()))?;
            eprintln!("Wrote {} notes to {}", report.notes.len(), path.display());
        }
        None => println!("{}", json),
    }
    eprint!("{}", format_summary(&report));

    Ok(())
}
