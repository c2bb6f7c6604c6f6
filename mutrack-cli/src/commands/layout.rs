//! Layout command implementation - run one layout pass over a JSON request

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::CliError;
use crate::{CoordinateArg, ModeArg};
use mutrack_core::io::{read_layout_request, write_layout_output};
use mutrack_core::{compute_layout, CharWidthMeasure, CoordinateMode, DisplayMode, LayoutError, LayoutOutcome};

/// Options for a layout run, resolved from flags.
#[derive(Debug, Clone, Default)]
pub struct LayoutArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub mode: Option<ModeArg>,
    pub coordinates: Option<CoordinateArg>,
    pub bin_width: Option<f64>,
    pub interpolate_rows: bool,
    pub pretty: bool,
}

pub fn execute(config: &Config, args: LayoutArgs) -> Result<()> {
    log::info!("Starting layout pass");
    log::info!("Input request: {}", args.input.display());

    if !args.input.exists() {
        return Err(CliError::file_not_found(args.input.clone()).into());
    }

    let mut layout_config = config.layout.clone();
    if let Some(bin_width) = args.bin_width {
        layout_config.density.bin_width = bin_width;
    }
    if args.interpolate_rows {
        layout_config.row_heights.interpolate = true;
    }
    layout_config.validate().map_err(CliError::from)?;

    let mut input = read_layout_request(&args.input).map_err(|err| {
        if err.downcast_ref::<LayoutError>().is_some() {
            anyhow::Error::from(CliError::invalid_request(format!("{:#}", err)))
        } else {
            err
        }
    })?;

    if let Some(mode) = args.mode.map(DisplayMode::from).or(config.general.mode) {
        input.mode = mode;
    }
    if let Some(coordinates) = args.coordinates {
        input.coordinate_mode = coordinates.into();
    }
    log::info!(
        "Request: {} regions, {} sample groups, {} point events, {:?} mode",
        input.regions.len(),
        input.groups.len(),
        input.point_events.len(),
        input.mode
    );

    let measure = CharWidthMeasure::from_config(&layout_config.labels);
    let outcome = compute_layout(&input, &layout_config, &measure).map_err(CliError::from)?;
    report(&outcome);

    let pretty = args.pretty || config.general.pretty;
    match &args.output {
        Some(path) => write_to_file(path, &outcome, pretty)?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            write_layout_output(&mut handle, &outcome, pretty).context("Failed to write layout")?;
            writeln!(handle)?;
        }
    }

    log::info!("Layout completed successfully");
    Ok(())
}

fn write_to_file(path: &Path, outcome: &LayoutOutcome, pretty: bool) -> Result<()> {
    let file = File::create(path).with_context(|| format!("Failed to create output file {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    write_layout_output(&mut writer, outcome, pretty)
        .with_context(|| format!("Failed to write layout to {}", path.display()))?;
    writer.flush()?;
    log::info!("Layout written to {}", path.display());
    Ok(())
}

fn report(outcome: &LayoutOutcome) {
    let stats = outcome.stats();
    log::info!(
        "Events: {} seen, {} mapped, {} unmapped, {} hidden, {} duplicate junctions, {} duplicate variants",
        stats.events_seen,
        stats.events_mapped,
        stats.events_unmapped,
        stats.events_filtered,
        stats.duplicate_junctions,
        stats.duplicate_variants
    );
    match outcome {
        LayoutOutcome::Ready(output) => log::info!(
            "{} samples kept ({} dropped), track height {}px, width {:.1}px",
            output.sample_count(),
            stats.samples_dropped,
            output.total_height(),
            output.total_width
        ),
        LayoutOutcome::NoData { .. } => log::warn!("No data in view range"),
    }
}

impl From<ModeArg> for DisplayMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Dense => DisplayMode::Dense,
            ModeArg::Expanded => DisplayMode::Expanded,
        }
    }
}

impl From<CoordinateArg> for CoordinateMode {
    fn from(coordinates: CoordinateArg) -> Self {
        match coordinates {
            CoordinateArg::Genomic => CoordinateMode::Genomic,
            CoordinateArg::Transcript => CoordinateMode::Transcript,
        }
    }
}
