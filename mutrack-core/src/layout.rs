//! The full layout pass
//!
//! `compute_layout` reads an immutable [`LayoutInput`] and returns freshly
//! allocated geometry. Legend aggregates and statistics are part of the
//! output; nothing outside the call is mutated.

use crate::assemble::{LayoutStats, LegendSummary, SampleGroupAssembler, SampleGroupLayout, SampleLayout};
use crate::config::LayoutConfig;
use crate::coords::{CoordinateMapper, PixelSpan};
use crate::density::{bin_events, DensityBin};
use crate::error::LayoutResult;
use crate::labels::{LabelPlacer, LabelRequest, TextMeasure};
use crate::types::{DisplayMode, LayoutInput, Pixel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOutput {
    pub mode: DisplayMode,
    pub total_width: Pixel,
    pub groups: Vec<SampleGroupLayout>,
    /// Only populated in dense mode
    pub density_bins: Vec<DensityBin>,
    pub legend: LegendSummary,
    pub stats: LayoutStats,
}

impl LayoutOutput {
    pub fn total_height(&self) -> u32 {
        self.groups.iter().map(|g| g.height).sum()
    }

    pub fn sample_count(&self) -> usize {
        self.groups.iter().map(|g| g.samples.len()).sum()
    }
}

/// Result of a pass. An empty view is an expected outcome the host answers
/// by clearing the track, so it is not an error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LayoutOutcome {
    Ready(LayoutOutput),
    NoData { stats: LayoutStats },
}

impl LayoutOutcome {
    pub fn output(&self) -> Option<&LayoutOutput> {
        match self {
            LayoutOutcome::Ready(output) => Some(output),
            LayoutOutcome::NoData { .. } => None,
        }
    }

    pub fn into_output(self) -> Option<LayoutOutput> {
        match self {
            LayoutOutcome::Ready(output) => Some(output),
            LayoutOutcome::NoData { .. } => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, LayoutOutcome::NoData { .. })
    }

    pub fn stats(&self) -> &LayoutStats {
        match self {
            LayoutOutcome::Ready(output) => &output.stats,
            LayoutOutcome::NoData { stats } => stats,
        }
    }
}

/// Run one layout pass.
///
/// Fails only on invalid configuration or malformed regions. Events that
/// fall outside the view are dropped and counted in the statistics.
pub fn compute_layout(
    input: &LayoutInput,
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> LayoutResult<LayoutOutcome> {
    config.validate()?;

    if input.regions.is_empty() {
        log::warn!("Layout requested with an empty region list");
    }
    let mapper = CoordinateMapper::new(&input.regions, input.coordinate_mode, config)?;
    let total_width = mapper.total_width();

    let assembled = SampleGroupAssembler::new(&mapper, config, input.mode).assemble(input);
    let mut groups = assembled.groups;

    let density_bins = match input.mode {
        DisplayMode::Dense => bin_events(&assembled.density_events, total_width, &config.density),
        DisplayMode::Expanded => {
            let placer = LabelPlacer::new(&config.labels, measure);
            for sample in groups.iter_mut().flat_map(|g| g.samples.iter_mut()) {
                place_sample_labels(sample, &placer, total_width);
            }
            Vec::new()
        }
    };

    if groups.is_empty() && density_bins.is_empty() {
        log::info!("No data in view range ({} events seen)", assembled.stats.events_seen);
        return Ok(LayoutOutcome::NoData { stats: assembled.stats });
    }

    let output = LayoutOutput {
        mode: input.mode,
        total_width,
        groups,
        density_bins,
        legend: assembled.legend,
        stats: assembled.stats,
    };
    log::info!(
        "Laid out {} samples in {} groups, {} density bins, height {}px",
        output.sample_count(),
        output.groups.len(),
        output.density_bins.len(),
        output.total_height()
    );
    Ok(LayoutOutcome::Ready(output))
}

/// Points of an assembled sample are already sorted by x.
fn place_sample_labels(sample: &mut SampleLayout, placer: &LabelPlacer<'_>, total_width: Pixel) {
    if sample.points.is_empty() {
        return;
    }
    let intervals: Vec<PixelSpan> = sample.intervals.iter().map(|i| i.span()).collect();
    let requests: Vec<LabelRequest<'_>> = sample
        .points
        .iter()
        .map(|p| LabelRequest { x: p.x, label: p.label.as_deref() })
        .collect();

    let placements = placer.place(&requests, &intervals, total_width);
    for (point, placement) in sample.points.iter_mut().zip(placements) {
        point.label_side = placement.side;
        point.label_width = placement.width;
    }
}
