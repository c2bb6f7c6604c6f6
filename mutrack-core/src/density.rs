//! Dense-mode binning of point events into stacked discs
//!
//! The view is cut into fixed-width pixel bins. Events inside a bin are
//! grouped by class and every group becomes one disc whose radius grows with
//! its count, saturating towards the busiest bin.

use crate::config::DensityConfig;
use crate::types::{EventKind, Pixel, PointSource};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A mapped point event headed for the binner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityEvent {
    pub kind: EventKind,
    pub class: String,
    pub x: Pixel,
    /// Contribution to the group count: samples for table rows, else 1
    pub weight: usize,
    pub source: PointSource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassGroup {
    pub kind: EventKind,
    pub class: String,
    pub count: usize,
    pub radius: f64,
    /// Distance from the track baseline to the disc centre
    pub cumulative_offset: f64,
    pub sources: Vec<PointSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityBin {
    pub x1: Pixel,
    pub x2: Pixel,
    pub total_count: usize,
    /// Radius of the bin's total count; discs start this far out
    pub offset: f64,
    /// Distance from the baseline to the outer edge of the last disc
    pub extent: f64,
    /// Groups ordered by descending count, most frequent innermost
    pub groups: Vec<ClassGroup>,
}

/// Piecewise-linear count to radius scale anchored on fractions of the
/// largest count.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusScale {
    domain: Vec<f64>,
    range: Vec<f64>,
}

impl RadiusScale {
    pub fn new(max_count: usize, config: &DensityConfig) -> Self {
        let max = max_count as f64;
        let mut domain = vec![1.0];
        let mut range = vec![config.min_radius];

        if max > 1.0 {
            for anchor in &config.anchors {
                let d = anchor.count_fraction * max;
                let r = (anchor.radius_fraction * config.max_radius).max(config.min_radius);
                // anchors collapse onto each other when the maximum is small
                if d > *domain.last().unwrap_or(&1.0) {
                    domain.push(d);
                    range.push(r.max(*range.last().unwrap_or(&config.min_radius)));
                }
            }
            if *domain.last().unwrap_or(&1.0) < max {
                domain.push(max);
                range.push(config.max_radius);
            }
        }

        Self { domain, range }
    }

    pub fn radius(&self, count: usize) -> f64 {
        let c = count as f64;
        let n = self.domain.len();
        if c <= self.domain[0] || n == 1 {
            return self.range[0];
        }
        if c >= self.domain[n - 1] {
            return self.range[n - 1];
        }
        for i in 1..n {
            if c <= self.domain[i] {
                let (d0, d1) = (self.domain[i - 1], self.domain[i]);
                let (r0, r1) = (self.range[i - 1], self.range[i]);
                return r0 + (c - d0) / (d1 - d0) * (r1 - r0);
            }
        }
        self.range[n - 1]
    }

    /// Slope of each segment, in radius per count.
    pub fn slopes(&self) -> Vec<f64> {
        self.domain
            .windows(2)
            .zip(self.range.windows(2))
            .map(|(d, r)| (r[1] - r[0]) / (d[1] - d[0]))
            .collect()
    }
}

/// Bin events across `total_width`. Only bins holding events are returned,
/// in left to right order.
pub fn bin_events(events: &[DensityEvent], total_width: Pixel, config: &DensityConfig) -> Vec<DensityBin> {
    if events.is_empty() || total_width <= 0.0 {
        return Vec::new();
    }

    let bin_width = config.bin_width;
    let bin_count = (total_width / bin_width).ceil().max(1.0) as usize;

    // bin index -> (kind, class) -> (count, sources)
    let mut bins: BTreeMap<usize, BTreeMap<(EventKind, String), (usize, Vec<PointSource>)>> = BTreeMap::new();

    for event in events {
        if !(event.x >= 0.0 && event.x <= total_width) {
            log::debug!("Point at x={} lies outside the view, not binned", event.x);
            continue;
        }
        let index = ((event.x / bin_width).floor() as usize).min(bin_count - 1);
        let group = bins
            .entry(index)
            .or_default()
            .entry((event.kind, event.class.clone()))
            .or_insert_with(|| (0, Vec::new()));
        group.0 += event.weight.max(1);
        group.1.push(event.source);
    }

    let max_total = bins
        .values()
        .map(|groups| groups.values().map(|(count, _)| count).sum::<usize>())
        .max()
        .unwrap_or(0);
    let scale = RadiusScale::new(max_total, config);

    let mut out = Vec::with_capacity(bins.len());
    for (index, groups) in bins {
        let mut groups: Vec<ClassGroup> = groups
            .into_iter()
            .map(|((kind, class), (count, sources))| ClassGroup {
                kind,
                class,
                count,
                radius: scale.radius(count),
                cumulative_offset: 0.0,
                sources,
            })
            .collect();
        groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.class.cmp(&b.class)));

        let total_count: usize = groups.iter().map(|g| g.count).sum();
        let offset = scale.radius(total_count);
        let mut y = offset;
        for group in &mut groups {
            group.cumulative_offset = y + group.radius;
            y += 2.0 * group.radius;
        }

        let x1 = index as f64 * bin_width;
        out.push(DensityBin {
            x1,
            x2: (x1 + bin_width).min(total_width),
            total_count,
            offset,
            extent: y,
            groups,
        });
    }

    log::debug!("Binned {} point events into {} bins (max count {})", events.len(), out.len(), max_total);
    out
}
