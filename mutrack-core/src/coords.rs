//! Genomic to pixel coordinate mapping across the regions of one view
//!
//! Regions are laid out left to right in display order: main regions first,
//! then sub-panels. Each one owns a horizontal pixel band that never
//! overlaps another.

use crate::config::LayoutConfig;
use crate::error::{LayoutError, LayoutResult};
use crate::types::*;
use serde::{Deserialize, Serialize};

/// A region with its pixel band resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub chr: String,
    pub start: GenomicPos,
    pub stop: GenomicPos,
    pub width: Pixel,
    /// Pixels per base
    pub scale: f64,
    pub left_offset: Pixel,
    pub is_subpanel: bool,
    pub reversed: bool,
}

impl Region {
    pub fn right(&self) -> Pixel {
        self.left_offset + self.width
    }

    /// Half-open: `stop` belongs to whatever region follows.
    pub fn contains(&self, chr: &str, pos: GenomicPos) -> bool {
        self.chr == chr && pos >= self.start && pos < self.stop
    }

    pub fn overlaps(&self, chr: &str, start: GenomicPos, stop: GenomicPos) -> bool {
        self.chr == chr && start < self.stop && stop > self.start
    }

    /// Linear projection of a position, extrapolated past the region ends.
    fn project(&self, pos: f64) -> Pixel {
        if self.reversed {
            self.left_offset + (self.stop as f64 - pos) * self.scale
        } else {
            self.left_offset + (pos - self.start as f64) * self.scale
        }
    }

    /// Projection of a position known to lie inside the region, kept inside
    /// the region's band.
    fn to_pixel(&self, pos: GenomicPos) -> Pixel {
        self.project(pos as f64).clamp(self.left_offset, self.right())
    }
}

/// Mapped horizontal extent with `x1 < x2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelSpan {
    pub x1: Pixel,
    pub x2: Pixel,
}

impl PixelSpan {
    pub fn new(x1: Pixel, x2: Pixel) -> Self {
        Self { x1, x2 }
    }

    pub fn width(&self) -> Pixel {
        self.x2 - self.x1
    }

    pub fn overlaps(&self, other: &PixelSpan) -> bool {
        self.x1 < other.x2 && other.x1 < self.x2
    }
}

/// Which way to snap an endpoint that falls between two exons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Snap {
    Next,
    Previous,
}

#[derive(Debug, Clone)]
pub struct CoordinateMapper {
    regions: Vec<Region>,
    total_width: Pixel,
    mode: CoordinateMode,
    min_interval_width: Pixel,
}

impl CoordinateMapper {
    /// Resolve region pixel bands. Main regions keep their relative order
    /// and precede sub-panels, which are ordered by sub-panel index.
    pub fn new(specs: &[RegionSpec], mode: CoordinateMode, config: &LayoutConfig) -> LayoutResult<Self> {
        if specs.is_empty() {
            return Err(LayoutError::NoRegions);
        }

        for (index, spec) in specs.iter().enumerate() {
            validate_region(index, spec)?;
        }

        let mut ordered: Vec<(usize, &RegionSpec)> = specs.iter().enumerate().collect();
        ordered.sort_by_key(|(index, spec)| match spec.subpanel_index {
            None => (0, 0, *index),
            Some(sub) => (1, sub, *index),
        });

        let mut regions = Vec::with_capacity(specs.len());
        let mut cursor = 0.0;
        for (position, (_, spec)) in ordered.into_iter().enumerate() {
            let is_subpanel = spec.subpanel_index.is_some();
            let gap = spec.left_pad.unwrap_or(if position == 0 {
                0.0
            } else if is_subpanel {
                config.subpanel_gap
            } else {
                config.region_gap
            });
            let left_offset = cursor + gap;
            let bases = (spec.stop - spec.start) as f64;
            let scale = spec.exon_scale_factor.unwrap_or(spec.width / bases);

            regions.push(Region {
                chr: spec.chr.clone(),
                start: spec.start,
                stop: spec.stop,
                width: spec.width,
                scale,
                left_offset,
                is_subpanel,
                reversed: spec.reverse,
            });
            cursor = left_offset + spec.width;
        }

        log::debug!("Resolved {} regions, total width {:.1}px", regions.len(), cursor);

        Ok(Self {
            regions,
            total_width: cursor,
            mode,
            min_interval_width: config.min_interval_width,
        })
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn total_width(&self) -> Pixel {
        self.total_width
    }

    pub fn mode(&self) -> CoordinateMode {
        self.mode
    }

    /// Map a point. The first region containing it wins.
    pub fn map_point(&self, chr: &str, pos: GenomicPos) -> Option<Pixel> {
        self.regions
            .iter()
            .find(|region| region.contains(chr, pos))
            .map(|region| region.to_pixel(pos))
    }

    /// Map `[start, stop)`. Returns `None` when nothing of it is in view.
    pub fn map_interval(&self, chr: &str, start: GenomicPos, stop: GenomicPos) -> Option<PixelSpan> {
        let (start, stop) = if stop < start { (stop, start) } else { (start, stop) };
        // zero-length events (insertions) still cover their base
        let stop = stop.max(start.saturating_add(1));

        let raw = match self.mode {
            CoordinateMode::Genomic => self.map_linear(chr, start, stop)?,
            CoordinateMode::Transcript => self.map_transcript(chr, start, stop)?,
        };
        self.finish_span(raw)
    }

    /// Clamp the interval to each overlapping region; x1 comes from the
    /// first overlapping region and x2 from the last.
    fn map_linear(&self, chr: &str, start: GenomicPos, stop: GenomicPos) -> Option<PixelSpan> {
        let mut first: Option<PixelSpan> = None;
        let mut last: Option<PixelSpan> = None;

        for region in self.regions.iter().filter(|r| r.overlaps(chr, start, stop)) {
            let a = region.to_pixel(start.max(region.start));
            let b = region.to_pixel(stop.min(region.stop));
            let span = PixelSpan::new(a.min(b), a.max(b));
            if first.is_none() {
                first = Some(span);
            }
            last = Some(span);
        }

        let (first, last) = (first?, last?);
        Some(PixelSpan::new(first.x1, first.x2.max(last.x2)))
    }

    /// Project both endpoints through the exon model, extrapolating outside
    /// it, and reject spans whose direction disagrees with the orientation
    /// of the region they start in.
    fn map_transcript(&self, chr: &str, start: GenomicPos, stop: GenomicPos) -> Option<PixelSpan> {
        let (xs, reversed) = self.project_endpoint(chr, start, Snap::Next)?;
        let (xe, _) = self.project_endpoint(chr, stop, Snap::Previous)?;

        let inverted = if reversed { xe > xs } else { xe < xs };
        if inverted {
            log::debug!("Dropping {}:{}-{}: direction inverts across regions", chr, start, stop);
            return None;
        }
        Some(PixelSpan::new(xs.min(xe), xs.max(xe)))
    }

    fn project_endpoint(&self, chr: &str, pos: GenomicPos, snap: Snap) -> Option<(Pixel, bool)> {
        let candidates: Vec<&Region> = self.regions.iter().filter(|r| r.chr == chr).collect();
        if candidates.is_empty() {
            return None;
        }

        if let Some(region) = candidates.iter().find(|r| pos >= r.start && pos <= r.stop) {
            return Some((region.project(pos as f64), region.reversed));
        }

        let next = candidates.iter().filter(|r| r.start > pos).min_by_key(|r| r.start);
        let previous = candidates.iter().filter(|r| r.stop < pos).max_by_key(|r| r.stop);

        match (previous, next) {
            // inside an intron
            (Some(prev), Some(next)) => match snap {
                Snap::Next => Some((next.project(next.start as f64), next.reversed)),
                Snap::Previous => Some((prev.project(prev.stop as f64), prev.reversed)),
            },
            // before the first exon or after the last one
            (None, Some(region)) | (Some(region), None) => {
                Some((region.project(pos as f64), region.reversed))
            }
            (None, None) => None,
        }
    }

    /// Widen slivers to the minimum width, clip to the view and drop what
    /// is left empty.
    fn finish_span(&self, span: PixelSpan) -> Option<PixelSpan> {
        let PixelSpan { mut x1, mut x2 } = span;
        if !x1.is_finite() || !x2.is_finite() {
            return None;
        }
        if x2 <= 0.0 || x1 >= self.total_width {
            return None;
        }

        if x2 - x1 < self.min_interval_width {
            x2 = x1 + self.min_interval_width;
            if x2 > self.total_width {
                x2 = self.total_width;
                x1 = (x2 - self.min_interval_width).max(0.0);
            }
        }

        x1 = x1.max(0.0);
        x2 = x2.min(self.total_width);
        if x1 < x2 {
            Some(PixelSpan::new(x1, x2))
        } else {
            None
        }
    }
}

fn validate_region(index: usize, spec: &RegionSpec) -> LayoutResult<()> {
    if spec.chr.is_empty() {
        return Err(LayoutError::region(index, "chromosome name is empty"));
    }
    if spec.stop <= spec.start {
        return Err(LayoutError::region(
            index,
            format!("stop ({}) must be greater than start ({})", spec.stop, spec.start),
        ));
    }
    if !(spec.width.is_finite() && spec.width > 0.0) {
        return Err(LayoutError::region(index, format!("width must be positive, got {}", spec.width)));
    }
    if let Some(sf) = spec.exon_scale_factor {
        if !(sf.is_finite() && sf > 0.0) {
            return Err(LayoutError::region(index, format!("exonScaleFactor must be positive, got {}", sf)));
        }
    }
    if let Some(pad) = spec.left_pad {
        if !(pad.is_finite() && pad >= 0.0) {
            return Err(LayoutError::region(index, format!("leftPad must be >= 0, got {}", pad)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper(specs: Vec<RegionSpec>) -> CoordinateMapper {
        CoordinateMapper::new(&specs, CoordinateMode::Genomic, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_single_region_point_mapping() {
        let m = mapper(vec![RegionSpec::new("chr2", 0, 1000, 1000.0)]);
        assert_eq!(m.total_width(), 1000.0);
        assert_eq!(m.map_point("chr2", 0), Some(0.0));
        assert_eq!(m.map_point("chr2", 500), Some(500.0));
        assert_eq!(m.map_point("chr2", 999), Some(999.0));
        assert_eq!(m.map_point("chr2", 1000), None);
        assert_eq!(m.map_point("chr5", 500), None);
    }

    #[test]
    fn test_unknown_chromosome_is_unmapped() {
        let m = mapper(vec![RegionSpec::new("chr2", 0, 1000, 1000.0)]);
        assert_eq!(m.map_interval("chr5", 10, 20), None);
    }

    #[test]
    fn test_interval_clipped_to_region() {
        let m = mapper(vec![RegionSpec::new("chr1", 1000, 2000, 500.0)]);
        let span = m.map_interval("chr1", 500, 1500).unwrap();
        assert_eq!(span, PixelSpan::new(0.0, 250.0));

        let span = m.map_interval("chr1", 1800, 5000).unwrap();
        assert_eq!(span, PixelSpan::new(400.0, 500.0));

        assert_eq!(m.map_interval("chr1", 0, 999), None);
        assert_eq!(m.map_interval("chr1", 2000, 3000), None);
    }

    #[test]
    fn test_regions_get_running_offsets() {
        let m = mapper(vec![
            RegionSpec::new("chr1", 0, 100, 100.0),
            RegionSpec::new("chr1", 500, 600, 200.0),
        ]);
        let regions = m.regions();
        assert_eq!(regions[0].left_offset, 0.0);
        assert_eq!(regions[1].left_offset, 110.0);
        assert_eq!(m.total_width(), 310.0);
        assert_eq!(m.map_point("chr1", 550), Some(210.0));
    }

    #[test]
    fn test_subpanels_follow_main_regions() {
        let m = mapper(vec![
            RegionSpec::new("chr7", 0, 100, 50.0).as_subpanel(0),
            RegionSpec::new("chr1", 0, 100, 100.0),
        ]);
        let regions = m.regions();
        assert_eq!(regions[0].chr, "chr1");
        assert!(!regions[0].is_subpanel);
        assert!(regions[1].is_subpanel);
        assert_eq!(regions[1].left_offset, 120.0);
    }

    #[test]
    fn test_interval_spanning_into_subpanel() {
        let m = mapper(vec![
            RegionSpec::new("chr1", 0, 100, 100.0),
            RegionSpec::new("chr1", 100, 200, 100.0).as_subpanel(0),
        ]);
        let span = m.map_interval("chr1", 50, 150).unwrap();
        assert_eq!(span.x1, 50.0);
        assert_eq!(span.x2, 170.0);
    }

    #[test]
    fn test_shared_boundary_maps_to_following_region() {
        let m = mapper(vec![
            RegionSpec::new("chr1", 0, 100, 100.0),
            RegionSpec::new("chr1", 100, 200, 100.0).as_subpanel(0),
        ]);
        assert_eq!(m.map_point("chr1", 99), Some(99.0));
        assert_eq!(m.map_point("chr1", 100), Some(120.0));
        assert_eq!(m.map_point("chr1", 200), None);
    }

    #[test]
    fn test_reversed_region_inverts_direction() {
        let m = mapper(vec![RegionSpec::new("chr3", 0, 100, 100.0).reversed()]);
        assert_eq!(m.map_point("chr3", 10), Some(90.0));
        assert_eq!(m.map_point("chr3", 90), Some(10.0));
        let span = m.map_interval("chr3", 10, 30).unwrap();
        assert_eq!(span, PixelSpan::new(70.0, 90.0));
    }

    #[test]
    fn test_sliver_widened_to_minimum() {
        let m = mapper(vec![RegionSpec::new("chr1", 0, 1_000_000, 100.0)]);
        let span = m.map_interval("chr1", 5000, 5001).unwrap();
        assert!((span.width() - 1.0).abs() < 1e-9);

        let edge = m.map_interval("chr1", 999_999, 1_000_000).unwrap();
        assert_eq!(edge.x2, 100.0);
        assert!((edge.width() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_exon_scale_factor_is_used() {
        let mut spec = RegionSpec::new("chr1", 0, 100, 100.0);
        spec.exon_scale_factor = Some(0.5);
        let m = mapper(vec![spec]);
        assert_eq!(m.map_point("chr1", 40), Some(20.0));
    }

    #[test]
    fn test_malformed_regions_rejected() {
        let config = LayoutConfig::default();
        let bad = vec![RegionSpec::new("chr1", 100, 100, 10.0)];
        assert!(matches!(
            CoordinateMapper::new(&bad, CoordinateMode::Genomic, &config),
            Err(LayoutError::MalformedRegion { index: 0, .. })
        ));

        let bad = vec![RegionSpec::new("chr1", 0, 100, 10.0), RegionSpec::new("", 0, 100, 10.0)];
        assert!(matches!(
            CoordinateMapper::new(&bad, CoordinateMode::Genomic, &config),
            Err(LayoutError::MalformedRegion { index: 1, .. })
        ));

        assert!(matches!(
            CoordinateMapper::new(&[], CoordinateMode::Genomic, &config),
            Err(LayoutError::NoRegions)
        ));
    }

    fn exon_model(reversed: bool) -> CoordinateMapper {
        exon_model_with_pad(reversed, Some(0.0))
    }

    /// Two exons of one gene, 100-200 and 300-400. `None` keeps the
    /// configured region gap between them.
    fn exon_model_with_pad(reversed: bool, left_pad: Option<f64>) -> CoordinateMapper {
        let exons = [(100, 200), (300, 400)];
        let specs: Vec<RegionSpec> = exons
            .iter()
            .map(|&(s, e)| {
                let mut spec = RegionSpec::new("chr9", s, e, 100.0);
                spec.left_pad = left_pad;
                spec.reverse = reversed;
                spec
            })
            .collect();
        let specs = if reversed { specs.into_iter().rev().collect() } else { specs };
        CoordinateMapper::new(&specs, CoordinateMode::Transcript, &LayoutConfig::default()).unwrap()
    }

    #[test]
    fn test_transcript_mode_snaps_intron_endpoints() {
        let m = exon_model(false);
        // starts in the intron: snapped to the second exon's start
        let span = m.map_interval("chr9", 250, 350).unwrap();
        assert_eq!(span, PixelSpan::new(100.0, 150.0));
        // ends in the intron: snapped to the first exon's end
        let span = m.map_interval("chr9", 150, 250).unwrap();
        assert_eq!(span, PixelSpan::new(50.0, 100.0));
    }

    #[test]
    fn test_transcript_mode_clips_extrapolated_ends() {
        let m = exon_model(false);
        let span = m.map_interval("chr9", 50, 150).unwrap();
        assert_eq!(span, PixelSpan::new(0.0, 50.0));
        assert_eq!(m.map_interval("chr9", 10, 60), None);
        assert_eq!(m.map_interval("chr9", 500, 600), None);
    }

    #[test]
    fn test_transcript_mode_reversed_gene() {
        let m = exon_model(true);
        // exon 300-400 is drawn first on a reversed gene
        let span = m.map_interval("chr9", 350, 380).unwrap();
        assert_eq!(span, PixelSpan::new(20.0, 50.0));
    }

    #[test]
    fn test_transcript_mode_drops_intron_only_span() {
        let m = exon_model_with_pad(false, None);
        assert_eq!(m.regions()[1].left_offset, 110.0);
        // start snaps forward to 110, end snaps back to 100
        assert_eq!(m.map_interval("chr9", 220, 280), None);
        // a span reaching into both exons still crosses the gap
        let span = m.map_interval("chr9", 150, 350).unwrap();
        assert_eq!(span, PixelSpan::new(50.0, 160.0));
    }

    #[test]
    fn test_transcript_mode_drops_intron_only_span_on_reversed_gene() {
        let m = exon_model_with_pad(true, None);
        // exon 300-400 sits at 0..100 and exon 100-200 at 110..210
        assert_eq!(m.map_point("chr9", 350), Some(50.0));
        assert_eq!(m.map_interval("chr9", 220, 280), None);
    }
}
