//! Sample group assembly
//!
//! Walks the raw groups, maps every event through the coordinate mapper,
//! drops what is out of view, stacks the survivors and decides which
//! samples and groups are kept. In dense mode point events are diverted to
//! the density binner instead of being attached to their sample.

use crate::config::LayoutConfig;
use crate::coords::{CoordinateMapper, PixelSpan};
use crate::density::DensityEvent;
use crate::labels::LabelSide;
use crate::stack::{stack_dense, stack_expanded};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalPlacement {
    pub kind: EventKind,
    pub source: ItemRef,
    pub x1: Pixel,
    pub x2: Pixel,
    pub stack_row: usize,
    pub row_height: u32,
    pub magnitude: Option<f64>,
}

impl IntervalPlacement {
    pub fn span(&self) -> PixelSpan {
        PixelSpan::new(self.x1, self.x2)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointPlacement {
    pub kind: EventKind,
    pub source: PointSource,
    pub class: String,
    pub x: Pixel,
    pub label: Option<String>,
    pub label_side: LabelSide,
    pub label_width: Pixel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleLayout {
    pub name: String,
    /// Index of the sample inside its input group
    pub source_index: usize,
    pub intervals: Vec<IntervalPlacement>,
    pub points: Vec<PointPlacement>,
    pub stack_count: usize,
    pub row_height: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleGroupLayout {
    pub name: Option<String>,
    pub attributes: BTreeMap<String, String>,
    /// Index of the group inside the input
    pub source_index: usize,
    pub samples: Vec<SampleLayout>,
    pub height: u32,
}

/// Aggregates consumed by legend and colour-scale widgets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendSummary {
    pub cnv_max_abs: f64,
    pub loh_max: f64,
    pub sv_partner_chrs: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    pub events_seen: usize,
    pub events_filtered: usize,
    pub events_mapped: usize,
    pub events_unmapped: usize,
    pub duplicate_junctions: usize,
    /// Substitution/indel records naming a variant its sample already carries
    pub duplicate_variants: usize,
    pub samples_dropped: usize,
    pub groups_dropped: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssembledTrack {
    pub groups: Vec<SampleGroupLayout>,
    pub density_events: Vec<DensityEvent>,
    pub legend: LegendSummary,
    pub stats: LayoutStats,
}

type JunctionKey = (EventKind, String, Breakpoint, Breakpoint);

/// Sample name plus chr, pos, class and mname of a substitution/indel.
type VariantKey = (String, String, GenomicPos, String, Option<String>);

fn variant_key(sample: &str, snv: &SnvIndel) -> VariantKey {
    (sample.to_string(), snv.chr.clone(), snv.pos, snv.class.clone(), snv.mname.clone())
}

/// A point table row that mapped into view.
struct TableHit<'t> {
    index: usize,
    row: &'t PointEventInput,
    x: Pixel,
}

impl TableHit<'_> {
    fn placement(&self) -> PointPlacement {
        PointPlacement {
            kind: EventKind::SnvIndel,
            source: PointSource::Table { index: self.index },
            class: self.row.snv.class.clone(),
            x: self.x,
            label: self.row.snv.mname.clone(),
            label_side: LabelSide::None,
            label_width: 0.0,
        }
    }
}

pub struct SampleGroupAssembler<'a> {
    mapper: &'a CoordinateMapper,
    config: &'a LayoutConfig,
    mode: DisplayMode,
}

/// Mutable state threaded through one assembly pass.
#[derive(Default)]
struct PassState {
    density_events: Vec<DensityEvent>,
    legend: LegendSummary,
    stats: LayoutStats,
    seen_junctions: HashSet<JunctionKey>,
    seen_variants: HashSet<VariantKey>,
}

impl<'a> SampleGroupAssembler<'a> {
    pub fn new(mapper: &'a CoordinateMapper, config: &'a LayoutConfig, mode: DisplayMode) -> Self {
        Self { mapper, config, mode }
    }

    pub fn assemble(&self, input: &LayoutInput) -> AssembledTrack {
        let mut state = PassState::default();
        let table = self.map_point_table(&input.point_events, &mut state);
        let mut by_sample: BTreeMap<&str, Vec<&TableHit<'_>>> = BTreeMap::new();
        if self.mode == DisplayMode::Expanded {
            for hit in &table {
                for name in hit.row.distinct_samples() {
                    by_sample.entry(name).or_default().push(hit);
                }
            }
        }

        let mut groups = Vec::with_capacity(input.groups.len());
        for (gi, group) in input.groups.iter().enumerate() {
            let mut samples = Vec::with_capacity(group.samples.len());
            for (si, sample) in group.samples.iter().enumerate() {
                let extra = by_sample.get(sample.name.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                match self.assemble_sample(gi, si, sample, extra, &mut state) {
                    Some(layout) => samples.push(layout),
                    None => {
                        log::debug!("Dropping sample {}: nothing in view", sample.name);
                        state.stats.samples_dropped += 1;
                    }
                }
            }

            if samples.is_empty() {
                log::debug!("Dropping group {} ({:?}): no samples left", gi, group.name);
                state.stats.groups_dropped += 1;
                continue;
            }

            let height = samples.iter().map(|s| s.height).sum();
            groups.push(SampleGroupLayout {
                name: group.name.clone(),
                attributes: group.attributes.clone(),
                source_index: gi,
                samples,
                height,
            });
        }

        if self.mode == DisplayMode::Dense {
            self.bin_point_table(&table, &mut state);
        }

        if let Some(order_by) = &input.order_by {
            order_groups(&mut groups, order_by);
        }

        log::debug!(
            "Assembled {} groups; {} events mapped, {} unmapped, {} filtered",
            groups.len(),
            state.stats.events_mapped,
            state.stats.events_unmapped,
            state.stats.events_filtered
        );

        AssembledTrack {
            groups,
            density_events: state.density_events,
            legend: state.legend,
            stats: state.stats,
        }
    }

    /// Map the substitution/indel table, keeping the rows that land in view.
    fn map_point_table<'t>(&self, table: &'t [PointEventInput], state: &mut PassState) -> Vec<TableHit<'t>> {
        let mut hits = Vec::with_capacity(table.len());
        for (index, row) in table.iter().enumerate() {
            state.stats.events_seen += 1;
            if row.hidden {
                state.stats.events_filtered += 1;
                continue;
            }
            match self.mapper.map_point(&row.snv.chr, row.snv.pos) {
                Some(x) => {
                    state.stats.events_mapped += 1;
                    hits.push(TableHit { index, row, x });
                }
                None => {
                    log::debug!("Point table row {} at {}:{} is out of view", index, row.snv.chr, row.snv.pos);
                    state.stats.events_unmapped += 1;
                }
            }
        }
        hits
    }

    /// Dense mode: one density event per table row, weighted by the samples
    /// that have not already contributed the same variant through their items.
    /// A row naming no sample counts once.
    fn bin_point_table(&self, table: &[TableHit<'_>], state: &mut PassState) {
        for hit in table {
            let names = hit.row.distinct_samples();
            let weight = if names.is_empty() {
                1
            } else {
                let fresh = names
                    .iter()
                    .filter(|name| state.seen_variants.insert(variant_key(name, &hit.row.snv)))
                    .count();
                state.stats.duplicate_variants += names.len() - fresh;
                fresh
            };
            if weight == 0 {
                log::debug!("Point table row {} only repeats sample items", hit.index);
                continue;
            }
            state.density_events.push(DensityEvent {
                kind: EventKind::SnvIndel,
                class: hit.row.snv.class.clone(),
                x: hit.x,
                weight,
                source: PointSource::Table { index: hit.index },
            });
        }
    }

    fn assemble_sample(
        &self,
        gi: usize,
        si: usize,
        sample: &SampleInput,
        table_hits: &[&TableHit<'_>],
        state: &mut PassState,
    ) -> Option<SampleLayout> {
        let mut intervals: Vec<IntervalPlacement> = Vec::new();
        let mut points: Vec<PointPlacement> = Vec::new();

        for (ii, record) in sample.items.iter().enumerate() {
            state.stats.events_seen += 1;
            if record.hidden {
                state.stats.events_filtered += 1;
                continue;
            }
            let source = ItemRef { group: gi, sample: si, item: ii };

            let mapped = match &record.event {
                Event::Cnv { span, .. } | Event::Loh { span, .. } | Event::Itd { span, .. } => {
                    self.map_interval_event(&record.event, span, source, &mut intervals, state)
                }
                Event::Sv(junction) | Event::Fusion(junction) => {
                    self.map_junction_event(record.event.kind(), junction, &sample.name, source, &mut points, state)
                }
                Event::SnvIndel(snv) => self.map_snv_event(snv, &sample.name, source, &mut points, state),
            };

            if mapped {
                state.stats.events_mapped += 1;
            } else {
                state.stats.events_unmapped += 1;
            }
        }

        if self.mode == DisplayMode::Expanded {
            for hit in table_hits {
                if state.seen_variants.insert(variant_key(&sample.name, &hit.row.snv)) {
                    points.push(hit.placement());
                } else {
                    state.stats.duplicate_variants += 1;
                }
            }
        }

        let keep = !intervals.is_empty() || (self.mode == DisplayMode::Expanded && !points.is_empty());
        if !keep {
            return None;
        }

        let spans: Vec<PixelSpan> = intervals.iter().map(IntervalPlacement::span).collect();
        let stack = match self.mode {
            DisplayMode::Expanded => stack_expanded(&spans, !points.is_empty(), self.config),
            DisplayMode::Dense => stack_dense(&spans, self.config),
        };
        for (interval, row) in intervals.iter_mut().zip(&stack.rows) {
            interval.stack_row = *row;
            interval.row_height = stack.row_height;
        }

        points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.source.cmp(&b.source)));

        Some(SampleLayout {
            name: sample.name.clone(),
            source_index: si,
            intervals,
            points,
            stack_count: stack.stack_count,
            row_height: stack.row_height,
            height: stack.height,
        })
    }

    fn map_interval_event(
        &self,
        event: &Event,
        span: &GenomicSpan,
        source: ItemRef,
        intervals: &mut Vec<IntervalPlacement>,
        state: &mut PassState,
    ) -> bool {
        let px = match self.mapper.map_interval(&span.chr, span.start, span.stop) {
            Some(px) => px,
            None => {
                log::debug!("Interval {}:{}-{} is out of view", span.chr, span.start, span.stop);
                return false;
            }
        };

        let magnitude = event.magnitude();
        match (event, magnitude) {
            (Event::Cnv { .. }, Some(value)) if value.is_finite() => {
                state.legend.cnv_max_abs = state.legend.cnv_max_abs.max(value.abs());
            }
            (Event::Loh { .. }, Some(value)) if value.is_finite() => {
                state.legend.loh_max = state.legend.loh_max.max(value);
            }
            _ => {}
        }

        intervals.push(IntervalPlacement {
            kind: event.kind(),
            source,
            x1: px.x1,
            x2: px.x2,
            stack_row: 0,
            row_height: 0,
            magnitude,
        });
        true
    }

    fn map_junction_event(
        &self,
        kind: EventKind,
        junction: &Junction,
        sample_name: &str,
        source: ItemRef,
        points: &mut Vec<PointPlacement>,
        state: &mut PassState,
    ) -> bool {
        let (x, partner) = match self.map_junction(junction) {
            Some(hit) => hit,
            None => {
                log::debug!(
                    "Junction {}:{} / {}:{} is out of view",
                    junction.a.chr, junction.a.pos, junction.b.chr, junction.b.pos
                );
                return false;
            }
        };

        let (end1, end2) = junction.canonical_ends();
        let key = (kind, sample_name.to_string(), end1.clone(), end2.clone());
        if !state.seen_junctions.insert(key) {
            state.stats.duplicate_junctions += 1;
            // the junction is on screen through its first record
            return true;
        }

        if kind == EventKind::Sv {
            if let Some(chr) = partner {
                state.legend.sv_partner_chrs.insert(chr.to_string());
            }
        }

        let label = match kind {
            EventKind::FusionRna => fusion_label(junction),
            _ => partner.map(str::to_string),
        };

        match self.mode {
            DisplayMode::Dense => state.density_events.push(DensityEvent {
                kind,
                class: kind.class_name().to_string(),
                x,
                weight: 1,
                source: PointSource::Item(source),
            }),
            DisplayMode::Expanded => points.push(PointPlacement {
                kind,
                source: PointSource::Item(source),
                class: kind.class_name().to_string(),
                x,
                label,
                label_side: LabelSide::None,
                label_width: 0.0,
            }),
        }
        true
    }

    /// Pixel of the first breakpoint in view and, for interchromosomal
    /// junctions, the chromosome at the other end.
    fn map_junction<'j>(&self, junction: &'j Junction) -> Option<(Pixel, Option<&'j str>)> {
        let (a, b) = (&junction.a, &junction.b);
        if let Some(x) = self.mapper.map_point(&a.chr, a.pos) {
            return Some((x, (b.chr != a.chr).then_some(b.chr.as_str())));
        }
        if let Some(x) = self.mapper.map_point(&b.chr, b.pos) {
            return Some((x, (a.chr != b.chr).then_some(a.chr.as_str())));
        }
        None
    }

    fn map_snv_event(
        &self,
        snv: &SnvIndel,
        sample_name: &str,
        source: ItemRef,
        points: &mut Vec<PointPlacement>,
        state: &mut PassState,
    ) -> bool {
        let x = match self.mapper.map_point(&snv.chr, snv.pos) {
            Some(x) => x,
            None => return false,
        };
        if !state.seen_variants.insert(variant_key(sample_name, snv)) {
            state.stats.duplicate_variants += 1;
            return true;
        }

        match self.mode {
            DisplayMode::Dense => state.density_events.push(DensityEvent {
                kind: EventKind::SnvIndel,
                class: snv.class.clone(),
                x,
                weight: 1,
                source: PointSource::Item(source),
            }),
            DisplayMode::Expanded => points.push(PointPlacement {
                kind: EventKind::SnvIndel,
                source: PointSource::Item(source),
                class: snv.class.clone(),
                x,
                label: snv.mname.clone(),
                label_side: LabelSide::None,
                label_width: 0.0,
            }),
        }
        true
    }
}

fn fusion_label(junction: &Junction) -> Option<String> {
    match (&junction.gene_a, &junction.gene_b) {
        (Some(a), Some(b)) => Some(format!("{}::{}", a, b)),
        (Some(gene), None) | (None, Some(gene)) => Some(gene.clone()),
        (None, None) => None,
    }
}

/// Stable reorder by the position of each group's attribute value in the
/// requested sequence. Groups without a listed value keep their relative
/// order at the end.
pub fn order_groups(groups: &mut [SampleGroupLayout], order_by: &OrderBy) {
    groups.sort_by_key(|group| {
        group
            .attributes
            .get(&order_by.attribute)
            .and_then(|value| order_by.values.iter().position(|v| v == value))
            .unwrap_or(usize::MAX)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> CoordinateMapper {
        CoordinateMapper::new(
            &[RegionSpec::new("chr2", 0, 1000, 1000.0)],
            CoordinateMode::Genomic,
            &LayoutConfig::default(),
        )
        .unwrap()
    }

    fn cnv(chr: &str, start: u64, stop: u64, value: f64) -> EventRecord {
        EventRecord::visible(Event::Cnv { span: GenomicSpan::new(chr, start, stop), value })
    }

    fn sv(a: (&str, u64, char), b: (&str, u64, char)) -> EventRecord {
        EventRecord::visible(Event::Sv(Junction {
            a: Breakpoint { chr: a.0.into(), pos: a.1, strand: Strand::from(a.2) },
            b: Breakpoint { chr: b.0.into(), pos: b.1, strand: Strand::from(b.2) },
            gene_a: None,
            gene_b: None,
        }))
    }

    fn single_group(samples: Vec<SampleInput>) -> LayoutInput {
        LayoutInput {
            regions: vec![RegionSpec::new("chr2", 0, 1000, 1000.0)],
            groups: vec![SampleGroupInput { samples, ..Default::default() }],
            ..Default::default()
        }
    }

    fn assemble(input: &LayoutInput, mode: DisplayMode) -> AssembledTrack {
        let mapper = mapper();
        let config = LayoutConfig::default();
        SampleGroupAssembler::new(&mapper, &config, mode).assemble(input)
    }

    #[test]
    fn test_sample_with_only_unmappable_event_is_dropped() {
        let input = single_group(vec![
            SampleInput { name: "s1".into(), items: vec![cnv("chr5", 10, 20, 1.0)] },
            SampleInput { name: "s2".into(), items: vec![cnv("chr2", 10, 20, 1.0)] },
        ]);
        let track = assemble(&input, DisplayMode::Expanded);
        assert_eq!(track.groups.len(), 1);
        assert_eq!(track.groups[0].samples.len(), 1);
        assert_eq!(track.groups[0].samples[0].name, "s2");
        assert_eq!(track.stats.events_unmapped, 1);
        assert_eq!(track.stats.samples_dropped, 1);
    }

    #[test]
    fn test_empty_group_is_dropped() {
        let input = single_group(vec![SampleInput { name: "s1".into(), items: vec![cnv("chr5", 10, 20, 1.0)] }]);
        let track = assemble(&input, DisplayMode::Expanded);
        assert!(track.groups.is_empty());
        assert_eq!(track.stats.groups_dropped, 1);
    }

    #[test]
    fn test_hidden_events_are_skipped() {
        let mut hidden = cnv("chr2", 10, 20, 1.0);
        hidden.hidden = true;
        let input = single_group(vec![SampleInput { name: "s1".into(), items: vec![hidden] }]);
        let track = assemble(&input, DisplayMode::Expanded);
        assert!(track.groups.is_empty());
        assert_eq!(track.stats.events_filtered, 1);
    }

    #[test]
    fn test_legend_tracks_magnitudes_and_partners() {
        let loh = EventRecord::visible(Event::Loh { span: GenomicSpan::new("chr2", 0, 50), segmean: 0.4 });
        let input = single_group(vec![SampleInput {
            name: "s1".into(),
            items: vec![
                cnv("chr2", 0, 10, -2.5),
                cnv("chr2", 0, 10, 1.5),
                cnv("chr9", 0, 10, 7.0),
                loh,
                sv(("chr2", 100, '+'), ("chr17", 5000, '-')),
                sv(("chr4", 100, '+'), ("chr2", 500, '-')),
                sv(("chr2", 300, '+'), ("chr2", 900, '-')),
            ],
        }]);
        let track = assemble(&input, DisplayMode::Expanded);
        assert_eq!(track.legend.cnv_max_abs, 2.5);
        assert_eq!(track.legend.loh_max, 0.4);
        let partners: Vec<&str> = track.legend.sv_partner_chrs.iter().map(String::as_str).collect();
        assert_eq!(partners, vec!["chr17", "chr4"]);

        let labels: Vec<Option<&str>> =
            track.groups[0].samples[0].points.iter().map(|p| p.label.as_deref()).collect();
        // points come out sorted by pixel: 100, 300, 500
        assert_eq!(labels, vec![Some("chr17"), None, Some("chr4")]);
    }

    #[test]
    fn test_dense_mode_diverts_and_dedups_junctions() {
        let input = single_group(vec![SampleInput {
            name: "s1".into(),
            items: vec![
                cnv("chr2", 0, 10, 1.0),
                sv(("chr2", 100, '+'), ("chr2", 800, '-')),
                sv(("chr2", 800, '-'), ("chr2", 100, '+')),
            ],
        }]);
        let track = assemble(&input, DisplayMode::Dense);
        assert_eq!(track.density_events.len(), 1);
        assert_eq!(track.stats.duplicate_junctions, 1);
        let sample = &track.groups[0].samples[0];
        assert!(sample.points.is_empty());
        assert_eq!(sample.height, 1);
    }

    #[test]
    fn test_dense_mode_drops_point_only_samples() {
        let input = single_group(vec![SampleInput {
            name: "s1".into(),
            items: vec![sv(("chr2", 100, '+'), ("chr3", 800, '-'))],
        }]);
        let track = assemble(&input, DisplayMode::Dense);
        assert!(track.groups.is_empty());
        assert_eq!(track.density_events.len(), 1);
    }

    #[test]
    fn test_expanded_sample_kept_by_point_table() {
        let mut input = single_group(vec![SampleInput { name: "s1".into(), items: Vec::new() }]);
        input.point_events.push(PointEventInput {
            snv: SnvIndel { chr: "chr2".into(), pos: 400, class: "M".into(), mname: Some("G12D".into()) },
            sample_names: vec!["s1".into(), "s9".into()],
            hidden: false,
        });
        let track = assemble(&input, DisplayMode::Expanded);
        let sample = &track.groups[0].samples[0];
        assert_eq!(sample.points.len(), 1);
        assert_eq!(sample.points[0].source, PointSource::Table { index: 0 });
        assert_eq!(sample.height, LayoutConfig::default().point_only_sample_height);
    }

    #[test]
    fn test_dense_table_weight_counts_samples() {
        let mut input = single_group(Vec::new());
        input.point_events.push(PointEventInput {
            snv: SnvIndel { chr: "chr2".into(), pos: 400, class: "M".into(), mname: None },
            sample_names: vec!["a".into(), "b".into(), "c".into()],
            hidden: false,
        });
        let track = assemble(&input, DisplayMode::Dense);
        assert_eq!(track.density_events.len(), 1);
        assert_eq!(track.density_events[0].weight, 3);
    }

    fn g12d_sample_and_table(table_samples: &[&str]) -> LayoutInput {
        let snv = SnvIndel { chr: "chr2".into(), pos: 400, class: "M".into(), mname: Some("G12D".into()) };
        let mut input = single_group(vec![SampleInput {
            name: "s1".into(),
            items: vec![EventRecord::visible(Event::SnvIndel(snv.clone()))],
        }]);
        input.point_events.push(PointEventInput {
            snv,
            sample_names: table_samples.iter().map(|s| s.to_string()).collect(),
            hidden: false,
        });
        input
    }

    #[test]
    fn test_expanded_variant_in_items_and_table_drawn_once() {
        let input = g12d_sample_and_table(&["s1"]);
        let track = assemble(&input, DisplayMode::Expanded);
        let points = &track.groups[0].samples[0].points;
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].source, PointSource::Item(ItemRef { group: 0, sample: 0, item: 0 }));
        assert_eq!(track.stats.duplicate_variants, 1);
    }

    #[test]
    fn test_dense_variant_counts_each_sample_once() {
        let input = g12d_sample_and_table(&["s1"]);
        let track = assemble(&input, DisplayMode::Dense);
        let total: usize = track.density_events.iter().map(|e| e.weight).sum();
        assert_eq!(total, 1);
        assert_eq!(track.stats.duplicate_variants, 1);

        let input = g12d_sample_and_table(&["s1", "s2", "s3"]);
        let track = assemble(&input, DisplayMode::Dense);
        let weights: Vec<usize> = track.density_events.iter().map(|e| e.weight).collect();
        assert_eq!(weights, vec![1, 2]);
    }

    #[test]
    fn test_fusion_label_joins_genes() {
        let junction = Junction {
            a: Breakpoint { chr: "chr2".into(), pos: 1, strand: Strand::Forward },
            b: Breakpoint { chr: "chr2".into(), pos: 2, strand: Strand::Forward },
            gene_a: Some("EML4".into()),
            gene_b: Some("ALK".into()),
        };
        assert_eq!(fusion_label(&junction).as_deref(), Some("EML4::ALK"));
    }

    #[test]
    fn test_groups_reordered_by_attribute() {
        let make = |name: &str, subtype: Option<&str>| {
            let mut attributes = BTreeMap::new();
            if let Some(v) = subtype {
                attributes.insert("subtype".to_string(), v.to_string());
            }
            SampleGroupLayout {
                name: Some(name.to_string()),
                attributes,
                source_index: 0,
                samples: Vec::new(),
                height: 0,
            }
        };
        let mut groups = vec![
            make("g0", Some("B")),
            make("g1", None),
            make("g2", Some("A")),
            make("g3", Some("Z")),
            make("g4", Some("B")),
        ];
        let order = OrderBy { attribute: "subtype".into(), values: vec!["A".into(), "B".into()] };
        order_groups(&mut groups, &order);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_deref().unwrap()).collect();
        assert_eq!(names, vec!["g2", "g0", "g4", "g1", "g3"]);
    }
}
