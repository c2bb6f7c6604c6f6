use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type GenomicPos = u64;
pub type Pixel = f64;

/// How a track is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Aggregate overview: thin per-sample rows, point events binned into discs.
    Dense,
    /// One stacked row per sample with every event drawn individually.
    #[default]
    Expanded,
}

/// Coordinate system of the active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    #[default]
    Genomic,
    /// Protein/transcript view where regions are exons of one gene model.
    Transcript,
}

/// Closed set of mutation kinds. Wire codes follow the `dt` field of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    SnvIndel,
    FusionRna,
    Cnv,
    Sv,
    Itd,
    Loh,
}

impl EventKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(EventKind::SnvIndel),
            2 => Some(EventKind::FusionRna),
            4 => Some(EventKind::Cnv),
            5 => Some(EventKind::Sv),
            6 => Some(EventKind::Itd),
            10 => Some(EventKind::Loh),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            EventKind::SnvIndel => 1,
            EventKind::FusionRna => 2,
            EventKind::Cnv => 4,
            EventKind::Sv => 5,
            EventKind::Itd => 6,
            EventKind::Loh => 10,
        }
    }

    /// Interval kinds are stacked; the rest are drawn as point markers.
    pub fn is_interval(self) -> bool {
        match self {
            EventKind::Cnv | EventKind::Loh | EventKind::Itd => true,
            EventKind::SnvIndel | EventKind::FusionRna | EventKind::Sv => false,
        }
    }

    /// Class name used when a point event carries no finer class.
    pub fn class_name(self) -> &'static str {
        match self {
            EventKind::SnvIndel => "snvindel",
            EventKind::FusionRna => "fusion",
            EventKind::Cnv => "cnv",
            EventKind::Sv => "sv",
            EventKind::Itd => "itd",
            EventKind::Loh => "loh",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl From<char> for Strand {
    fn from(c: char) -> Self {
        match c {
            '-' => Strand::Reverse,
            _ => Strand::Forward,
        }
    }
}

impl From<Strand> for char {
    fn from(strand: Strand) -> Self {
        match strand {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

/// Half-open genomic interval `[start, stop)` on one chromosome.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenomicSpan {
    pub chr: String,
    pub start: GenomicPos,
    pub stop: GenomicPos,
}

impl GenomicSpan {
    pub fn new(chr: impl Into<String>, start: GenomicPos, stop: GenomicPos) -> Self {
        Self {
            chr: chr.into(),
            start,
            stop,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Breakpoint {
    pub chr: String,
    pub pos: GenomicPos,
    pub strand: Strand,
}

/// Two breakpoints joined by a structural variant or a fusion transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Junction {
    pub a: Breakpoint,
    pub b: Breakpoint,
    pub gene_a: Option<String>,
    pub gene_b: Option<String>,
}

impl Junction {
    /// Endpoints in canonical order, so the two records describing one
    /// physical junction from either side compare equal.
    pub fn canonical_ends(&self) -> (&Breakpoint, &Breakpoint) {
        if self.a <= self.b {
            (&self.a, &self.b)
        } else {
            (&self.b, &self.a)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnvIndel {
    pub chr: String,
    pub pos: GenomicPos,
    pub class: String,
    pub mname: Option<String>,
}

/// One mutation record. Interval kinds carry a span, point kinds a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Cnv { span: GenomicSpan, value: f64 },
    Loh { span: GenomicSpan, segmean: f64 },
    Itd { span: GenomicSpan, value: Option<f64> },
    Sv(Junction),
    Fusion(Junction),
    SnvIndel(SnvIndel),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Cnv { .. } => EventKind::Cnv,
            Event::Loh { .. } => EventKind::Loh,
            Event::Itd { .. } => EventKind::Itd,
            Event::Sv(_) => EventKind::Sv,
            Event::Fusion(_) => EventKind::FusionRna,
            Event::SnvIndel(_) => EventKind::SnvIndel,
        }
    }

    pub fn span(&self) -> Option<&GenomicSpan> {
        match self {
            Event::Cnv { span, .. } | Event::Loh { span, .. } | Event::Itd { span, .. } => Some(span),
            Event::Sv(_) | Event::Fusion(_) | Event::SnvIndel(_) => None,
        }
    }

    /// Magnitude carried by interval kinds, used for colour scaling.
    pub fn magnitude(&self) -> Option<f64> {
        match self {
            Event::Cnv { value, .. } => Some(*value),
            Event::Loh { segmean, .. } => Some(*segmean),
            Event::Itd { value, .. } => *value,
            Event::Sv(_) | Event::Fusion(_) | Event::SnvIndel(_) => None,
        }
    }
}

/// An event plus the already-resolved filter decision for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub event: Event,
    pub hidden: bool,
}

impl EventRecord {
    pub fn visible(event: Event) -> Self {
        Self {
            event,
            hidden: false,
        }
    }
}

/// A region as supplied by the host, before pixel offsets are resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub chr: String,
    pub start: GenomicPos,
    pub stop: GenomicPos,
    pub width: Pixel,
    pub exon_scale_factor: Option<f64>,
    pub subpanel_index: Option<usize>,
    pub left_pad: Option<Pixel>,
    pub reverse: bool,
}

impl RegionSpec {
    pub fn new(chr: impl Into<String>, start: GenomicPos, stop: GenomicPos, width: Pixel) -> Self {
        Self {
            chr: chr.into(),
            start,
            stop,
            width,
            exon_scale_factor: None,
            subpanel_index: None,
            left_pad: None,
            reverse: false,
        }
    }

    pub fn as_subpanel(mut self, index: usize) -> Self {
        self.subpanel_index = Some(index);
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reverse = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleInput {
    pub name: String,
    pub items: Vec<EventRecord>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleGroupInput {
    pub name: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub samples: Vec<SampleInput>,
}

/// Row of the separately supplied substitution/indel table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointEventInput {
    pub snv: SnvIndel,
    pub sample_names: Vec<String>,
    pub hidden: bool,
}

impl PointEventInput {
    /// Distinct names of the contributing samples.
    pub fn distinct_samples(&self) -> BTreeSet<&str> {
        self.sample_names.iter().map(String::as_str).collect()
    }
}

/// Requested group order: groups are sorted by the position of their
/// `attribute` value inside `values`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    pub attribute: String,
    pub values: Vec<String>,
}

/// Everything one layout pass reads. Never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutInput {
    pub regions: Vec<RegionSpec>,
    pub groups: Vec<SampleGroupInput>,
    pub point_events: Vec<PointEventInput>,
    pub mode: DisplayMode,
    pub coordinate_mode: CoordinateMode,
    pub order_by: Option<OrderBy>,
}

/// Index path of an event inside `LayoutInput::groups`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemRef {
    pub group: usize,
    pub sample: usize,
    pub item: usize,
}

/// Where a point event came from: a sample's own items or the point table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "from", rename_all = "camelCase")]
pub enum PointSource {
    Item(ItemRef),
    Table { index: usize },
}
