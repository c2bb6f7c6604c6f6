//! Wire format of a layout request
//!
//! Every field is optional at the serde level so a missing field can be
//! reported with the index path of the record that lacks it, instead of a
//! bare serde message.

use crate::error::{LayoutError, LayoutResult};
use crate::types::*;
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRequest {
    pub regions: Option<Vec<RawRegion>>,
    pub sample_groups: Option<Vec<RawGroup>>,
    pub point_events: Option<Vec<RawEvent>>,
    pub mode: Option<DisplayMode>,
    pub coordinate_mode: Option<CoordinateMode>,
    pub order_by: Option<RawOrderBy>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawRegion {
    pub chr: Option<String>,
    pub start: Option<GenomicPos>,
    pub stop: Option<GenomicPos>,
    pub width: Option<f64>,
    pub exon_scale_factor: Option<f64>,
    pub subpanel_index: Option<usize>,
    pub left_pad: Option<f64>,
    #[serde(default)]
    pub reverse: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawGroup {
    pub name: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub samples: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSample {
    pub name: Option<String>,
    #[serde(default)]
    pub items: Vec<RawEvent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawEvent {
    pub dt: Option<u8>,
    pub chr: Option<String>,
    pub start: Option<GenomicPos>,
    pub stop: Option<GenomicPos>,
    pub pos: Option<GenomicPos>,
    pub value: Option<f64>,
    pub segmean: Option<f64>,
    pub class: Option<String>,
    pub mname: Option<String>,
    pub chr_a: Option<String>,
    pub pos_a: Option<GenomicPos>,
    pub strand_a: Option<String>,
    pub chr_b: Option<String>,
    pub pos_b: Option<GenomicPos>,
    pub strand_b: Option<String>,
    pub gene_a: Option<String>,
    pub gene_b: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub sample_data: Vec<RawSampleRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSampleRef {
    pub sample_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawOrderBy {
    pub attribute: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
}

fn required<T: Clone>(value: &Option<T>, path: &str, field: &str) -> LayoutResult<T> {
    value
        .clone()
        .ok_or_else(|| LayoutError::event(path, format!("missing field `{}`", field)))
}

impl RawRequest {
    pub fn into_input(self) -> LayoutResult<LayoutInput> {
        let regions = self
            .regions
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.into_spec(index))
            .collect::<LayoutResult<Vec<_>>>()?;

        let groups = self
            .sample_groups
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(gi, raw)| raw.into_group(gi))
            .collect::<LayoutResult<Vec<_>>>()?;

        let point_events = self
            .point_events
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, raw)| raw.to_point_event(&format!("pointEvents[{}]", index)))
            .collect::<LayoutResult<Vec<_>>>()?;

        let order_by = match self.order_by {
            Some(raw) => {
                let attribute = raw
                    .attribute
                    .ok_or_else(|| LayoutError::event("orderBy", "missing field `attribute`"))?;
                Some(OrderBy { attribute, values: raw.values })
            }
            None => None,
        };

        Ok(LayoutInput {
            regions,
            groups,
            point_events,
            mode: self.mode.unwrap_or_default(),
            coordinate_mode: self.coordinate_mode.unwrap_or_default(),
            order_by,
        })
    }
}

impl RawRegion {
    fn into_spec(self, index: usize) -> LayoutResult<RegionSpec> {
        let missing = |field: &str| LayoutError::region(index, format!("missing field `{}`", field));
        Ok(RegionSpec {
            chr: self.chr.ok_or_else(|| missing("chr"))?,
            start: self.start.ok_or_else(|| missing("start"))?,
            stop: self.stop.ok_or_else(|| missing("stop"))?,
            width: self.width.ok_or_else(|| missing("width"))?,
            exon_scale_factor: self.exon_scale_factor,
            subpanel_index: self.subpanel_index,
            left_pad: self.left_pad,
            reverse: self.reverse,
        })
    }
}

impl RawGroup {
    fn into_group(self, gi: usize) -> LayoutResult<SampleGroupInput> {
        let attributes = self
            .attributes
            .into_iter()
            .map(|(key, value)| {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                (key, text)
            })
            .collect();

        let samples = self
            .samples
            .into_iter()
            .enumerate()
            .map(|(si, raw)| raw.into_sample(gi, si))
            .collect::<LayoutResult<Vec<_>>>()?;

        Ok(SampleGroupInput { name: self.name, attributes, samples })
    }
}

impl RawSample {
    fn into_sample(self, gi: usize, si: usize) -> LayoutResult<SampleInput> {
        let path = format!("sampleGroups[{}].samples[{}]", gi, si);
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(LayoutError::sample(path, "missing field `name`")),
        };

        let items = self
            .items
            .iter()
            .enumerate()
            .map(|(ii, raw)| raw.to_record(&format!("{}.items[{}]", path, ii)))
            .collect::<LayoutResult<Vec<_>>>()?;

        Ok(SampleInput { name, items })
    }
}

impl RawEvent {
    fn kind(&self, path: &str) -> LayoutResult<EventKind> {
        let code = required(&self.dt, path, "dt")?;
        EventKind::from_code(code)
            .ok_or_else(|| LayoutError::event(path, format!("unknown event kind code {}", code)))
    }

    fn to_record(&self, path: &str) -> LayoutResult<EventRecord> {
        let event = match self.kind(path)? {
            EventKind::Cnv => Event::Cnv {
                span: self.span(path)?,
                value: required(&self.value, path, "value")?,
            },
            EventKind::Loh => Event::Loh {
                span: self.span(path)?,
                segmean: required(&self.segmean, path, "segmean")?,
            },
            EventKind::Itd => Event::Itd { span: self.span(path)?, value: self.value },
            EventKind::Sv => Event::Sv(self.junction(path)?),
            EventKind::FusionRna => Event::Fusion(self.junction(path)?),
            EventKind::SnvIndel => Event::SnvIndel(self.snv(path)?),
        };
        Ok(EventRecord { event, hidden: self.hidden })
    }

    fn to_point_event(&self, path: &str) -> LayoutResult<PointEventInput> {
        let kind = self.kind(path)?;
        if kind != EventKind::SnvIndel {
            return Err(LayoutError::event(
                path,
                format!("point table holds substitutions/indels only, got code {}", kind.code()),
            ));
        }
        let sample_names = self
            .sample_data
            .iter()
            .enumerate()
            .map(|(i, r)| required(&r.sample_name, &format!("{}.sampleData[{}]", path, i), "sampleName"))
            .collect::<LayoutResult<Vec<_>>>()?;

        Ok(PointEventInput {
            snv: self.snv(path)?,
            sample_names,
            hidden: self.hidden,
        })
    }

    /// Interval extent; a record carrying only `pos` covers that one base.
    fn span(&self, path: &str) -> LayoutResult<GenomicSpan> {
        let chr = required(&self.chr, path, "chr")?;
        let start = self
            .start
            .or(self.pos)
            .ok_or_else(|| LayoutError::event(path, "missing field `start`"))?;
        let stop = self.stop.or(self.pos).unwrap_or(start);
        Ok(GenomicSpan::new(chr, start, stop))
    }

    fn junction(&self, path: &str) -> LayoutResult<Junction> {
        Ok(Junction {
            a: Breakpoint {
                chr: required(&self.chr_a, path, "chrA")?,
                pos: required(&self.pos_a, path, "posA")?,
                strand: parse_strand(self.strand_a.as_deref(), path, "strandA")?,
            },
            b: Breakpoint {
                chr: required(&self.chr_b, path, "chrB")?,
                pos: required(&self.pos_b, path, "posB")?,
                strand: parse_strand(self.strand_b.as_deref(), path, "strandB")?,
            },
            gene_a: self.gene_a.clone(),
            gene_b: self.gene_b.clone(),
        })
    }

    fn snv(&self, path: &str) -> LayoutResult<SnvIndel> {
        Ok(SnvIndel {
            chr: required(&self.chr, path, "chr")?,
            pos: required(&self.pos, path, "pos")?,
            class: self
                .class
                .clone()
                .unwrap_or_else(|| EventKind::SnvIndel.class_name().to_string()),
            mname: self.mname.clone(),
        })
    }
}

/// Strands default to forward when absent.
fn parse_strand(raw: Option<&str>, path: &str, field: &str) -> LayoutResult<Strand> {
    match raw {
        None | Some("+") => Ok(Strand::Forward),
        Some("-") => Ok(Strand::Reverse),
        Some(other) => Err(LayoutError::event(path, format!("`{}` must be \"+\" or \"-\", got {:?}", field, other))),
    }
}
