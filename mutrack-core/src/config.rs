//! Layout constants
//!
//! Every tunable pixel size used by the engine lives here so hosts and tests
//! can override them. Defaults reproduce the values the track has always
//! been drawn with.

use crate::error::{LayoutError, LayoutResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Horizontal gap between consecutive main regions
    #[serde(default = "default_region_gap")]
    pub region_gap: f64,

    /// Gap in front of a sub-panel when the region does not carry its own pad
    #[serde(default = "default_subpanel_gap")]
    pub subpanel_gap: f64,

    /// Mapped intervals narrower than this are widened
    #[serde(default = "default_min_interval_width")]
    pub min_interval_width: f64,

    /// Row height of every sample in dense mode
    #[serde(default = "default_dense_row_height")]
    pub dense_row_height: u32,

    /// Height of an expanded sample that only has point events
    #[serde(default = "default_point_only_sample_height")]
    pub point_only_sample_height: u32,

    /// Per-row height as a function of the number of stack rows
    #[serde(default)]
    pub row_heights: RowHeightTable,

    #[serde(default)]
    pub density: DensityConfig,

    #[serde(default)]
    pub labels: LabelConfig,
}

/// Anchor of the row height step function: from `count` rows upwards each
/// row is `height` pixels tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowHeightAnchor {
    pub count: usize,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowHeightTable {
    /// Interpolate linearly between anchors instead of stepping
    #[serde(default)]
    pub interpolate: bool,

    #[serde(default = "default_min_row_height")]
    pub min_height: u32,

    #[serde(default = "default_row_height_anchors")]
    pub anchors: Vec<RowHeightAnchor>,
}

/// Radius anchor: a bin holding `count_fraction` of the busiest bin's count
/// is drawn with `radius_fraction` of the maximum radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusAnchor {
    pub count_fraction: f64,
    pub radius_fraction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityConfig {
    #[serde(default = "default_bin_width")]
    pub bin_width: f64,

    /// Radius of a single event
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,

    /// Radius of the busiest bin
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,

    #[serde(default = "default_radius_anchors")]
    pub anchors: Vec<RadiusAnchor>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelConfig {
    /// Half width of the point marker drawn at the event's x
    #[serde(default = "default_marker_half_width")]
    pub marker_half_width: f64,

    /// Space between marker and label text
    #[serde(default = "default_label_spacing")]
    pub spacing: f64,

    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Average glyph width relative to the font size, for the built-in measure
    #[serde(default = "default_char_width_ratio")]
    pub char_width_ratio: f64,
}

fn default_region_gap() -> f64 { 10.0 }
fn default_subpanel_gap() -> f64 { 20.0 }
fn default_min_interval_width() -> f64 { 1.0 }
fn default_dense_row_height() -> u32 { 1 }
fn default_point_only_sample_height() -> u32 { 10 }
fn default_min_row_height() -> u32 { 1 }
fn default_bin_width() -> f64 { 10.0 }
fn default_min_radius() -> f64 { 3.0 }
fn default_max_radius() -> f64 { 15.0 }
fn default_marker_half_width() -> f64 { 4.0 }
fn default_label_spacing() -> f64 { 3.0 }
fn default_font_size() -> f64 { 12.0 }
fn default_char_width_ratio() -> f64 { 0.6 }

fn default_row_height_anchors() -> Vec<RowHeightAnchor> {
    vec![
        RowHeightAnchor { count: 1, height: 8 },
        RowHeightAnchor { count: 3, height: 4 },
        RowHeightAnchor { count: 5, height: 2 },
        RowHeightAnchor { count: 10, height: 1 },
    ]
}

// Growth slows towards the busiest bin: every segment is flatter than the
// one before it.
fn default_radius_anchors() -> Vec<RadiusAnchor> {
    vec![
        RadiusAnchor { count_fraction: 0.5, radius_fraction: 0.72 },
        RadiusAnchor { count_fraction: 0.6, radius_fraction: 0.80 },
        RadiusAnchor { count_fraction: 0.7, radius_fraction: 0.87 },
        RadiusAnchor { count_fraction: 0.8, radius_fraction: 0.93 },
        RadiusAnchor { count_fraction: 1.0, radius_fraction: 1.0 },
    ]
}

impl Default for RowHeightTable {
    fn default() -> Self {
        Self {
            anchors: default_row_height_anchors(),
            interpolate: false,
            min_height: default_min_row_height(),
        }
    }
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            bin_width: default_bin_width(),
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            anchors: default_radius_anchors(),
        }
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            marker_half_width: default_marker_half_width(),
            spacing: default_label_spacing(),
            font_size: default_font_size(),
            char_width_ratio: default_char_width_ratio(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            region_gap: default_region_gap(),
            subpanel_gap: default_subpanel_gap(),
            min_interval_width: default_min_interval_width(),
            row_heights: RowHeightTable::default(),
            dense_row_height: default_dense_row_height(),
            point_only_sample_height: default_point_only_sample_height(),
            density: DensityConfig::default(),
            labels: LabelConfig::default(),
        }
    }
}

impl LayoutConfig {
    /// Reject values the algorithms cannot work with.
    pub fn validate(&self) -> LayoutResult<()> {
        non_negative("region_gap", self.region_gap)?;
        non_negative("subpanel_gap", self.subpanel_gap)?;
        non_negative("min_interval_width", self.min_interval_width)?;

        if self.dense_row_height == 0 {
            return Err(LayoutError::config("dense_row_height must be at least 1"));
        }
        if self.point_only_sample_height == 0 {
            return Err(LayoutError::config("point_only_sample_height must be at least 1"));
        }

        self.row_heights.validate()?;
        self.density.validate()?;
        self.labels.validate()
    }
}

impl RowHeightTable {
    fn validate(&self) -> LayoutResult<()> {
        if self.min_height == 0 {
            return Err(LayoutError::config("row_heights.min_height must be at least 1"));
        }
        if self.anchors.is_empty() {
            return Err(LayoutError::config("row_heights.anchors must not be empty"));
        }
        if self.anchors[0].count == 0 {
            return Err(LayoutError::config("row_heights.anchors counts start at 1"));
        }
        for pair in self.anchors.windows(2) {
            if pair[1].count <= pair[0].count {
                return Err(LayoutError::config(
                    "row_heights.anchors counts must be strictly increasing",
                ));
            }
            if pair[1].height > pair[0].height {
                return Err(LayoutError::config(
                    "row_heights.anchors heights must not increase with count",
                ));
            }
        }
        Ok(())
    }
}

impl DensityConfig {
    fn validate(&self) -> LayoutResult<()> {
        positive("density.bin_width", self.bin_width)?;
        positive("density.min_radius", self.min_radius)?;
        if !(self.max_radius >= self.min_radius) {
            return Err(LayoutError::config(
                "density.max_radius must be at least density.min_radius",
            ));
        }

        let mut prev = RadiusAnchor { count_fraction: 0.0, radius_fraction: 0.0 };
        for anchor in &self.anchors {
            if !(anchor.count_fraction > prev.count_fraction && anchor.count_fraction <= 1.0) {
                return Err(LayoutError::config(
                    "density.anchors count fractions must increase within (0, 1]",
                ));
            }
            if !(anchor.radius_fraction >= prev.radius_fraction && anchor.radius_fraction <= 1.0) {
                return Err(LayoutError::config(
                    "density.anchors radius fractions must not decrease and stay within (0, 1]",
                ));
            }
            prev = *anchor;
        }
        Ok(())
    }
}

impl LabelConfig {
    fn validate(&self) -> LayoutResult<()> {
        non_negative("labels.marker_half_width", self.marker_half_width)?;
        non_negative("labels.spacing", self.spacing)?;
        positive("labels.font_size", self.font_size)?;
        positive("labels.char_width_ratio", self.char_width_ratio)
    }
}

fn non_negative(name: &str, value: f64) -> LayoutResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(LayoutError::config(format!("{} must be a finite value >= 0, got {}", name, value)))
    }
}

fn positive(name: &str, value: f64) -> LayoutResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(LayoutError::config(format!("{} must be a finite value > 0, got {}", name, value)))
    }
}
