//! Label placement for point events of one sample
//!
//! Points are swept left to right. Each label may go right of its marker
//! (preferred) or left of it, and is suppressed when neither side is clear
//! of the viewport edges, the sample's intervals, neighbouring markers and
//! labels already placed.

use crate::config::LabelConfig;
use crate::coords::PixelSpan;
use crate::types::Pixel;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelSide {
    Left,
    Right,
    #[default]
    None,
}

/// Text measurement supplied by the host.
pub trait TextMeasure {
    fn text_width(&self, text: &str) -> Pixel;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> Pixel,
{
    fn text_width(&self, text: &str) -> Pixel {
        self(text)
    }
}

/// Approximates text width from the character count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharWidthMeasure {
    pub font_size: f64,
    pub char_width_ratio: f64,
}

impl CharWidthMeasure {
    pub fn from_config(config: &LabelConfig) -> Self {
        Self {
            font_size: config.font_size,
            char_width_ratio: config.char_width_ratio,
        }
    }
}

impl TextMeasure for CharWidthMeasure {
    fn text_width(&self, text: &str) -> Pixel {
        text.chars().count() as f64 * self.font_size * self.char_width_ratio
    }
}

/// Input to the sweep: a marker position and its optional label text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelRequest<'a> {
    pub x: Pixel,
    pub label: Option<&'a str>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub side: LabelSide,
    /// Measured text width, zero without a label
    pub width: Pixel,
}

impl LabelPlacement {
    /// Pixel span covered by the label text, if one is drawn.
    pub fn span(&self, x: Pixel, config: &LabelConfig) -> Option<PixelSpan> {
        let near = config.marker_half_width + config.spacing;
        match self.side {
            LabelSide::Right => Some(PixelSpan::new(x + near, x + near + self.width)),
            LabelSide::Left => Some(PixelSpan::new(x - near - self.width, x - near)),
            LabelSide::None => None,
        }
    }
}

pub struct LabelPlacer<'a> {
    config: &'a LabelConfig,
    measure: &'a dyn TextMeasure,
}

impl<'a> LabelPlacer<'a> {
    pub fn new(config: &'a LabelConfig, measure: &'a dyn TextMeasure) -> Self {
        Self { config, measure }
    }

    /// Decide a side for every request. `requests` must be sorted by
    /// ascending x; the result is in the same order.
    pub fn place(
        &self,
        requests: &[LabelRequest<'_>],
        intervals: &[PixelSpan],
        viewport_width: Pixel,
    ) -> Vec<LabelPlacement> {
        debug_assert!(requests.windows(2).all(|w| w[0].x <= w[1].x));

        let half = self.config.marker_half_width;
        let near = half + self.config.spacing;
        let markers: Vec<PixelSpan> = requests
            .iter()
            .map(|r| PixelSpan::new(r.x - half, r.x + half))
            .collect();

        let mut placements = Vec::with_capacity(requests.len());
        let mut placed_labels: Vec<PixelSpan> = Vec::new();

        for (i, request) in requests.iter().enumerate() {
            let text = match request.label {
                Some(text) if !text.is_empty() => text,
                _ => {
                    placements.push(LabelPlacement::default());
                    continue;
                }
            };

            let width = self.measure.text_width(text);
            let x = request.x;
            let need = near + width;
            let right_span = PixelSpan::new(x + near, x + need);
            let left_span = PixelSpan::new(x - need, x - near);

            let mut right_open = x + need <= viewport_width;
            let mut left_open = x - need >= 0.0;

            for span in intervals {
                if span.x1 < x && span.x2 > x {
                    // the marker sits on an interval: no room either side
                    right_open = false;
                    left_open = false;
                    break;
                }
                if right_open && span.x1 >= x && span.x1 < x + need {
                    right_open = false;
                }
                if left_open && span.x2 <= x && span.x2 > x - need {
                    left_open = false;
                }
            }

            // markers of the points already swept
            for marker in &markers[..i] {
                if left_open && marker.overlaps(&left_span) {
                    left_open = false;
                }
                if right_open && marker.overlaps(&right_span) {
                    right_open = false;
                }
            }

            // markers still ahead; only those starting before the label ends matter
            for marker in &markers[i + 1..] {
                if marker.x1 >= right_span.x2 && marker.x1 >= x {
                    break;
                }
                if right_open && marker.overlaps(&right_span) {
                    right_open = false;
                }
                if left_open && marker.overlaps(&left_span) {
                    left_open = false;
                }
            }

            for label in &placed_labels {
                if left_open && label.overlaps(&left_span) {
                    left_open = false;
                }
                if right_open && label.overlaps(&right_span) {
                    right_open = false;
                }
            }

            let side = if right_open {
                placed_labels.push(right_span);
                LabelSide::Right
            } else if left_open {
                placed_labels.push(left_span);
                LabelSide::Left
            } else {
                LabelSide::None
            };
            placements.push(LabelPlacement { side, width });
        }

        placements
    }
}
