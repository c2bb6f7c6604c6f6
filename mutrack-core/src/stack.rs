//! Greedy stacking of a sample's interval events
//!
//! Intervals are visited by ascending start pixel and dropped into the
//! first row whose last occupant ends at or before the new start. Sorted
//! greedy packing uses the minimum number of rows for interval graphs.

use crate::config::{LayoutConfig, RowHeightTable};
use crate::coords::PixelSpan;
use serde::{Deserialize, Serialize};

/// Row assignment for one sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackAssignment {
    /// Row of each input span, in input order
    pub rows: Vec<usize>,
    pub stack_count: usize,
    pub row_height: u32,
    pub height: u32,
}

impl RowHeightTable {
    /// Height of a single row when a sample needs `count` rows. Never
    /// increases with `count` and never drops below `min_height`.
    pub fn row_height_for(&self, count: usize) -> u32 {
        let first = match self.anchors.first() {
            Some(anchor) => anchor,
            None => return self.min_height,
        };
        if count <= first.count {
            return first.height.max(self.min_height);
        }

        let mut height = first.height;
        for pair in self.anchors.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if count >= hi.count {
                height = hi.height;
                continue;
            }
            if self.interpolate {
                let t = (count - lo.count) as f64 / (hi.count - lo.count) as f64;
                let h = lo.height as f64 + t * (hi.height as f64 - lo.height as f64);
                height = h.floor() as u32;
            } else {
                height = lo.height;
            }
            break;
        }
        height.max(self.min_height)
    }
}

/// Assign each span a row index. Returns the rows in input order and the
/// number of rows opened.
pub fn assign_rows(spans: &[PixelSpan]) -> (Vec<usize>, usize) {
    let mut order: Vec<usize> = (0..spans.len()).collect();
    order.sort_by(|&a, &b| {
        spans[a]
            .x1
            .total_cmp(&spans[b].x1)
            .then(spans[a].x2.total_cmp(&spans[b].x2))
            .then(a.cmp(&b))
    });

    let mut rows = vec![0usize; spans.len()];
    // rightmost occupied pixel per open row
    let mut stack_ends: Vec<f64> = Vec::new();

    for idx in order {
        let span = spans[idx];
        match stack_ends.iter().position(|&end| end <= span.x1) {
            Some(row) => {
                stack_ends[row] = span.x2;
                rows[idx] = row;
            }
            None => {
                rows[idx] = stack_ends.len();
                stack_ends.push(span.x2);
            }
        }
    }

    (rows, stack_ends.len())
}

/// Stack an expanded-mode sample. A sample without intervals gets the
/// point-only height when it has point events and zero height otherwise.
pub fn stack_expanded(spans: &[PixelSpan], has_points: bool, config: &LayoutConfig) -> StackAssignment {
    if spans.is_empty() {
        let height = if has_points { config.point_only_sample_height } else { 0 };
        return StackAssignment {
            rows: Vec::new(),
            stack_count: 0,
            row_height: config.row_heights.row_height_for(1),
            height,
        };
    }

    let (rows, stack_count) = assign_rows(spans);
    let row_height = config.row_heights.row_height_for(stack_count);
    StackAssignment {
        rows,
        stack_count,
        row_height,
        height: row_height * stack_count as u32,
    }
}

/// Dense mode draws every interval of a sample in one thin row.
pub fn stack_dense(spans: &[PixelSpan], config: &LayoutConfig) -> StackAssignment {
    StackAssignment {
        rows: vec![0; spans.len()],
        stack_count: 1,
        row_height: config.dense_row_height,
        height: config.dense_row_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RowHeightAnchor;

    fn spans(raw: &[(f64, f64)]) -> Vec<PixelSpan> {
        raw.iter().map(|&(a, b)| PixelSpan::new(a, b)).collect()
    }

    #[test]
    fn test_touching_interval_reuses_row() {
        let (rows, count) = assign_rows(&spans(&[(0.0, 50.0), (30.0, 80.0), (80.0, 120.0)]));
        assert_eq!(rows, vec![0, 1, 0]);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_rows_follow_input_order_not_sorted_order() {
        let (rows, count) = assign_rows(&spans(&[(80.0, 120.0), (0.0, 50.0), (30.0, 90.0)]));
        assert_eq!(rows, vec![0, 0, 1]);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_nested_intervals_need_separate_rows() {
        let (rows, count) = assign_rows(&spans(&[(0.0, 100.0), (10.0, 20.0), (15.0, 18.0)]));
        assert_eq!(count, 3);
        assert_eq!(rows, vec![0, 1, 2]);
    }

    #[test]
    fn test_empty_input() {
        let (rows, count) = assign_rows(&[]);
        assert!(rows.is_empty());
        assert_eq!(count, 0);
    }

    #[test]
    fn test_step_row_heights_match_anchor_table() {
        let table = RowHeightTable::default();
        let expected = [(1, 8), (2, 8), (3, 4), (4, 4), (5, 2), (9, 2), (10, 1), (50, 1)];
        for (count, height) in expected {
            assert_eq!(table.row_height_for(count), height, "count {}", count);
        }
    }

    #[test]
    fn test_interpolated_row_heights() {
        let table = RowHeightTable { interpolate: true, ..RowHeightTable::default() };
        assert_eq!(table.row_height_for(1), 8);
        assert_eq!(table.row_height_for(2), 6);
        assert_eq!(table.row_height_for(3), 4);
        assert_eq!(table.row_height_for(4), 3);
        assert_eq!(table.row_height_for(5), 2);
        assert_eq!(table.row_height_for(7), 1);
        assert_eq!(table.row_height_for(10), 1);
    }

    #[test]
    fn test_row_height_never_below_minimum() {
        let table = RowHeightTable {
            anchors: vec![
                RowHeightAnchor { count: 1, height: 6 },
                RowHeightAnchor { count: 4, height: 0 },
            ],
            interpolate: false,
            min_height: 2,
        };
        assert_eq!(table.row_height_for(100), 2);
    }

    #[test]
    fn test_expanded_height_formula() {
        let config = LayoutConfig::default();
        let stack = stack_expanded(&spans(&[(0.0, 50.0), (30.0, 80.0), (80.0, 120.0)]), false, &config);
        assert_eq!(stack.stack_count, 2);
        assert_eq!(stack.height, config.row_heights.row_height_for(2) * 2);
    }

    #[test]
    fn test_point_only_sample_gets_default_height() {
        let config = LayoutConfig::default();
        let stack = stack_expanded(&[], true, &config);
        assert_eq!(stack.height, config.point_only_sample_height);
        assert_eq!(stack_expanded(&[], false, &config).height, 0);
    }

    #[test]
    fn test_dense_bypasses_stacking() {
        let config = LayoutConfig::default();
        let stack = stack_dense(&spans(&[(0.0, 50.0), (10.0, 60.0)]), &config);
        assert_eq!(stack.rows, vec![0, 0]);
        assert_eq!(stack.height, config.dense_row_height);
    }
}
