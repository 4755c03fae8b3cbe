// src/processing/reconstruction.rs
//! Virtual footprint reconstruction for truncated contact.
//!
//! A footprint clipped at the top or bottom sensor edge (a heel or forefoot
//! landing partly off the mat) would skew the region distribution toward the
//! visible end. When a side's bounding box touches a grid edge and its
//! visible longitudinal extent falls below the configured completeness ratio
//! of the reference foot length, the missing extent is synthesized: the
//! pressure profile of the visible boundary row is mirrored outward with a
//! linearly decaying weight that reaches zero at the inferred far edge.
//!
//! The synthesized region is merged into a working copy of the aggregated
//! map (padded with extra rows, tracked by `row_offset`) before region
//! thirds and distribution statistics are computed. When no side is
//! truncated the step is a bitwise no-op, which also makes it idempotent:
//! a reconstructed footprint no longer touches an edge of the working grid.

use ndarray::Array2;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::grid::{AggregatedPressureMap, Axis, BoundingBox, FootSide};
use crate::processing::segmentation::{side_bbox, SideSplit};

/// Outcome of the reconstruction step.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// Working pressure map; identical to the input when nothing was
    /// synthesized, padded with extra rows otherwise.
    pub map: AggregatedPressureMap,
    /// Original row `r` lives at working row `r + row_offset`.
    pub row_offset: usize,
    /// Updated left-foot bounding box in working-map coordinates.
    pub left: Option<BoundingBox>,
    /// Updated right-foot bounding box in working-map coordinates.
    pub right: Option<BoundingBox>,
    /// Which sides had a region synthesized.
    pub synthesized: [bool; 2],
}

impl Reconstruction {
    /// Updated bounding box for one side.
    pub fn bbox(&self, side: FootSide) -> Option<BoundingBox> {
        match side {
            FootSide::Left => self.left,
            FootSide::Right => self.right,
        }
    }
}

/// Direction a truncated footprint extends past the sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Extend {
    /// Footprint clipped at row 0; synthesize rows above it.
    Up,
    /// Footprint clipped at the last row; synthesize rows below it.
    Down,
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    side: FootSide,
    direction: Extend,
    /// Boundary row of the visible footprint, original coordinates.
    boundary_row: usize,
    /// Number of rows to synthesize beyond the boundary.
    missing: usize,
}

/// Detect truncation per side and merge any synthesized regions.
pub fn reconstruct(
    map: &AggregatedPressureMap,
    split: &SideSplit,
    config: &AnalysisConfig,
) -> Reconstruction {
    let rows = map.rows();
    let cols = map.cols();

    let mut plans: Vec<Plan> = Vec::new();
    for side in FootSide::BOTH {
        let Some(bbox) = split.bbox(side) else { continue };
        // Feet sit side by side on the sensor, so clipping can only happen
        // along rows; a column-longitudinal contact blob is left untouched.
        if bbox.longitudinal_axis() != Axis::Rows {
            continue;
        }
        let touches_top = bbox.min_row == 0;
        let touches_bottom = bbox.max_row + 1 == rows;
        if touches_top == touches_bottom {
            continue;
        }
        let extent = bbox.row_extent();
        let completeness = extent as f64 / config.reference_foot_length;
        if completeness >= config.completeness_threshold {
            continue;
        }
        let missing = (config.reference_foot_length.round() as usize).saturating_sub(extent);
        if missing == 0 {
            continue;
        }
        let (direction, boundary_row) = if touches_top {
            (Extend::Up, bbox.min_row)
        } else {
            (Extend::Down, bbox.max_row)
        };
        debug!(
            ?side,
            ?direction,
            extent,
            missing,
            completeness,
            "truncated footprint detected"
        );
        plans.push(Plan {
            side,
            direction,
            boundary_row,
            missing,
        });
    }

    if plans.is_empty() {
        return Reconstruction {
            map: map.clone(),
            row_offset: 0,
            left: split.left,
            right: split.right,
            synthesized: [false, false],
        };
    }

    let pad_top = plans
        .iter()
        .filter(|p| p.direction == Extend::Up)
        .map(|p| p.missing)
        .max()
        .unwrap_or(0);
    let pad_bottom = plans
        .iter()
        .filter(|p| p.direction == Extend::Down)
        .map(|p| p.missing)
        .max()
        .unwrap_or(0);

    let mut grid = Array2::<f64>::zeros((rows + pad_top + pad_bottom, cols));
    grid.slice_mut(ndarray::s![pad_top..pad_top + rows, ..])
        .assign(map.grid());

    let mut synthesized = [false, false];
    for plan in &plans {
        let (col_start, col_end) = split.side_columns(plan.side, cols);
        let boundary = map.grid().row(plan.boundary_row);
        for k in 1..=plan.missing {
            // Linear decay, zero exactly at the inferred far edge.
            let weight = 1.0 - k as f64 / plan.missing as f64;
            let working_row = match plan.direction {
                Extend::Up => pad_top + plan.boundary_row - k,
                Extend::Down => pad_top + plan.boundary_row + k,
            };
            for col in col_start..col_end {
                grid[[working_row, col]] = boundary[col] * weight;
            }
        }
        synthesized[match plan.side {
            FootSide::Left => 0,
            FootSide::Right => 1,
        }] = true;
    }

    // Bounding boxes are recomputed on the merged grid so the synthesized
    // rows extend the region thirds.
    let (left_start, left_end) = split.side_columns(FootSide::Left, cols);
    let (right_start, right_end) = split.side_columns(FootSide::Right, cols);
    let left = side_bbox(&grid, left_start, left_end);
    let right = side_bbox(&grid, right_start, right_end);

    Reconstruction {
        map: AggregatedPressureMap::from_grid(grid),
        row_offset: pad_top,
        left,
        right,
        synthesized,
    }
}
