// src/processing/cop.rs
//! Center-of-pressure tracking.
//!
//! For every frame and each foot independently, the COP is the
//! pressure-weighted centroid of that side's cells. Frames in which a side
//! carries no pressure contribute no point at all; the trajectory simply
//! skips them. No smoothing is applied beyond the upstream noise filter.

use ndarray::Array2;

use crate::grid::{FootSide, FrameSequence};
use crate::processing::segmentation::SideSplit;

/// One trajectory sample.
///
/// Coordinates are grid units, or physical units when a cell size is
/// configured.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CopPoint {
    /// Index of the frame this sample was taken from.
    pub frame_index: usize,
    /// Vertical coordinate (row direction).
    pub row: f64,
    /// Horizontal coordinate (column direction).
    pub col: f64,
}

/// Ordered per-side trajectory; zero-pressure frames are omitted rather
/// than represented as degenerate points.
pub type CopTrajectory = Vec<CopPoint>;

/// Compute both feet's trajectories over a filtered frame sequence.
pub fn track(
    sequence: &FrameSequence,
    split: &SideSplit,
    cell_size: Option<f64>,
) -> (CopTrajectory, CopTrajectory) {
    let cols = sequence.cols();
    let scale = cell_size.unwrap_or(1.0);
    let mut left = Vec::new();
    let mut right = Vec::new();
    for (frame_index, frame) in sequence.frames().iter().enumerate() {
        for (side, trajectory) in [(FootSide::Left, &mut left), (FootSide::Right, &mut right)] {
            let (col_start, col_end) = split.side_columns(side, cols);
            if let Some(point) = centroid(frame, frame_index, col_start, col_end, scale) {
                trajectory.push(point);
            }
        }
    }
    (left, right)
}

fn centroid(
    frame: &Array2<f64>,
    frame_index: usize,
    col_start: usize,
    col_end: usize,
    scale: f64,
) -> Option<CopPoint> {
    let mut total = 0.0;
    let mut row_moment = 0.0;
    let mut col_moment = 0.0;
    for ((row, col), &value) in frame.indexed_iter() {
        if col < col_start || col >= col_end || value <= 0.0 {
            continue;
        }
        total += value;
        row_moment += row as f64 * value;
        col_moment += col as f64 * value;
    }
    if total <= 0.0 {
        return None;
    }
    Some(CopPoint {
        frame_index,
        row: row_moment / total * scale,
        col: col_moment / total * scale,
    })
}
