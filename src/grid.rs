// src/grid.rs
//! Core grid data model: sensor frames, frame sequences, and the
//! time-aggregated pressure map.
//!
//! All structures here are scoped to a single analysis invocation and are
//! immutable once constructed.

use ndarray::Array2;

use crate::error::FormatError;

/// Which foot a cell or statistic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootSide {
    /// The left foot, columns left of the gap column.
    Left,
    /// The right foot, columns right of the gap column.
    Right,
}

impl FootSide {
    /// Both sides, in reporting order.
    pub const BOTH: [FootSide; 2] = [FootSide::Left, FootSide::Right];

    /// Stable lowercase label used in the cross-boundary record.
    pub fn label(self) -> &'static str {
        match self {
            FootSide::Left => "left",
            FootSide::Right => "right",
        }
    }

    /// Single-letter prefix used in region codes ("LH", "RM", ...).
    pub fn code(self) -> char {
        match self {
            FootSide::Left => 'L',
            FootSide::Right => 'R',
        }
    }
}

/// Longitudinal third of a foot's contact bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootRegion {
    /// The third nearest the heel edge.
    Hindfoot,
    /// The middle third; its contact area drives the arch index.
    Midfoot,
    /// The third nearest the toes.
    Forefoot,
}

impl FootRegion {
    /// All regions in heel-to-toe order.
    pub const ALL: [FootRegion; 3] = [
        FootRegion::Hindfoot,
        FootRegion::Midfoot,
        FootRegion::Forefoot,
    ];

    /// Single-letter suffix used in region codes ("LH", "RM", ...).
    pub fn code(self) -> char {
        match self {
            FootRegion::Hindfoot => 'H',
            FootRegion::Midfoot => 'M',
            FootRegion::Forefoot => 'F',
        }
    }

    /// Index in heel-to-toe order, used for compact per-region arrays.
    pub fn index(self) -> usize {
        match self {
            FootRegion::Hindfoot => 0,
            FootRegion::Midfoot => 1,
            FootRegion::Forefoot => 2,
        }
    }
}

/// Grid axis of a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// The row axis (top to bottom).
    Rows,
    /// The column axis (left to right).
    Cols,
}

/// Minimal rectangle enclosing a side's nonzero cells, inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// First row with contact.
    pub min_row: usize,
    /// Last row with contact.
    pub max_row: usize,
    /// First column with contact.
    pub min_col: usize,
    /// Last column with contact.
    pub max_col: usize,
}

impl BoundingBox {
    /// Number of rows covered.
    pub fn row_extent(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    /// Number of columns covered.
    pub fn col_extent(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    /// The axis with the larger extent. Rows win ties, which matches the
    /// upright orientation of a footprint on the sensor.
    pub fn longitudinal_axis(&self) -> Axis {
        if self.col_extent() > self.row_extent() {
            Axis::Cols
        } else {
            Axis::Rows
        }
    }

    /// Extent along the longitudinal axis.
    pub fn longitudinal_extent(&self) -> usize {
        match self.longitudinal_axis() {
            Axis::Rows => self.row_extent(),
            Axis::Cols => self.col_extent(),
        }
    }

    /// Whether (row, col) lies inside the box.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.min_row && row <= self.max_row && col >= self.min_col && col <= self.max_col
    }
}

/// Ordered, shape-uniform sequence of sensor frames.
///
/// Constructed only by the loader (or [`FrameSequence::new`], which enforces
/// the same invariants) and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSequence {
    frames: Vec<Array2<f64>>,
}

impl FrameSequence {
    /// Build a sequence from raw frames, validating the full invariant set:
    /// at least one frame, identical shapes, finite non-negative values.
    pub fn new(frames: Vec<Array2<f64>>) -> Result<Self, FormatError> {
        if frames.is_empty() {
            return Err(FormatError::Empty);
        }
        let expected = frames[0].dim();
        if expected.0 == 0 || expected.1 == 0 {
            return Err(FormatError::Empty);
        }
        for (index, frame) in frames.iter().enumerate() {
            if frame.dim() != expected {
                return Err(FormatError::ShapeMismatch {
                    frame: index,
                    expected,
                    actual: frame.dim(),
                });
            }
            for ((row, col), &value) in frame.indexed_iter() {
                if !value.is_finite() || value < 0.0 {
                    return Err(FormatError::InvalidValue {
                        frame: index,
                        row,
                        col,
                        value,
                    });
                }
            }
        }
        Ok(Self { frames })
    }

    /// Number of frames; always at least 1.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// A valid sequence is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Grid rows shared by every frame.
    pub fn rows(&self) -> usize {
        self.frames[0].nrows()
    }

    /// Grid columns shared by every frame.
    pub fn cols(&self) -> usize {
        self.frames[0].ncols()
    }

    /// Borrow the underlying frames.
    pub fn frames(&self) -> &[Array2<f64>] {
        &self.frames
    }

    /// Apply a per-frame transformation, keeping order and shape.
    pub(crate) fn map_frames(&self, mut f: impl FnMut(&Array2<f64>) -> Array2<f64>) -> Self {
        Self {
            frames: self.frames.iter().map(|frame| f(frame)).collect(),
        }
    }

    /// Elementwise sum of all frames onto a single grid.
    pub fn aggregate(&self) -> AggregatedPressureMap {
        let mut grid = Array2::<f64>::zeros((self.rows(), self.cols()));
        for frame in &self.frames {
            grid += frame;
        }
        AggregatedPressureMap { grid }
    }
}

/// Time-reduced (summed) pressure grid.
///
/// Derived once per invocation; read-only input to segmentation,
/// classification, and rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedPressureMap {
    grid: Array2<f64>,
}

impl AggregatedPressureMap {
    /// Wrap an already-aggregated grid. Used by the reconstruction step to
    /// publish its merged working copy.
    pub(crate) fn from_grid(grid: Array2<f64>) -> Self {
        Self { grid }
    }

    /// Borrow the underlying grid.
    pub fn grid(&self) -> &Array2<f64> {
        &self.grid
    }

    /// Grid rows.
    pub fn rows(&self) -> usize {
        self.grid.nrows()
    }

    /// Grid columns.
    pub fn cols(&self) -> usize {
        self.grid.ncols()
    }

    /// Sum of every cell.
    pub fn total_pressure(&self) -> f64 {
        self.grid.sum()
    }

    /// Per-column pressure sums, used by the gap search.
    pub fn column_sums(&self) -> Vec<f64> {
        (0..self.cols()).map(|c| self.grid.column(c).sum()).collect()
    }
}
