// src/processing/segmentation.rs
//! Left/right foot segmentation and region partitioning.
//!
//! Segmentation always runs on the aggregated pressure map rather than on
//! individual frames, so a foot lifted briefly during the recording still
//! contributes its full contact area.
//!
//! The split searches the central band of the grid for the column with the
//! smallest pressure sum (the gap between the feet). Columns strictly left
//! of the gap belong to the left foot, columns strictly right of it to the
//! right foot; the gap column itself stays background.

use ndarray::Array2;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::SegmentationError;
use crate::grid::{AggregatedPressureMap, Axis, BoundingBox, FootRegion, FootSide};

/// Label of one grid cell in the region mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionLabel {
    /// Contact cell belonging to a foot region.
    Foot(FootSide, FootRegion),
    /// No contact, or the gap column.
    Background,
}

/// Label grid derived once from the aggregated map and shared read-only by
/// all downstream region-aware computations.
pub type FootRegionMask = Array2<RegionLabel>;

/// Result of the left/right split on the aggregated map.
#[derive(Debug, Clone, PartialEq)]
pub struct SideSplit {
    /// The gap column; the boundary between the feet.
    pub gap_col: usize,
    /// Bounding box of the left foot's contact cells, if any.
    pub left: Option<BoundingBox>,
    /// Bounding box of the right foot's contact cells, if any.
    pub right: Option<BoundingBox>,
}

impl SideSplit {
    /// Bounding box for one side.
    pub fn bbox(&self, side: FootSide) -> Option<BoundingBox> {
        match side {
            FootSide::Left => self.left,
            FootSide::Right => self.right,
        }
    }

    /// Column range `(start, end_exclusive)` owned by one side.
    pub fn side_columns(&self, side: FootSide, total_cols: usize) -> (usize, usize) {
        match side {
            FootSide::Left => (0, self.gap_col),
            FootSide::Right => ((self.gap_col + 1).min(total_cols), total_cols),
        }
    }
}

/// Three equal-length bands along a bounding box's longitudinal axis.
///
/// `hind_end` and `mid_end` are exclusive edges in grid coordinates along
/// [`Self::axis`]; the hindfoot band starts at the heel edge, which is the
/// low-index end of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionBands {
    /// Longitudinal axis the bands run along.
    pub axis: Axis,
    /// First coordinate of the hindfoot band.
    pub start: usize,
    /// Exclusive end of the hindfoot band.
    pub hind_end: usize,
    /// Exclusive end of the midfoot band.
    pub mid_end: usize,
    /// Exclusive end of the forefoot band.
    pub end: usize,
}

impl RegionBands {
    /// Region of a longitudinal coordinate inside the bands, or `None`
    /// outside the bounding box.
    pub fn region_of(&self, coordinate: usize) -> Option<FootRegion> {
        if coordinate < self.start || coordinate >= self.end {
            None
        } else if coordinate < self.hind_end {
            Some(FootRegion::Hindfoot)
        } else if coordinate < self.mid_end {
            Some(FootRegion::Midfoot)
        } else {
            Some(FootRegion::Forefoot)
        }
    }
}

/// Find the gap column and per-side bounding boxes.
///
/// Fails with [`SegmentationError`] when the map carries no pressure or
/// when no acceptably quiet gap column exists inside the central band (a
/// single undivided blob spanning the grid).
pub fn split_sides(
    map: &AggregatedPressureMap,
    config: &AnalysisConfig,
) -> Result<SideSplit, SegmentationError> {
    if map.total_pressure() == 0.0 {
        return Err(SegmentationError::NoPressure);
    }

    let sums = map.column_sums();
    let cols = map.cols();
    let band_len = ((cols as f64 * config.central_band_fraction).ceil() as usize)
        .clamp(1, cols);
    let band_start = (cols - band_len) / 2;
    let band = band_start..band_start + band_len;

    // First minimal column wins ties so the split is deterministic.
    let mut gap_col = band.start;
    let mut min_sum = f64::INFINITY;
    for col in band {
        if sums[col] < min_sum {
            min_sum = sums[col];
            gap_col = col;
        }
    }

    let max_sum = sums.iter().cloned().fold(0.0f64, f64::max);
    let limit = max_sum * config.max_gap_fill_ratio;
    if min_sum > limit {
        return Err(SegmentationError::NoGap { min_sum, limit });
    }

    let left = side_bbox(map.grid(), 0, gap_col);
    let right = side_bbox(map.grid(), (gap_col + 1).min(cols), cols);
    debug!(gap_col, ?left, ?right, "side split complete");

    Ok(SideSplit {
        gap_col,
        left,
        right,
    })
}

/// Minimal bounding rectangle of the nonzero cells inside a column range.
pub(crate) fn side_bbox(
    grid: &Array2<f64>,
    col_start: usize,
    col_end: usize,
) -> Option<BoundingBox> {
    let mut bbox: Option<BoundingBox> = None;
    for ((row, col), &value) in grid.indexed_iter() {
        if col < col_start || col >= col_end || value <= 0.0 {
            continue;
        }
        bbox = Some(match bbox {
            None => BoundingBox {
                min_row: row,
                max_row: row,
                min_col: col,
                max_col: col,
            },
            Some(b) => BoundingBox {
                min_row: b.min_row.min(row),
                max_row: b.max_row.max(row),
                min_col: b.min_col.min(col),
                max_col: b.max_col.max(col),
            },
        });
    }
    bbox
}

/// Divide a bounding box into three equal-length longitudinal bands.
///
/// Band edges use integer division, so a short footprint may produce empty
/// bands; a missing bounding box (no contact) yields no bands at all and an
/// all-zero distribution downstream.
pub fn region_bands(bbox: &BoundingBox) -> RegionBands {
    let axis = bbox.longitudinal_axis();
    let (start, extent) = match axis {
        Axis::Rows => (bbox.min_row, bbox.row_extent()),
        Axis::Cols => (bbox.min_col, bbox.col_extent()),
    };
    RegionBands {
        axis,
        start,
        hind_end: start + extent / 3,
        mid_end: start + 2 * extent / 3,
        end: start + extent,
    }
}

/// Per-side geometry handed to the mask builder and the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideGeometry {
    /// Contact bounding box.
    pub bbox: BoundingBox,
    /// Longitudinal thirds of the bounding box.
    pub bands: RegionBands,
}

impl SideGeometry {
    /// Derive bands from a bounding box.
    pub fn from_bbox(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            bands: region_bands(&bbox),
        }
    }
}

/// Build the region label grid for a (possibly reconstructed) pressure map.
pub fn build_mask(
    grid: &Array2<f64>,
    gap_col: usize,
    left: Option<&SideGeometry>,
    right: Option<&SideGeometry>,
) -> FootRegionMask {
    let mut mask = Array2::from_elem(grid.dim(), RegionLabel::Background);
    for ((row, col), &value) in grid.indexed_iter() {
        if value <= 0.0 || col == gap_col {
            continue;
        }
        let (side, geometry) = if col < gap_col {
            (FootSide::Left, left)
        } else {
            (FootSide::Right, right)
        };
        let Some(geometry) = geometry else { continue };
        let coordinate = match geometry.bands.axis {
            Axis::Rows => row,
            Axis::Cols => col,
        };
        if let Some(region) = geometry.bands.region_of(coordinate) {
            mask[[row, col]] = RegionLabel::Foot(side, region);
        }
    }
    mask
}

/// Pressure sums and contact-cell counts per (side, region).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegionStats {
    pressure: [[f64; 3]; 2],
    cells: [[usize; 3]; 2],
}

impl RegionStats {
    /// Accumulate stats in one pass over the mask and grid.
    pub fn compute(grid: &Array2<f64>, mask: &FootRegionMask) -> Self {
        let mut stats = Self::default();
        for (label, &value) in mask.iter().zip(grid.iter()) {
            if let RegionLabel::Foot(side, region) = label {
                let s = side_index(*side);
                let r = region.index();
                stats.pressure[s][r] += value;
                if value > 0.0 {
                    stats.cells[s][r] += 1;
                }
            }
        }
        stats
    }

    /// Pressure sum in one region.
    pub fn pressure(&self, side: FootSide, region: FootRegion) -> f64 {
        self.pressure[side_index(side)][region.index()]
    }

    /// Contact-cell count in one region.
    pub fn cells(&self, side: FootSide, region: FootRegion) -> usize {
        self.cells[side_index(side)][region.index()]
    }

    /// Total pressure of one side across its three regions.
    pub fn side_pressure(&self, side: FootSide) -> f64 {
        self.pressure[side_index(side)].iter().sum()
    }

    /// Total contact-cell count of one side.
    pub fn side_cells(&self, side: FootSide) -> usize {
        self.cells[side_index(side)].iter().sum()
    }

    /// Percentages of the side's total pressure, heel-to-toe order.
    ///
    /// All-zero when the side carries no pressure; otherwise the three
    /// values sum to 100 up to floating rounding.
    pub fn distribution(&self, side: FootSide) -> [f64; 3] {
        let total = self.side_pressure(side);
        if total <= 0.0 {
            return [0.0; 3];
        }
        let row = &self.pressure[side_index(side)];
        [
            row[0] / total * 100.0,
            row[1] / total * 100.0,
            row[2] / total * 100.0,
        ]
    }
}

fn side_index(side: FootSide) -> usize {
    match side {
        FootSide::Left => 0,
        FootSide::Right => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::FrameSequence;
    use ndarray::Array2;

    /// 10x9 map with two 3-column blobs separated by an empty middle column.
    fn two_blob_map() -> AggregatedPressureMap {
        let mut grid = Array2::<f64>::zeros((10, 9));
        for row in 1..9 {
            for col in 0..3 {
                grid[[row, col]] = 10.0;
            }
            for col in 6..9 {
                grid[[row, col]] = 10.0;
            }
        }
        FrameSequence::new(vec![grid]).unwrap().aggregate()
    }

    #[test]
    fn test_split_finds_gap_between_blobs() {
        let map = two_blob_map();
        let split = split_sides(&map, &AnalysisConfig::default()).unwrap();
        assert!(split.gap_col >= 3 && split.gap_col <= 5);
        let left = split.left.unwrap();
        let right = split.right.unwrap();
        assert_eq!((left.min_col, left.max_col), (0, 2));
        assert_eq!((right.min_col, right.max_col), (6, 8));
        assert_eq!((left.min_row, left.max_row), (1, 8));
    }

    #[test]
    fn test_split_rejects_empty_map() {
        let grid = Array2::<f64>::zeros((6, 6));
        let map = FrameSequence::new(vec![grid]).unwrap().aggregate();
        assert_eq!(
            split_sides(&map, &AnalysisConfig::default()),
            Err(SegmentationError::NoPressure)
        );
    }

    #[test]
    fn test_split_rejects_undivided_blob() {
        let grid = Array2::<f64>::from_elem((6, 8), 20.0);
        let map = FrameSequence::new(vec![grid]).unwrap().aggregate();
        assert!(matches!(
            split_sides(&map, &AnalysisConfig::default()),
            Err(SegmentationError::NoGap { .. })
        ));
    }

    #[test]
    fn test_single_left_foot_is_valid() {
        // One foot only: the central band is quiet, the right side is empty.
        let mut grid = Array2::<f64>::zeros((10, 12));
        for row in 1..9 {
            for col in 0..3 {
                grid[[row, col]] = 15.0;
            }
        }
        let map = FrameSequence::new(vec![grid]).unwrap().aggregate();
        let split = split_sides(&map, &AnalysisConfig::default()).unwrap();
        assert!(split.left.is_some());
        assert!(split.right.is_none());
    }

    #[test]
    fn test_region_bands_equal_thirds() {
        let bbox = BoundingBox {
            min_row: 2,
            max_row: 10, // extent 9
            min_col: 0,
            max_col: 2,
        };
        let bands = region_bands(&bbox);
        assert_eq!(bands.axis, Axis::Rows);
        assert_eq!((bands.start, bands.hind_end, bands.mid_end, bands.end), (2, 5, 8, 11));
        assert_eq!(bands.region_of(4), Some(FootRegion::Hindfoot));
        assert_eq!(bands.region_of(5), Some(FootRegion::Midfoot));
        assert_eq!(bands.region_of(8), Some(FootRegion::Forefoot));
        assert_eq!(bands.region_of(11), None);
    }

    #[test]
    fn test_mask_and_stats_distribution_sums_to_100() {
        let map = two_blob_map();
        let config = AnalysisConfig::default();
        let split = split_sides(&map, &config).unwrap();
        let left = split.left.map(SideGeometry::from_bbox);
        let right = split.right.map(SideGeometry::from_bbox);
        let mask = build_mask(map.grid(), split.gap_col, left.as_ref(), right.as_ref());
        let stats = RegionStats::compute(map.grid(), &mask);

        for side in FootSide::BOTH {
            let distribution = stats.distribution(side);
            let sum: f64 = distribution.iter().sum();
            assert!((sum - 100.0).abs() < 1e-9, "side {side:?} sums to {sum}");
            assert!(stats.side_cells(side) > 0);
        }
    }

    #[test]
    fn test_empty_side_distribution_is_zero() {
        let stats = RegionStats::default();
        assert_eq!(stats.distribution(FootSide::Left), [0.0; 3]);
    }

    proptest::proptest! {
        #[test]
        fn prop_distribution_sums_and_arch_index_in_range(
            cells in proptest::collection::vec(0.0f64..50.0, 48),
        ) {
            use proptest::prelude::prop_assert;

            let grid = Array2::from_shape_vec((8, 6), cells).unwrap();
            let bbox = side_bbox(&grid, 0, 5);
            let geometry = bbox.map(SideGeometry::from_bbox);
            let mask = build_mask(&grid, 5, geometry.as_ref(), None);
            let stats = RegionStats::compute(&grid, &mask);

            let sum: f64 = stats.distribution(FootSide::Left).iter().sum();
            prop_assert!(sum == 0.0 || (sum - 100.0).abs() < 1e-6);

            let ai = crate::processing::arch::arch_index(&stats, FootSide::Left);
            if let Some(ai) = ai {
                prop_assert!((0.0..=1.0).contains(&ai));
            }
        }
    }

    #[test]
    fn test_gap_column_stays_background() {
        let map = two_blob_map();
        let config = AnalysisConfig::default();
        let split = split_sides(&map, &config).unwrap();
        let left = split.left.map(SideGeometry::from_bbox);
        let right = split.right.map(SideGeometry::from_bbox);
        let mask = build_mask(map.grid(), split.gap_col, left.as_ref(), right.as_ref());
        for row in 0..map.rows() {
            assert_eq!(mask[[row, split.gap_col]], RegionLabel::Background);
        }
    }
}
