// src/processing/arch.rs
//! Arch-index computation and foot-type classification.
//!
//! The arch index (Cavanagh & Rodgers, 1987) is the midfoot share of the
//! foot's contact area: contact-cell count in the midfoot region divided by
//! the contact-cell count across all three regions. Classification uses two
//! configured cut points; both boundary values belong to the Normal band.

use serde::{Deserialize, Serialize};

use crate::grid::{FootRegion, FootSide};
use crate::processing::segmentation::RegionStats;

/// Arch-type label derived from the arch index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FootType {
    /// High arch: arch index below the low cut.
    PesCavus,
    /// Arch index inside the configured band, boundaries inclusive.
    Normal,
    /// Flat foot: arch index above the high cut.
    PesPlanus,
    /// No contact area; the arch index is undefined.
    Undetermined,
}

impl FootType {
    /// Stable label used in the cross-boundary record.
    pub fn label(self) -> &'static str {
        match self {
            FootType::PesCavus => "Pes Cavus (High Arch)",
            FootType::Normal => "Normal",
            FootType::PesPlanus => "Pes Planus (Flat Foot)",
            FootType::Undetermined => "Undetermined",
        }
    }
}

impl std::fmt::Display for FootType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Arch index for one side, `None` when the side has no contact cells.
pub fn arch_index(stats: &RegionStats, side: FootSide) -> Option<f64> {
    let total = stats.side_cells(side);
    if total == 0 {
        return None;
    }
    let midfoot = stats.cells(side, FootRegion::Midfoot);
    Some(midfoot as f64 / total as f64)
}

/// Map an arch index to its foot type. Boundary values are Normal.
pub fn classify(arch_index: Option<f64>, low_cut: f64, high_cut: f64) -> FootType {
    match arch_index {
        None => FootType::Undetermined,
        Some(ai) if ai < low_cut => FootType::PesCavus,
        Some(ai) if ai > high_cut => FootType::PesPlanus,
        Some(_) => FootType::Normal,
    }
}

/// Supplemental quality score in [0, 100]: distance of the arch index from
/// the ideal value at the center of the Normal band, one decimal place.
pub fn arch_score(arch_index: Option<f64>, low_cut: f64, high_cut: f64) -> f64 {
    let Some(ai) = arch_index else { return 0.0 };
    let ideal = (low_cut + high_cut) / 2.0;
    let half_width = (high_cut - low_cut) / 2.0;
    if half_width == 0.0 {
        return if ai == ideal { 100.0 } else { 0.0 };
    }
    let deviation = (ai - ideal).abs() / half_width;
    let score = (100.0 - deviation * 50.0).max(0.0);
    (score * 10.0).round() / 10.0
}
