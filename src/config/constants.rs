// src/config/constants.rs
//! Documented default values for every configurable parameter.
//!
//! Absence of an explicit configuration value always falls back to one of
//! these constants.

/// Noise filtering and segmentation defaults.
pub mod analysis {
    /// Readings below this value are zeroed before any statistics run.
    pub const DEFAULT_NOISE_THRESHOLD: f64 = 5.0;

    /// Fraction of the grid width, centered, searched for the inter-foot gap
    /// column. The default searches the middle half of the columns.
    pub const DEFAULT_CENTRAL_BAND_FRACTION: f64 = 0.5;

    /// A gap column is only accepted when its pressure sum is at most this
    /// fraction of the largest column sum. A single blob spanning the whole
    /// central band fails this test.
    pub const DEFAULT_MAX_GAP_FILL_RATIO: f64 = 0.1;

    /// Expected full-footprint longitudinal extent, in sensor rows, used to
    /// detect truncated contact.
    pub const DEFAULT_REFERENCE_FOOT_LENGTH: f64 = 20.0;

    /// A footprint touching a grid edge is reconstructed when its visible
    /// extent divided by the reference length falls below this ratio.
    pub const DEFAULT_COMPLETENESS_THRESHOLD: f64 = 0.7;
}

/// Arch-index classification defaults, after Cavanagh & Rodgers (1987).
pub mod classification {
    /// Arch index strictly below this is classified Pes Cavus (high arch).
    pub const DEFAULT_LOW_CUT: f64 = 0.21;

    /// Arch index strictly above this is classified Pes Planus (flat foot).
    /// Both cut values themselves fall inside the Normal band.
    pub const DEFAULT_HIGH_CUT: f64 = 0.26;
}

/// Visualization defaults.
pub mod render {
    /// Edge length, in pixels, of the square drawn per sensor cell.
    pub const DEFAULT_CELL_PX: u32 = 16;

    /// Upper end of the fixed value-to-color range. Raw captures store
    /// 8-bit readings, so the full ramp covers 0..=255 out of the box.
    pub const DEFAULT_COLOR_SCALE_MAX: f64 = 255.0;

    /// Text size, in pixels, for annotations.
    pub const DEFAULT_FONT_PX: f32 = 14.0;
}
