// src/config/mod.rs
//! Analyzer configuration.
//!
//! Configuration is an explicit value handed to [`FootPressureAnalyzer`]
//! at construction time; there is no process-wide configuration state, so
//! concurrent invocations with different thresholds never interfere.
//!
//! [`FootPressureAnalyzer`]: crate::processing::pipeline::FootPressureAnalyzer

pub mod constants;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::render::colormap::Colormap;

/// Complete analysis configuration with per-field defaults.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct AnalysisConfig {
    /// Readings below this value are treated as sensor noise and zeroed.
    #[serde(default = "defaults::noise_threshold")]
    pub noise_threshold: f64,

    /// Centered fraction of the grid width searched for the gap column.
    #[serde(default = "defaults::central_band_fraction")]
    pub central_band_fraction: f64,

    /// Maximum fraction of the peak column sum a gap column may carry.
    #[serde(default = "defaults::max_gap_fill_ratio")]
    pub max_gap_fill_ratio: f64,

    /// Expected full-footprint longitudinal extent in sensor rows.
    #[serde(default = "defaults::reference_foot_length")]
    pub reference_foot_length: f64,

    /// Visible-extent ratio below which an edge-touching footprint is
    /// considered truncated and reconstructed.
    #[serde(default = "defaults::completeness_threshold")]
    pub completeness_threshold: f64,

    /// Arch-index cut point below which a foot is Pes Cavus.
    #[serde(default = "defaults::low_cut")]
    pub low_cut: f64,

    /// Arch-index cut point above which a foot is Pes Planus.
    #[serde(default = "defaults::high_cut")]
    pub high_cut: f64,

    /// Physical edge length of one sensor cell. When set, COP coordinates
    /// are reported in physical units instead of grid units.
    #[serde(default)]
    pub cell_size: Option<f64>,

    /// Visualization settings.
    #[serde(default)]
    pub render: RenderConfig,
}

/// Visualization configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RenderConfig {
    /// Pixels drawn per sensor cell.
    #[serde(default = "defaults::cell_px")]
    pub cell_px: u32,

    /// Colormap applied to the pressure heatmap.
    #[serde(default)]
    pub colormap: Colormap,

    /// Upper end of the fixed value-to-color range. Readings above it
    /// saturate at the top of the ramp.
    #[serde(default = "defaults::color_scale_max")]
    pub color_scale_max: f64,

    /// Optional TrueType font file for annotations. Load failure degrades
    /// to the built-in font rather than failing the render.
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    /// Annotation text size in pixels.
    #[serde(default = "defaults::font_px")]
    pub font_px: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            noise_threshold: defaults::noise_threshold(),
            central_band_fraction: defaults::central_band_fraction(),
            max_gap_fill_ratio: defaults::max_gap_fill_ratio(),
            reference_foot_length: defaults::reference_foot_length(),
            completeness_threshold: defaults::completeness_threshold(),
            low_cut: defaults::low_cut(),
            high_cut: defaults::high_cut(),
            cell_size: None,
            render: RenderConfig::default(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_px: defaults::cell_px(),
            colormap: Colormap::default(),
            color_scale_max: defaults::color_scale_max(),
            font_path: None,
            font_px: defaults::font_px(),
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from TOML text, applying defaults for any
    /// missing field, then validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(text).map_err(|err| ConfigError::Load(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|err| ConfigError::Load(format!("{}: {err}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Check every parameter against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn require(
            ok: bool,
            parameter: &'static str,
            value: f64,
            requirement: &'static str,
        ) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::OutOfRange {
                    parameter,
                    value,
                    requirement,
                })
            }
        }

        require(
            self.noise_threshold.is_finite() && self.noise_threshold >= 0.0,
            "noise_threshold",
            self.noise_threshold,
            "must be a finite value >= 0",
        )?;
        require(
            self.central_band_fraction > 0.0 && self.central_band_fraction <= 1.0,
            "central_band_fraction",
            self.central_band_fraction,
            "must be within (0, 1]",
        )?;
        require(
            (0.0..=1.0).contains(&self.max_gap_fill_ratio),
            "max_gap_fill_ratio",
            self.max_gap_fill_ratio,
            "must be within [0, 1]",
        )?;
        require(
            self.reference_foot_length > 0.0 && self.reference_foot_length.is_finite(),
            "reference_foot_length",
            self.reference_foot_length,
            "must be a finite value > 0",
        )?;
        require(
            self.completeness_threshold > 0.0 && self.completeness_threshold <= 1.0,
            "completeness_threshold",
            self.completeness_threshold,
            "must be within (0, 1]",
        )?;
        require(
            (0.0..=1.0).contains(&self.low_cut),
            "low_cut",
            self.low_cut,
            "must be within [0, 1]",
        )?;
        require(
            (0.0..=1.0).contains(&self.high_cut),
            "high_cut",
            self.high_cut,
            "must be within [0, 1]",
        )?;
        if self.low_cut >= self.high_cut {
            return Err(ConfigError::CutPointOrder {
                low_cut: self.low_cut,
                high_cut: self.high_cut,
            });
        }
        if let Some(cell_size) = self.cell_size {
            require(
                cell_size > 0.0 && cell_size.is_finite(),
                "cell_size",
                cell_size,
                "must be a finite value > 0",
            )?;
        }
        require(
            self.render.cell_px > 0,
            "render.cell_px",
            f64::from(self.render.cell_px),
            "must be > 0",
        )?;
        require(
            self.render.color_scale_max > 0.0 && self.render.color_scale_max.is_finite(),
            "render.color_scale_max",
            self.render.color_scale_max,
            "must be a finite value > 0",
        )?;
        require(
            self.render.font_px > 0.0 && self.render.font_px.is_finite(),
            "render.font_px",
            f64::from(self.render.font_px),
            "must be a finite value > 0",
        )?;
        Ok(())
    }
}

/// Default value providers backed by [`constants`].
mod defaults {
    use super::constants::{analysis, classification, render};

    pub fn noise_threshold() -> f64 {
        analysis::DEFAULT_NOISE_THRESHOLD
    }
    pub fn central_band_fraction() -> f64 {
        analysis::DEFAULT_CENTRAL_BAND_FRACTION
    }
    pub fn max_gap_fill_ratio() -> f64 {
        analysis::DEFAULT_MAX_GAP_FILL_RATIO
    }
    pub fn reference_foot_length() -> f64 {
        analysis::DEFAULT_REFERENCE_FOOT_LENGTH
    }
    pub fn completeness_threshold() -> f64 {
        analysis::DEFAULT_COMPLETENESS_THRESHOLD
    }
    pub fn low_cut() -> f64 {
        classification::DEFAULT_LOW_CUT
    }
    pub fn high_cut() -> f64 {
        classification::DEFAULT_HIGH_CUT
    }
    pub fn cell_px() -> u32 {
        render::DEFAULT_CELL_PX
    }
    pub fn color_scale_max() -> f64 {
        render::DEFAULT_COLOR_SCALE_MAX
    }
    pub fn font_px() -> f32 {
        render::DEFAULT_FONT_PX
    }
}
