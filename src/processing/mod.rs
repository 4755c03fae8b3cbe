// src/processing/mod.rs
//! The analysis engine: noise filtering, segmentation, reconstruction,
//! COP tracking, arch classification, and pipeline orchestration.

pub mod arch;
pub mod cop;
pub mod noise;
pub mod pipeline;
pub mod reconstruction;
pub mod segmentation;

pub use arch::FootType;
pub use cop::{CopPoint, CopTrajectory};
pub use pipeline::{
    analyze_bytes, AnalysisReport, AnalysisResult, FootAnalysis, FootPressureAnalyzer,
};
pub use segmentation::{FootRegionMask, RegionBands, RegionLabel, RegionStats, SideSplit};
