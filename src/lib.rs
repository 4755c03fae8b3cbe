//! Podo-Core: plantar pressure analysis library
//!
//! This library turns a recording from a grid pressure sensor into a
//! structured gait report. It features:
//!
//! - JSON loaders for frame-sequence and legacy single-frame row-map uploads
//! - Noise filtering and time aggregation of the frame sequence
//! - Left/right foot segmentation with hindfoot/midfoot/forefoot bands
//! - Virtual reconstruction of footprints truncated at the sensor edge
//! - Center-of-pressure trajectories and arch-index foot-type classification
//! - Deterministic PNG visualization of the annotated pressure map
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use podo_core::{AnalysisConfig, FootPressureAnalyzer};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let analyzer = FootPressureAnalyzer::new(AnalysisConfig::default())?;
//!
//!     let bytes = std::fs::read("recording.json")?;
//!     let report = analyzer.analyze_bytes(&bytes)?;
//!
//!     println!("{}", report.record().to_json_value());
//!     let png = report.render_png(&analyzer.config().render)?;
//!     std::fs::write("report.png", png)?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod grid;
pub mod loader;
pub mod processing;
pub mod render;
pub mod report;

// Re-export commonly used types for convenience
pub use config::{AnalysisConfig, RenderConfig};
pub use error::{
    AnalysisError, ConfigError, FormatError, PodoResult, RenderError, SegmentationError,
};
pub use grid::{AggregatedPressureMap, BoundingBox, FootRegion, FootSide, FrameSequence};
pub use processing::{
    analyze_bytes, AnalysisReport, AnalysisResult, CopPoint, CopTrajectory, FootAnalysis,
    FootPressureAnalyzer, FootType,
};
pub use render::colormap::Colormap;
pub use report::ReportRecord;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
