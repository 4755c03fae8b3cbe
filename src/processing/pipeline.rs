// src/processing/pipeline.rs
//! Analysis pipeline orchestration.
//!
//! One invocation runs Loader → Noise Filter → Aggregation → Segmentation →
//! Virtual Reconstruction → {Distribution, COP, Arch Classification} and
//! assembles the immutable [`AnalysisResult`]. Every intermediate structure
//! is scoped to the invocation, so an analyzer shared between threads can
//! serve concurrent, independent calls.

use tracing::{debug, info};

use crate::config::{AnalysisConfig, RenderConfig};
use crate::error::{AnalysisError, ConfigError, PodoResult, RenderError};
use crate::grid::{AggregatedPressureMap, BoundingBox, FootSide, FrameSequence};
use crate::loader;
use crate::processing::arch::{self, FootType};
use crate::processing::cop::{self, CopTrajectory};
use crate::processing::noise;
use crate::processing::reconstruction::{self, Reconstruction};
use crate::processing::segmentation::{self, RegionBands, RegionStats, SideGeometry};
use crate::report::ReportRecord;

/// Everything the pipeline derived for one foot.
#[derive(Debug, Clone, PartialEq)]
pub struct FootAnalysis {
    /// Hindfoot/midfoot/forefoot share of the side's total pressure, in
    /// percent. All-zero when the side never touched the sensor.
    pub distribution: [f64; 3],
    /// Midfoot contact share, `None` without contact.
    pub arch_index: Option<f64>,
    /// Supplemental quality score in [0, 100].
    pub arch_score: f64,
    /// Classified arch type.
    pub foot_type: FootType,
    /// COP samples in frame order; zero-pressure frames omitted.
    pub trajectory: CopTrajectory,
    /// Contact bounding box in working-map coordinates, if any contact.
    pub bbox: Option<BoundingBox>,
    /// Region thirds of the bounding box, working-map coordinates.
    pub bands: Option<RegionBands>,
}

/// Immutable aggregate produced once at the end of the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Left-foot findings.
    pub left: FootAnalysis,
    /// Right-foot findings.
    pub right: FootAnalysis,
    /// Column splitting the feet; background in every mask.
    pub gap_col: usize,
    /// Rows prepended by reconstruction: original row `r` corresponds to
    /// working row `r + row_offset` in `bbox`/`bands` coordinates.
    pub row_offset: usize,
    /// Physical cell edge length when configured; COP coordinates are
    /// already scaled by it.
    pub cell_size: Option<f64>,
}

impl AnalysisResult {
    /// Findings for one side.
    pub fn side(&self, side: FootSide) -> &FootAnalysis {
        match side {
            FootSide::Left => &self.left,
            FootSide::Right => &self.right,
        }
    }
}

/// Finished analysis: the structured result plus the pressure map needed by
/// the renderer.
///
/// The structured record and the rendered image are independent outputs; a
/// rendering failure never invalidates the record.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    result: AnalysisResult,
    map: AggregatedPressureMap,
}

impl AnalysisReport {
    /// The structured analysis result.
    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    /// The noise-filtered aggregated pressure map (original grid shape,
    /// without any synthesized reconstruction rows).
    pub fn pressure_map(&self) -> &AggregatedPressureMap {
        &self.map
    }

    /// Build the stable cross-boundary record.
    pub fn record(&self) -> ReportRecord {
        ReportRecord::from_result(&self.result)
    }

    /// Render the annotated visualization as PNG bytes.
    ///
    /// Deterministic: identical result and configuration byte-reproduce the
    /// same image.
    pub fn render_png(&self, config: &RenderConfig) -> Result<Vec<u8>, RenderError> {
        crate::render::render_png(&self.result, &self.map, config)
    }
}

/// The analysis engine. Construct once with a validated configuration and
/// call [`analyze_bytes`](Self::analyze_bytes) per recording; `&self`
/// methods are safe to call from multiple threads.
#[derive(Debug, Clone)]
pub struct FootPressureAnalyzer {
    config: AnalysisConfig,
}

impl FootPressureAnalyzer {
    /// Validate the configuration and build an analyzer.
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this analyzer runs with.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Decode a raw upload and run the full pipeline.
    pub fn analyze_bytes(&self, bytes: &[u8]) -> PodoResult<AnalysisReport> {
        let sequence = loader::from_json_bytes(bytes)?;
        self.analyze(sequence)
    }

    /// Run the full pipeline over an already-validated frame sequence.
    pub fn analyze(&self, sequence: FrameSequence) -> PodoResult<AnalysisReport> {
        info!(
            frames = sequence.len(),
            rows = sequence.rows(),
            cols = sequence.cols(),
            "analysis started"
        );

        let filtered = noise::filter_sequence(&sequence, self.config.noise_threshold);
        let map = filtered.aggregate();
        debug!(total_pressure = map.total_pressure(), "frames aggregated");

        let split = segmentation::split_sides(&map, &self.config)?;
        let reconstruction = reconstruction::reconstruct(&map, &split, &self.config);

        let left_geometry = reconstruction.left.map(SideGeometry::from_bbox);
        let right_geometry = reconstruction.right.map(SideGeometry::from_bbox);
        let mask = segmentation::build_mask(
            reconstruction.map.grid(),
            split.gap_col,
            left_geometry.as_ref(),
            right_geometry.as_ref(),
        );
        let stats = RegionStats::compute(reconstruction.map.grid(), &mask);

        let (left_trajectory, right_trajectory) =
            cop::track(&filtered, &split, self.config.cell_size);

        let result = AnalysisResult {
            left: self.foot_analysis(
                FootSide::Left,
                &stats,
                left_geometry,
                left_trajectory,
                &reconstruction,
            ),
            right: self.foot_analysis(
                FootSide::Right,
                &stats,
                right_geometry,
                right_trajectory,
                &reconstruction,
            ),
            gap_col: split.gap_col,
            row_offset: reconstruction.row_offset,
            cell_size: self.config.cell_size,
        };
        info!(
            left_type = %result.left.foot_type,
            right_type = %result.right.foot_type,
            "analysis complete"
        );

        Ok(AnalysisReport { result, map })
    }

    fn foot_analysis(
        &self,
        side: FootSide,
        stats: &RegionStats,
        geometry: Option<SideGeometry>,
        trajectory: CopTrajectory,
        reconstruction: &Reconstruction,
    ) -> FootAnalysis {
        let arch_index = arch::arch_index(stats, side);
        let foot_type = arch::classify(arch_index, self.config.low_cut, self.config.high_cut);
        debug!(
            ?side,
            ?arch_index,
            %foot_type,
            synthesized = reconstruction.synthesized[match side {
                FootSide::Left => 0,
                FootSide::Right => 1,
            }],
            "side classified"
        );
        FootAnalysis {
            distribution: stats.distribution(side),
            arch_index,
            arch_score: arch::arch_score(arch_index, self.config.low_cut, self.config.high_cut),
            foot_type,
            trajectory,
            bbox: geometry.map(|g| g.bbox),
            bands: geometry.map(|g| g.bands),
        }
    }
}

/// Convenience entry point: default configuration, one call.
pub fn analyze_bytes(bytes: &[u8]) -> PodoResult<AnalysisReport> {
    let analyzer = FootPressureAnalyzer::new(AnalysisConfig::default())
        .map_err(AnalysisError::from)?;
    analyzer.analyze_bytes(bytes)
}
