// src/error.rs
//! Unified error handling for the analysis pipeline.
//!
//! Every fatal condition in the crate is expressed through one of the enums
//! below and surfaces to callers through [`AnalysisError`]. Degenerate but
//! valid inputs (a foot with zero pressure, a frame with no contact) are not
//! errors; they produce `Undetermined` classifications and empty trajectories
//! instead.

use thiserror::Error;

/// Malformed or inconsistent input data.
///
/// The loader reports the first violation it encounters; no partial frame
/// sequence is ever produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormatError {
    /// The byte buffer decoded to an empty frame list (or no usable rows).
    #[error("input contains no frames")]
    Empty,

    /// The byte buffer is not valid JSON of the expected shape.
    #[error("input is not a valid frame recording: {0}")]
    Json(String),

    /// A frame is not rectangular.
    #[error("frame {frame}: row {row} has {actual} columns, expected {expected}")]
    Ragged {
        /// Index of the offending frame.
        frame: usize,
        /// Row within the frame whose width differs from row 0.
        row: usize,
        /// Column count of row 0.
        expected: usize,
        /// Column count of the offending row.
        actual: usize,
    },

    /// A frame's shape differs from the first frame in the sequence.
    #[error("frame {frame}: shape {actual:?} does not match first frame shape {expected:?}")]
    ShapeMismatch {
        /// Index of the offending frame.
        frame: usize,
        /// Shape of frame 0 as (rows, columns).
        expected: (usize, usize),
        /// Shape of the offending frame.
        actual: (usize, usize),
    },

    /// A cell holds a negative or non-finite reading.
    #[error("frame {frame}: invalid pressure value {value} at ({row}, {col})")]
    InvalidValue {
        /// Index of the offending frame.
        frame: usize,
        /// Row of the offending cell.
        row: usize,
        /// Column of the offending cell.
        col: usize,
        /// The rejected reading.
        value: f64,
    },
}

/// No valid left/right split could be found on the aggregated map.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SegmentationError {
    /// The aggregated map carries no pressure at all.
    #[error("pressure map is empty; nothing to segment")]
    NoPressure,

    /// Every candidate gap column carries too much pressure, i.e. a single
    /// undivided blob spans the central band.
    #[error(
        "no valid gap column in the central band: minimum column sum {min_sum:.2} \
         exceeds the allowed maximum {limit:.2}"
    )]
    NoGap {
        /// Smallest column sum found inside the central band.
        min_sum: f64,
        /// Largest column sum a gap column may carry.
        limit: f64,
    },
}

/// Invalid analyzer configuration, rejected before any analysis runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A threshold or scale parameter is outside its valid range.
    #[error("invalid value for `{parameter}`: {value} ({requirement})")]
    OutOfRange {
        /// Name of the offending configuration field.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
        /// Human-readable constraint, e.g. "must be within (0, 1]".
        requirement: &'static str,
    },

    /// Classification cut points are not strictly ordered.
    #[error("classification cut points must satisfy low_cut < high_cut, got {low_cut} >= {high_cut}")]
    CutPointOrder {
        /// Configured lower cut point.
        low_cut: f64,
        /// Configured upper cut point.
        high_cut: f64,
    },

    /// The configuration file could not be read or parsed.
    #[error("failed to load configuration: {0}")]
    Load(String),
}

/// Visualization failures.
///
/// Font problems never reach this type; the renderer degrades to its
/// built-in font instead. Only output encoding can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RenderError {
    /// PNG encoding of the finished canvas failed.
    #[error("PNG encoding failed: {0}")]
    Encode(String),
}

/// Top-level error type for a single analysis invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Input could not be decoded into a valid frame sequence.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The recording could not be split into two feet.
    #[error(transparent)]
    Segmentation(#[from] SegmentationError),

    /// The supplied configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The visualization could not be encoded.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Result alias used across the crate.
pub type PodoResult<T> = Result<T, AnalysisError>;
