// src/processing/noise.rs
//! Per-cell noise filtering.
//!
//! A reading survives iff it is at least the configured threshold; anything
//! below it is zeroed. The filter carries no temporal state and is
//! idempotent: refiltering already-filtered data with the same threshold is
//! a no-op.

use ndarray::Array2;

use crate::grid::FrameSequence;

/// Zero every sub-threshold cell of a single frame.
pub fn filter_frame(frame: &Array2<f64>, threshold: f64) -> Array2<f64> {
    frame.mapv(|value| if value >= threshold { value } else { 0.0 })
}

/// Apply [`filter_frame`] to every frame of a sequence.
pub fn filter_sequence(sequence: &FrameSequence, threshold: f64) -> FrameSequence {
    sequence.map_frames(|frame| filter_frame(frame, threshold))
}
