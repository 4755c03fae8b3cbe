// src/report.rs
//! Result aggregation: the stable cross-boundary record.
//!
//! The nested shape and key names below are a fixed contract with the
//! consuming front-end's table-rendering logic; internal pipeline
//! structures never leak across this boundary.

use serde::{Deserialize, Serialize};

use crate::grid::FootSide;
use crate::processing::pipeline::{AnalysisResult, FootAnalysis};

/// Per-side classification entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootTypeEntry {
    /// Human-readable arch-type label.
    #[serde(rename = "type")]
    pub foot_type: String,
    /// Arch index; 0.0 when undetermined.
    pub value: f64,
    /// Supplemental arch quality score in [0, 100].
    pub score: f64,
}

/// Classification entries for both feet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootTypes {
    /// Left-foot classification.
    pub left: FootTypeEntry,
    /// Right-foot classification.
    pub right: FootTypeEntry,
}

/// The six region percentages keyed by side+region code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Left hindfoot percentage.
    #[serde(rename = "LH")]
    pub lh: f64,
    /// Left midfoot percentage.
    #[serde(rename = "LM")]
    pub lm: f64,
    /// Left forefoot percentage.
    #[serde(rename = "LF")]
    pub lf: f64,
    /// Right hindfoot percentage.
    #[serde(rename = "RH")]
    pub rh: f64,
    /// Right midfoot percentage.
    #[serde(rename = "RM")]
    pub rm: f64,
    /// Right forefoot percentage.
    #[serde(rename = "RF")]
    pub rf: f64,
}

/// The complete structured record handed to the serialization boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Per-side classification.
    pub foot_types: FootTypes,
    /// Regional pressure distribution.
    pub distribution: Distribution,
}

impl ReportRecord {
    /// Package an analysis result into the stable record shape.
    pub fn from_result(result: &AnalysisResult) -> Self {
        let [lh, lm, lf] = result.side(FootSide::Left).distribution;
        let [rh, rm, rf] = result.side(FootSide::Right).distribution;
        Self {
            foot_types: FootTypes {
                left: entry(result.side(FootSide::Left)),
                right: entry(result.side(FootSide::Right)),
            },
            distribution: Distribution {
                lh,
                lm,
                lf,
                rh,
                rm,
                rf,
            },
        }
    }

    /// Serialize to a JSON value for callers that splice the record into a
    /// larger response.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::to_value(self).expect("record serialization is infallible")
    }
}

fn entry(foot: &FootAnalysis) -> FootTypeEntry {
    FootTypeEntry {
        foot_type: foot.foot_type.label().to_string(),
        value: foot.arch_index.unwrap_or(0.0),
        score: foot.arch_score,
    }
}
