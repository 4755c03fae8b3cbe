// src/render/colormap.rs
//! Fixed colormaps for the pressure heatmap.
//!
//! Each map is a piecewise-linear ramp over hard-coded anchor colors, so a
//! given normalized value always produces the same pixel regardless of the
//! data being rendered.

use serde::{Deserialize, Serialize};

/// Selectable heatmap colormap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colormap {
    /// Perceptually uniform purple-to-yellow ramp; the report default.
    #[default]
    Plasma,
    /// Classic blue-to-red rainbow ramp.
    Jet,
    /// Plain black-to-white ramp.
    Grayscale,
}

type Anchor = (f64, [u8; 3]);

const PLASMA: &[Anchor] = &[
    (0.00, [13, 8, 135]),
    (0.25, [126, 3, 168]),
    (0.50, [204, 71, 120]),
    (0.75, [248, 149, 64]),
    (1.00, [240, 249, 33]),
];

const JET: &[Anchor] = &[
    (0.000, [0, 0, 128]),
    (0.125, [0, 0, 255]),
    (0.375, [0, 255, 255]),
    (0.625, [255, 255, 0]),
    (0.875, [255, 0, 0]),
    (1.000, [128, 0, 0]),
];

const GRAYSCALE: &[Anchor] = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];

impl Colormap {
    /// Color for a normalized value; `t` is clamped into [0, 1].
    pub fn sample(self, t: f64) -> [u8; 3] {
        let anchors = match self {
            Colormap::Plasma => PLASMA,
            Colormap::Jet => JET,
            Colormap::Grayscale => GRAYSCALE,
        };
        let t = t.clamp(0.0, 1.0);
        let mut previous = anchors[0];
        for &anchor in &anchors[1..] {
            if t <= anchor.0 {
                let span = anchor.0 - previous.0;
                let fraction = if span > 0.0 { (t - previous.0) / span } else { 0.0 };
                return lerp(previous.1, anchor.1, fraction);
            }
            previous = anchor;
        }
        anchors[anchors.len() - 1].1
    }
}

fn lerp(a: [u8; 3], b: [u8; 3], t: f64) -> [u8; 3] {
    let mut out = [0u8; 3];
    for channel in 0..3 {
        let value = f64::from(a[channel]) + (f64::from(b[channel]) - f64::from(a[channel])) * t;
        out[channel] = value.round() as u8;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_hit_anchor_colors() {
        assert_eq!(Colormap::Plasma.sample(0.0), [13, 8, 135]);
        assert_eq!(Colormap::Plasma.sample(1.0), [240, 249, 33]);
        assert_eq!(Colormap::Grayscale.sample(0.0), [0, 0, 0]);
        assert_eq!(Colormap::Grayscale.sample(1.0), [255, 255, 255]);
    }

    #[test]
    fn test_out_of_range_values_clamp() {
        assert_eq!(
            Colormap::Jet.sample(-3.0),
            Colormap::Jet.sample(0.0)
        );
        assert_eq!(Colormap::Jet.sample(9.0), Colormap::Jet.sample(1.0));
    }

    #[test]
    fn test_midpoint_interpolates() {
        // Halfway between black and white.
        assert_eq!(Colormap::Grayscale.sample(0.5), [128, 128, 128]);
    }

    #[test]
    fn test_serde_names_are_lowercase() {
        let map: Colormap = serde_json::from_str("\"jet\"").unwrap();
        assert_eq!(map, Colormap::Jet);
        assert_eq!(serde_json::to_string(&Colormap::Plasma).unwrap(), "\"plasma\"");
    }
}
