//! End-to-end pipeline tests over synthetic recordings with known geometry.
//!
//! The synthetic footprint is built so every derived quantity (arch index,
//! region thirds, distribution) can be computed by hand: 18 contact rows
//! split into three 6-row bands whose widths are 4, 3, and 5 cells.

use std::sync::Arc;
use std::thread;

use podo_core::{AnalysisConfig, FootPressureAnalyzer, FootSide, FootType, RenderConfig};

const ROWS: usize = 24;
const COLS: usize = 16;

/// Stamp one synthetic footprint with its heel at the top.
///
/// Contact rows 3..21; hindfoot 4 cells wide, midfoot 3, forefoot 5. The
/// midfoot share of the 72 contact cells is 18/72 = 0.25, inside the Normal
/// band under the default cut points.
fn place_foot(frame: &mut [Vec<f64>], min_col: usize, value: f64) {
    for row in 3..9 {
        for col in min_col..min_col + 4 {
            frame[row][col] = value;
        }
    }
    for row in 9..15 {
        for col in min_col + 1..min_col + 4 {
            frame[row][col] = value;
        }
    }
    for row in 15..21 {
        for col in min_col..min_col + 5 {
            frame[row][col] = value;
        }
    }
}

fn two_foot_frame(value: f64) -> Vec<Vec<f64>> {
    let mut frame = vec![vec![0.0; COLS]; ROWS];
    place_foot(&mut frame, 0, value);
    place_foot(&mut frame, 11, value);
    frame
}

fn recording_bytes() -> Vec<u8> {
    let frames = vec![two_foot_frame(10.0), two_foot_frame(10.0)];
    serde_json::to_vec(&frames).unwrap()
}

#[test]
fn test_two_normal_feet_end_to_end() {
    let analyzer = FootPressureAnalyzer::new(AnalysisConfig::default()).unwrap();
    let report = analyzer.analyze_bytes(&recording_bytes()).unwrap();
    let result = report.result();

    assert_eq!(result.row_offset, 0);
    for side in FootSide::BOTH {
        let foot = result.side(side);
        assert_eq!(foot.foot_type, FootType::Normal);
        assert!((foot.arch_index.unwrap() - 0.25).abs() < 1e-12);
        // Ideal midpoint 0.235, half-width 0.025: |0.25 - 0.235| gives 70.0.
        assert_eq!(foot.arch_score, 70.0);

        let sum: f64 = foot.distribution.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);

        // 24/18/30 contact cells at uniform pressure.
        assert!((foot.distribution[0] - 24.0 / 72.0 * 100.0).abs() < 1e-9);
        assert!((foot.distribution[1] - 18.0 / 72.0 * 100.0).abs() < 1e-9);
        assert!((foot.distribution[2] - 30.0 / 72.0 * 100.0).abs() < 1e-9);

        let bbox = foot.bbox.unwrap();
        assert_eq!(foot.trajectory.len(), 2);
        for point in &foot.trajectory {
            assert!(point.row >= bbox.min_row as f64 && point.row <= bbox.max_row as f64);
            assert!(point.col >= bbox.min_col as f64 && point.col <= bbox.max_col as f64);
        }
    }
}

/// Two-lobe Gaussian footprint: a tight heel blob and a broader forefoot
/// blob around the given column center, mimicking a real pressure print
/// with a narrow midfoot waist.
fn gaussian_foot(frame: &mut [Vec<f64>], center_col: f64) {
    for (row, cells) in frame.iter_mut().enumerate() {
        for (col, cell) in cells.iter_mut().enumerate() {
            let r = row as f64;
            let c = col as f64;
            let heel = 120.0
                * (-((r - 6.0).powi(2) / (2.0 * 2.0f64.powi(2))
                    + (c - center_col).powi(2) / (2.0 * 1.3f64.powi(2))))
                .exp();
            let fore = 120.0
                * (-((r - 19.0).powi(2) / (2.0 * 2.6f64.powi(2))
                    + (c - center_col).powi(2) / (2.0 * 1.7f64.powi(2))))
                .exp();
            *cell += heel + fore;
        }
    }
}

#[test]
fn test_gaussian_blobs_classify_normal() {
    let mut frame = vec![vec![0.0; 16]; 28];
    gaussian_foot(&mut frame, 2.8);
    gaussian_foot(&mut frame, 13.2);
    let bytes = serde_json::to_vec(&vec![frame.clone(), frame]).unwrap();

    let analyzer = FootPressureAnalyzer::new(AnalysisConfig::default()).unwrap();
    let report = analyzer.analyze_bytes(&bytes).unwrap();
    let result = report.result();

    // Both sides segmented, both Normal under the default cut points: the
    // narrow waist keeps the midfoot contact share inside [0.21, 0.26].
    for side in FootSide::BOTH {
        let foot = result.side(side);
        assert_eq!(foot.foot_type, FootType::Normal, "{side:?}");
        let ai = foot.arch_index.unwrap();
        assert!((0.21..=0.26).contains(&ai), "{side:?} arch index {ai}");

        let sum: f64 = foot.distribution.iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);

        // One COP sample per frame, each inside the side's bounding box.
        let bbox = foot.bbox.unwrap();
        assert_eq!(foot.trajectory.len(), 2);
        for point in &foot.trajectory {
            assert!(point.row >= bbox.min_row as f64 && point.row <= bbox.max_row as f64);
            assert!(point.col >= bbox.min_col as f64 && point.col <= bbox.max_col as f64);
        }
    }
}

#[test]
fn test_record_matches_result() {
    let analyzer = FootPressureAnalyzer::new(AnalysisConfig::default()).unwrap();
    let report = analyzer.analyze_bytes(&recording_bytes()).unwrap();
    let json = report.record().to_json_value();

    assert_eq!(json["foot_types"]["left"]["type"], "Normal");
    assert_eq!(json["foot_types"]["right"]["type"], "Normal");
    assert_eq!(json["foot_types"]["left"]["value"], 0.25);
    assert_eq!(json["foot_types"]["left"]["score"], 70.0);

    let lh = json["distribution"]["LH"].as_f64().unwrap();
    let lm = json["distribution"]["LM"].as_f64().unwrap();
    let lf = json["distribution"]["LF"].as_f64().unwrap();
    assert!((lh + lm + lf - 100.0).abs() < 1e-9);
}

#[test]
fn test_clipped_heel_is_reconstructed() {
    // Left foot clipped at the top edge: 10 visible rows against a
    // reference length of 20 fails the 0.7 completeness check.
    let mut frame = vec![vec![0.0; COLS]; ROWS];
    for row in 0..10 {
        for col in 0..4 {
            frame[row][col] = 10.0;
        }
    }
    place_foot(&mut frame, 11, 10.0);
    let bytes = serde_json::to_vec(&vec![frame]).unwrap();

    let analyzer = FootPressureAnalyzer::new(AnalysisConfig::default()).unwrap();
    let report = analyzer.analyze_bytes(&bytes).unwrap();
    let result = report.result();

    // 10 missing rows were prepended to the working grid.
    assert_eq!(result.row_offset, 10);
    // 10 visible rows plus 9 synthesized carrying pressure (the far edge
    // decays to exactly zero).
    assert_eq!(result.left.bbox.unwrap().row_extent(), 19);

    // The complete right foot is untouched apart from the offset.
    assert_eq!(result.right.foot_type, FootType::Normal);
    let sum: f64 = result.left.distribution.iter().sum();
    assert!((sum - 100.0).abs() < 1e-9);

    // Compare against the same recording analyzed with reconstruction
    // effectively disabled: splitting only the visible rows into thirds
    // over-weights the hindfoot end, which faces the clipped edge. The
    // reconstructed distribution must shift weight away from it.
    let mut naive_config = AnalysisConfig::default();
    naive_config.completeness_threshold = 0.05;
    let naive = FootPressureAnalyzer::new(naive_config)
        .unwrap()
        .analyze_bytes(&bytes)
        .unwrap();
    assert_eq!(naive.result().row_offset, 0);
    let naive_hind = naive.result().left.distribution[0];
    let reconstructed_hind = result.left.distribution[0];
    assert!(
        reconstructed_hind < naive_hind,
        "reconstruction left the distribution heel-heavy: {reconstructed_hind} vs {naive_hind}"
    );
    // The synthesized heel end carries less weight than the fully visible
    // forefoot end.
    assert!(result.left.distribution[0] < result.left.distribution[2]);

    // The drawn map keeps the original grid shape.
    assert_eq!(report.pressure_map().rows(), ROWS);
}

#[test]
fn test_concurrent_invocations_match_sequential_runs() {
    let analyzer = Arc::new(FootPressureAnalyzer::new(AnalysisConfig::default()).unwrap());

    // Distinct recordings per thread; each must match its own sequential run.
    let inputs: Vec<Vec<u8>> = (0..4)
        .map(|i| {
            let value = 10.0 + i as f64;
            serde_json::to_vec(&vec![two_foot_frame(value), two_foot_frame(value)]).unwrap()
        })
        .collect();
    let sequential: Vec<_> = inputs
        .iter()
        .map(|bytes| analyzer.analyze_bytes(bytes).unwrap().record())
        .collect();

    let handles: Vec<_> = inputs
        .into_iter()
        .map(|bytes| {
            let analyzer = Arc::clone(&analyzer);
            thread::spawn(move || analyzer.analyze_bytes(&bytes).unwrap().record())
        })
        .collect();
    for (handle, expected) in handles.into_iter().zip(sequential) {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_render_is_byte_deterministic() {
    let analyzer = FootPressureAnalyzer::new(AnalysisConfig::default()).unwrap();
    let report = analyzer.analyze_bytes(&recording_bytes()).unwrap();
    let config = RenderConfig::default();

    let first = report.render_png(&config).unwrap();
    let second = report.render_png(&config).unwrap();
    assert_eq!(&first[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(first, second);
}

#[test]
fn test_missing_font_file_still_renders() {
    let analyzer = FootPressureAnalyzer::new(AnalysisConfig::default()).unwrap();
    let report = analyzer.analyze_bytes(&recording_bytes()).unwrap();

    let mut config = RenderConfig::default();
    config.font_path = Some("/no/such/font.ttf".into());
    let png = report.render_png(&config).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}

#[test]
fn test_default_convenience_entry_point() {
    let report = podo_core::analyze_bytes(&recording_bytes()).unwrap();
    assert_eq!(report.result().left.foot_type, FootType::Normal);
}

#[test]
fn test_tighter_cuts_reclassify_same_recording() {
    // With the Normal band moved below 0.25 the same feet become flat.
    let mut config = AnalysisConfig::default();
    config.low_cut = 0.10;
    config.high_cut = 0.20;
    let analyzer = FootPressureAnalyzer::new(config).unwrap();
    let report = analyzer.analyze_bytes(&recording_bytes()).unwrap();
    assert_eq!(report.result().left.foot_type, FootType::PesPlanus);
}

#[test]
fn test_cell_size_scales_cop_only() {
    let mut config = AnalysisConfig::default();
    config.cell_size = Some(2.0);
    let analyzer = FootPressureAnalyzer::new(config).unwrap();
    let scaled = analyzer.analyze_bytes(&recording_bytes()).unwrap();

    let unscaled = podo_core::analyze_bytes(&recording_bytes()).unwrap();
    let scaled_point = scaled.result().left.trajectory[0];
    let point = unscaled.result().left.trajectory[0];
    assert!((scaled_point.row - point.row * 2.0).abs() < 1e-9);
    assert!((scaled_point.col - point.col * 2.0).abs() < 1e-9);
    // Classification is unaffected by the physical scale.
    assert_eq!(
        scaled.result().left.arch_index,
        unscaled.result().left.arch_index
    );
}
