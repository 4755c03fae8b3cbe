// src/render/mod.rs
//! Deterministic PNG visualization of an analysis result.
//!
//! The image is a heatmap of the aggregated pressure map with annotation
//! overlays (gap column, region band boundaries, COP trajectories) and a
//! footer strip carrying the per-side classification and distribution text.
//! Rendering reads only the finished result, the map, and the render
//! configuration; identical inputs byte-reproduce the same PNG.

pub mod colormap;
mod font;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;
use tracing::debug;

use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::grid::{AggregatedPressureMap, Axis, FootSide};
use crate::processing::pipeline::{AnalysisResult, FootAnalysis};

const ANNOTATION: Rgb<u8> = Rgb([255, 255, 255]);
const BAND_LINE: Rgb<u8> = Rgb([220, 220, 220]);
const FOOTER_BG: Rgb<u8> = Rgb([16, 16, 16]);
const FOOTER_PAD: u32 = 6;

/// Render the annotated visualization as encoded PNG bytes.
pub fn render_png(
    result: &AnalysisResult,
    map: &AggregatedPressureMap,
    config: &RenderConfig,
) -> Result<Vec<u8>, RenderError> {
    let cell_px = config.cell_px;
    let heat_w = map.cols() as u32 * cell_px;
    let heat_h = map.rows() as u32 * cell_px;
    let line_h = (config.font_px * 1.5).ceil() as u32;
    let footer_h = line_h * 4 + FOOTER_PAD * 2;

    let mut canvas = RgbImage::from_pixel(heat_w, heat_h + footer_h, FOOTER_BG);

    draw_heatmap(&mut canvas, map, config);
    draw_gap_line(&mut canvas, result.gap_col, cell_px, heat_h);
    for side in FootSide::BOTH {
        draw_band_lines(&mut canvas, result, map, side, cell_px);
        draw_trajectory(&mut canvas, result, side, cell_px);
    }
    draw_footer(&mut canvas, result, config, heat_h, line_h);

    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(
            canvas.as_raw(),
            canvas.width(),
            canvas.height(),
            ExtendedColorType::Rgb8,
        )
        .map_err(|err| RenderError::Encode(err.to_string()))?;
    debug!(
        width = canvas.width(),
        height = canvas.height(),
        bytes = bytes.len(),
        "visualization rendered"
    );
    Ok(bytes)
}

/// Paint each sensor cell as a `cell_px` square through the fixed colormap.
fn draw_heatmap(canvas: &mut RgbImage, map: &AggregatedPressureMap, config: &RenderConfig) {
    let cell_px = config.cell_px;
    for ((row, col), &value) in map.grid().indexed_iter() {
        let color = Rgb(config.colormap.sample(value / config.color_scale_max));
        let x0 = col as u32 * cell_px;
        let y0 = row as u32 * cell_px;
        for dy in 0..cell_px {
            for dx in 0..cell_px {
                canvas.put_pixel(x0 + dx, y0 + dy, color);
            }
        }
    }
}

/// Vertical guide through the middle of the gap column.
fn draw_gap_line(canvas: &mut RgbImage, gap_col: usize, cell_px: u32, heat_h: u32) {
    let x = gap_col as u32 * cell_px + cell_px / 2;
    if x >= canvas.width() {
        return;
    }
    for y in 0..heat_h {
        canvas.put_pixel(x, y, ANNOTATION);
    }
}

/// Dashed horizontal lines at the side's hindfoot/midfoot and midfoot/
/// forefoot boundaries, spanning only that side's column range.
///
/// Band coordinates live in the reconstruction's working grid; subtracting
/// the row offset maps them back onto the drawn map, clamped to its edge for
/// boundaries that fall inside the synthesized extension.
fn draw_band_lines(
    canvas: &mut RgbImage,
    result: &AnalysisResult,
    map: &AggregatedPressureMap,
    side: FootSide,
    cell_px: u32,
) {
    let foot = result.side(side);
    let (Some(bbox), Some(bands)) = (foot.bbox, foot.bands) else {
        return;
    };
    if bands.axis != Axis::Rows {
        return;
    }
    let x0 = bbox.min_col as u32 * cell_px;
    let x1 = ((bbox.max_col + 1) as u32 * cell_px).min(canvas.width());
    for boundary in [bands.hind_end, bands.mid_end] {
        let row = boundary.saturating_sub(result.row_offset).min(map.rows());
        let y = (row as u32 * cell_px).min(map.rows() as u32 * cell_px - 1);
        for x in x0..x1 {
            if (x / 3) % 2 == 0 {
                canvas.put_pixel(x, y, BAND_LINE);
            }
        }
    }
}

/// COP polyline with a cross marker on the final sample.
fn draw_trajectory(canvas: &mut RgbImage, result: &AnalysisResult, side: FootSide, cell_px: u32) {
    let trajectory = &result.side(side).trajectory;
    if trajectory.is_empty() {
        return;
    }
    // COP coordinates carry the configured physical scale; undo it to get
    // back to grid units before projecting to pixels.
    let scale = result.cell_size.unwrap_or(1.0);
    let project = |row: f64, col: f64| -> (f32, f32) {
        (
            ((col / scale + 0.5) * f64::from(cell_px)) as f32,
            ((row / scale + 0.5) * f64::from(cell_px)) as f32,
        )
    };

    let mut previous: Option<(f32, f32)> = None;
    for point in trajectory {
        let current = project(point.row, point.col);
        if let Some(previous) = previous {
            draw_line_segment_mut(canvas, previous, current, ANNOTATION);
        }
        previous = Some(current);
    }

    let last = trajectory[trajectory.len() - 1];
    let (cx, cy) = project(last.row, last.col);
    let arm = (cell_px / 2) as f32;
    draw_line_segment_mut(canvas, (cx - arm, cy), (cx + arm, cy), ANNOTATION);
    draw_line_segment_mut(canvas, (cx, cy - arm), (cx, cy + arm), ANNOTATION);
}

/// Classification and distribution text below the heatmap.
fn draw_footer(
    canvas: &mut RgbImage,
    result: &AnalysisResult,
    config: &RenderConfig,
    heat_h: u32,
    line_h: u32,
) {
    let font = font::load(config);
    let mut y = (heat_h + FOOTER_PAD) as i32;
    for side in FootSide::BOTH {
        let foot = result.side(side);
        for line in footer_lines(side, foot) {
            font::draw_text(canvas, ANNOTATION, FOOTER_PAD as i32, y, config.font_px, &line, &font);
            y += line_h as i32;
        }
    }
}

fn footer_lines(side: FootSide, foot: &FootAnalysis) -> [String; 2] {
    let code = side.code();
    let classification = match foot.arch_index {
        Some(ai) => format!(
            "{code}: {} AI={ai:.3} SCORE={:.1}",
            foot.foot_type.label(),
            foot.arch_score
        ),
        None => format!("{code}: {}", foot.foot_type.label()),
    };
    let [hind, mid, fore] = foot.distribution;
    let distribution = format!("{code}: H={hind:.1}% M={mid:.1}% F={fore:.1}%");
    [classification, distribution]
}
