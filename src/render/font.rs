// src/render/font.rs
//! Annotation text drawing.
//!
//! A TrueType font can be supplied through the render configuration; when
//! none is given, or the file cannot be read or parsed, drawing degrades to
//! an embedded 5x7 pixel font instead of failing the render. The builtin
//! glyph set covers the characters the report actually emits (classification
//! labels, digits, and region codes) and maps lowercase letters onto their
//! uppercase forms.

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use tracing::warn;

use crate::config::RenderConfig;

/// Font resolved once per render call.
pub enum ReportFont {
    /// A TrueType font loaded from the configured path.
    Ttf(FontVec),
    /// The embedded 5x7 bitmap font.
    Builtin,
}

/// Resolve the configured font, degrading to the builtin on any failure.
pub fn load(config: &RenderConfig) -> ReportFont {
    let Some(path) = &config.font_path else {
        return ReportFont::Builtin;
    };
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(path = %path.display(), %err, "font unreadable, using builtin font");
            return ReportFont::Builtin;
        }
    };
    match FontVec::try_from_vec(bytes) {
        Ok(font) => ReportFont::Ttf(font),
        Err(err) => {
            warn!(path = %path.display(), %err, "font unparsable, using builtin font");
            ReportFont::Builtin
        }
    }
}

/// Draw one line of text with its top-left corner at (x, y).
pub fn draw_text(
    canvas: &mut RgbImage,
    color: Rgb<u8>,
    x: i32,
    y: i32,
    px: f32,
    text: &str,
    font: &ReportFont,
) {
    match font {
        ReportFont::Ttf(font) => {
            draw_text_mut(canvas, color, x, y, PxScale::from(px), font, text);
        }
        ReportFont::Builtin => draw_builtin(canvas, color, x, y, px, text),
    }
}

fn draw_builtin(canvas: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, px: f32, text: &str) {
    let scale = ((px / 8.0).round() as i32).max(1);
    let advance = 6 * scale;
    let mut cursor_x = x;
    for ch in text.chars() {
        if let Some(rows) = glyph(ch.to_ascii_uppercase()) {
            for (row_index, row_bits) in rows.iter().enumerate() {
                for col_index in 0..5 {
                    if row_bits & (0b10000 >> col_index) == 0 {
                        continue;
                    }
                    for dy in 0..scale {
                        for dx in 0..scale {
                            let px_x = cursor_x + col_index as i32 * scale + dx;
                            let px_y = y + row_index as i32 * scale + dy;
                            if px_x >= 0
                                && px_y >= 0
                                && (px_x as u32) < canvas.width()
                                && (px_y as u32) < canvas.height()
                            {
                                canvas.put_pixel(px_x as u32, px_y as u32, color);
                            }
                        }
                    }
                }
            }
        }
        cursor_x += advance;
    }
}

/// 5x7 glyph rows, most significant of the low five bits leftmost.
/// Unknown characters render as blank space.
fn glyph(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        ' ' => [0, 0, 0, 0, 0, 0, 0],
        '%' => [
            0b11001, 0b11010, 0b00010, 0b00100, 0b01000, 0b01011, 0b10011,
        ],
        '(' => [
            0b00010, 0b00100, 0b01000, 0b01000, 0b01000, 0b00100, 0b00010,
        ],
        ')' => [
            0b01000, 0b00100, 0b00010, 0b00010, 0b00010, 0b00100, 0b01000,
        ],
        '-' => [0, 0, 0, 0b01110, 0, 0, 0],
        '.' => [0, 0, 0, 0, 0, 0b00110, 0b00110],
        ':' => [0, 0b00110, 0b00110, 0, 0b00110, 0b00110, 0],
        '=' => [0, 0b01110, 0, 0b01110, 0, 0, 0],
        '0' => [
            0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110,
        ],
        '1' => [
            0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
        ],
        '2' => [
            0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111,
        ],
        '3' => [
            0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110,
        ],
        '4' => [
            0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010,
        ],
        '5' => [
            0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110,
        ],
        '6' => [
            0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110,
        ],
        '7' => [
            0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000,
        ],
        '8' => [
            0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110,
        ],
        '9' => [
            0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100,
        ],
        'A' => [
            0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001,
        ],
        'C' => [
            0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110,
        ],
        'D' => [
            0b11110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b11110,
        ],
        'E' => [
            0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b11111,
        ],
        'F' => [
            0b11111, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000, 0b10000,
        ],
        'G' => [
            0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111,
        ],
        'H' => [
            0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001, 0b10001,
        ],
        'I' => [
            0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
        ],
        'L' => [
            0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111,
        ],
        'M' => [
            0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001,
        ],
        'N' => [
            0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001,
        ],
        'O' => [
            0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110,
        ],
        'P' => [
            0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000,
        ],
        'R' => [
            0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001,
        ],
        'S' => [
            0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110,
        ],
        'T' => [
            0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100,
        ],
        'U' => [
            0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110,
        ],
        'V' => [
            0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100,
        ],
        _ => return None,
    };
    Some(rows)
}
