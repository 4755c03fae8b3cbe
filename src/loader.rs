// src/loader.rs
//! Frame loading and validation.
//!
//! Decodes a raw byte buffer into a validated [`FrameSequence`]. Two input
//! shapes are accepted:
//!
//! - a JSON array of frames, each frame a rectangular 2-D array of
//!   non-negative numbers (the recording format), and
//! - the legacy single-frame capture object
//!   `{"RawPressureByRows": {"Row_0": "12, 0, 3, ...", ...}}`.
//!
//! Loading is a pure parse: the first violation found is reported as a
//! [`FormatError`] and nothing is produced.

use ndarray::Array2;
use serde_json::Value;
use tracing::debug;

use crate::error::FormatError;
use crate::grid::FrameSequence;

/// Top-level key of the legacy capture format.
const ROW_MAP_KEY: &str = "RawPressureByRows";

/// Decode a byte buffer into a validated frame sequence.
pub fn from_json_bytes(bytes: &[u8]) -> Result<FrameSequence, FormatError> {
    if bytes.is_empty() {
        return Err(FormatError::Empty);
    }
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| FormatError::Json(err.to_string()))?;
    match value {
        Value::Array(frames) => from_frame_list(frames),
        Value::Object(map) if map.contains_key(ROW_MAP_KEY) => {
            let rows = map
                .get(ROW_MAP_KEY)
                .and_then(Value::as_object)
                .ok_or_else(|| {
                    FormatError::Json(format!("`{ROW_MAP_KEY}` must be an object of rows"))
                })?;
            from_row_map(rows)
        }
        other => Err(FormatError::Json(format!(
            "expected an array of frames or a `{ROW_MAP_KEY}` object, got {}",
            json_type_name(&other)
        ))),
    }
}

/// Parse the recording format: an ordered list of 2-D numeric arrays.
fn from_frame_list(frames: Vec<Value>) -> Result<FrameSequence, FormatError> {
    if frames.is_empty() {
        return Err(FormatError::Empty);
    }
    let mut parsed = Vec::with_capacity(frames.len());
    for (frame_index, frame) in frames.iter().enumerate() {
        parsed.push(parse_frame(frame_index, frame)?);
    }
    let sequence = FrameSequence::new(parsed)?;
    debug!(
        frames = sequence.len(),
        rows = sequence.rows(),
        cols = sequence.cols(),
        "frame sequence loaded"
    );
    Ok(sequence)
}

fn parse_frame(frame_index: usize, frame: &Value) -> Result<Array2<f64>, FormatError> {
    let rows = frame.as_array().ok_or_else(|| {
        FormatError::Json(format!("frame {frame_index}: expected a 2-D array"))
    })?;
    if rows.is_empty() {
        return Err(FormatError::Empty);
    }
    let mut flat = Vec::new();
    let mut expected_cols = None;
    for (row_index, row) in rows.iter().enumerate() {
        let cells = row.as_array().ok_or_else(|| {
            FormatError::Json(format!(
                "frame {frame_index}: row {row_index} is not an array"
            ))
        })?;
        let expected = *expected_cols.get_or_insert(cells.len());
        if cells.len() != expected {
            return Err(FormatError::Ragged {
                frame: frame_index,
                row: row_index,
                expected,
                actual: cells.len(),
            });
        }
        for (col_index, cell) in cells.iter().enumerate() {
            let value = cell.as_f64().ok_or_else(|| {
                FormatError::Json(format!(
                    "frame {frame_index}: non-numeric value at ({row_index}, {col_index})"
                ))
            })?;
            flat.push(value);
        }
    }
    let cols = expected_cols.unwrap_or(0);
    if cols == 0 {
        return Err(FormatError::Empty);
    }
    Array2::from_shape_vec((rows.len(), cols), flat)
        .map_err(|err| FormatError::Json(format!("frame {frame_index}: {err}")))
}

/// Parse the legacy `RawPressureByRows` capture: one frame whose rows are
/// comma-separated strings keyed "Row_0", "Row_1", ...
fn from_row_map(
    rows: &serde_json::Map<String, Value>,
) -> Result<FrameSequence, FormatError> {
    if rows.is_empty() {
        return Err(FormatError::Empty);
    }
    let mut keyed: Vec<(usize, &str)> = Vec::with_capacity(rows.len());
    for (key, value) in rows {
        let index = key
            .rsplit('_')
            .next()
            .and_then(|suffix| suffix.parse::<usize>().ok())
            .ok_or_else(|| {
                FormatError::Json(format!("row key `{key}` has no numeric suffix"))
            })?;
        let text = value.as_str().ok_or_else(|| {
            FormatError::Json(format!("row `{key}` must be a comma-separated string"))
        })?;
        keyed.push((index, text));
    }
    keyed.sort_by_key(|(index, _)| *index);

    let mut flat = Vec::new();
    let mut expected_cols = None;
    for (row_index, (_, text)) in keyed.iter().enumerate() {
        let mut cols = 0usize;
        for (col_index, cell) in text.split(',').enumerate() {
            let value: f64 = cell.trim().parse().map_err(|_| {
                FormatError::Json(format!(
                    "row {row_index}: unparsable cell `{}` at column {col_index}",
                    cell.trim()
                ))
            })?;
            flat.push(value);
            cols += 1;
        }
        let expected = *expected_cols.get_or_insert(cols);
        if cols != expected {
            return Err(FormatError::Ragged {
                frame: 0,
                row: row_index,
                expected,
                actual: cols,
            });
        }
    }
    let cols = expected_cols.unwrap_or(0);
    let grid = Array2::from_shape_vec((keyed.len(), cols), flat)
        .map_err(|err| FormatError::Json(err.to_string()))?;
    debug!(rows = keyed.len(), cols, "legacy row-map capture loaded");
    FrameSequence::new(vec![grid])
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loads_frame_list() {
        let bytes = br#"[[[0, 1], [2, 3]], [[4, 0], [0, 6]]]"#;
        let sequence = from_json_bytes(bytes).unwrap();
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.rows(), 2);
        assert_eq!(sequence.cols(), 2);
        assert_eq!(sequence.frames()[1][[1, 1]], 6.0);
    }

    #[test]
    fn test_empty_buffer_rejected() {
        assert_eq!(from_json_bytes(b""), Err(FormatError::Empty));
    }

    #[test]
    fn test_empty_list_rejected() {
        assert_eq!(from_json_bytes(b"[]"), Err(FormatError::Empty));
    }

    #[test]
    fn test_ragged_frame_rejected() {
        let bytes = br#"[[[1, 2], [3]]]"#;
        assert_eq!(
            from_json_bytes(bytes),
            Err(FormatError::Ragged {
                frame: 0,
                row: 1,
                expected: 2,
                actual: 1,
            })
        );
    }

    #[test]
    fn test_shape_mismatch_names_frame() {
        let bytes = br#"[[[1, 2]], [[1, 2, 3]]]"#;
        assert_eq!(
            from_json_bytes(bytes),
            Err(FormatError::ShapeMismatch {
                frame: 1,
                expected: (1, 2),
                actual: (1, 3),
            })
        );
    }

    #[test]
    fn test_negative_value_rejected() {
        let bytes = br#"[[[1, -2]]]"#;
        assert!(matches!(
            from_json_bytes(bytes),
            Err(FormatError::InvalidValue { frame: 0, row: 0, col: 1, .. })
        ));
    }

    #[test]
    fn test_non_numeric_cell_rejected() {
        let bytes = br#"[[[1, "x"]]]"#;
        assert!(matches!(from_json_bytes(bytes), Err(FormatError::Json(_))));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        assert!(matches!(
            from_json_bytes(b"not json at all"),
            Err(FormatError::Json(_))
        ));
    }

    #[test]
    fn test_legacy_row_map_loads_sorted() {
        // Row_10 must sort after Row_2 numerically, not lexically.
        let bytes = br#"{"RawPressureByRows": {
            "Row_10": "0, 0, 7",
            "Row_0": "1, 2, 3",
            "Row_2": "4, 5, 6"
        }}"#;
        let sequence = from_json_bytes(bytes).unwrap();
        assert_eq!(sequence.len(), 1);
        let frame = &sequence.frames()[0];
        assert_eq!(frame.nrows(), 3);
        assert_eq!(frame[[0, 0]], 1.0);
        assert_eq!(frame[[1, 0]], 4.0);
        assert_eq!(frame[[2, 2]], 7.0);
    }

    #[test]
    fn test_legacy_row_map_ragged_rejected() {
        let bytes = br#"{"RawPressureByRows": {"Row_0": "1, 2", "Row_1": "3"}}"#;
        assert!(matches!(
            from_json_bytes(bytes),
            Err(FormatError::Ragged { frame: 0, row: 1, .. })
        ));
    }
}
