//! Spritesheet descriptor loader.
//!
//! A descriptor lists the animation clips of one character. Two encodings are
//! accepted; both go through the same validation and produce an
//! [`AnimationTable`].
//!
//! # Text format
//!
//! One clip per line, comma separated. Blank lines, `#` comments and trailing
//! whitespace are ignored.
//!
//! ```text
//! # name, x, y, width, height, frames, fps, loop [, key=value ...]
//! walk, 0, 0, 66, 92, 6, 5, loop
//! idle, 0, 0, 66, 92, 1, 0, loop, sheet=player_idle
//! ```
//!
//! The loop flag accepts `loop`/`true`/`yes`/`1` and `once`/`false`/`no`/`0`.
//! Optional trailing fields are `key=value` pairs: `sheet` (texture key, the
//! caller's default otherwise), `stride_x` (defaults to the frame width) and
//! `stride_y` (defaults to 0). Unknown keys are skipped so newer asset files
//! keep loading.
//!
//! # JSON format
//!
//! Selected by a `.json` extension:
//!
//! ```json
//! { "clips": [ { "name": "walk", "x": 0, "y": 0, "width": 66, "height": 92,
//!                "frames": 6, "fps": 5.0, "looped": true } ] }
//! ```
//!
//! `sheet`, `stride_x` and `stride_y` are optional; unknown fields are ignored.
//!
//! # Duplicates
//!
//! When a clip name appears twice the later record replaces the earlier one
//! and a warning is logged.

use std::path::Path;

use log::{debug, warn};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::LoadError;
use crate::resources::animationstore::{AnimationClip, AnimationTable, FrameRect};

/// Pixel size of each sheet a descriptor may reference, keyed by texture key.
pub type SheetSizes = FxHashMap<String, (i32, i32)>;

const REQUIRED_FIELDS: usize = 8;

/// One clip exactly as written in the descriptor, before validation.
#[derive(Debug, Clone, Deserialize)]
struct ClipRecord {
    name: String,
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    frames: i64,
    fps: f32,
    looped: bool,
    #[serde(default)]
    sheet: Option<String>,
    #[serde(default)]
    stride_x: Option<i32>,
    #[serde(default)]
    stride_y: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct DescriptorFile {
    clips: Vec<ClipRecord>,
}

/// Read a descriptor from disk. Files ending in `.json` use the JSON format,
/// everything else the line format.
pub fn load_descriptor(
    path: impl AsRef<Path>,
    default_sheet: &str,
    sheets: &SheetSizes,
) -> Result<AnimationTable, LoadError> {
    let path = path.as_ref();
    let src = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let table = if is_json {
        parse_json_descriptor(&src, default_sheet, sheets)?
    } else {
        parse_descriptor(&src, default_sheet, sheets)?
    };
    debug!(
        "Loaded {} animation clips from {}",
        table.len(),
        path.display()
    );
    Ok(table)
}

/// Parse the line format.
pub fn parse_descriptor(
    src: &str,
    default_sheet: &str,
    sheets: &SheetSizes,
) -> Result<AnimationTable, LoadError> {
    let mut records = Vec::new();
    for (index, raw) in src.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        records.push((index + 1, parse_record(index + 1, line)?));
    }
    build_table(records, default_sheet, sheets)
}

/// Parse the JSON format. Record numbers stand in for line numbers in errors.
pub fn parse_json_descriptor(
    src: &str,
    default_sheet: &str,
    sheets: &SheetSizes,
) -> Result<AnimationTable, LoadError> {
    let file: DescriptorFile = serde_json::from_str(src)?;
    let records = file
        .clips
        .into_iter()
        .enumerate()
        .map(|(i, r)| (i + 1, r))
        .collect();
    build_table(records, default_sheet, sheets)
}

fn parse_record(line: usize, text: &str) -> Result<ClipRecord, LoadError> {
    let fields: Vec<&str> = text.split(',').map(str::trim).collect();
    if fields.len() < REQUIRED_FIELDS {
        return Err(LoadError::Malformed {
            line,
            reason: format!(
                "expected at least {} fields, found {}",
                REQUIRED_FIELDS,
                fields.len()
            ),
        });
    }

    let mut record = ClipRecord {
        name: fields[0].to_string(),
        x: parse_number(line, "x", fields[1])?,
        y: parse_number(line, "y", fields[2])?,
        width: parse_number(line, "width", fields[3])?,
        height: parse_number(line, "height", fields[4])?,
        frames: parse_number(line, "frames", fields[5])?,
        fps: parse_number(line, "fps", fields[6])?,
        looped: parse_loop_flag(line, fields[7])?,
        sheet: None,
        stride_x: None,
        stride_y: None,
    };

    for extra in &fields[REQUIRED_FIELDS..] {
        if extra.is_empty() {
            continue;
        }
        let Some((key, value)) = extra.split_once('=') else {
            return Err(LoadError::Malformed {
                line,
                reason: format!("optional field '{}' is not key=value", extra),
            });
        };
        let (key, value) = (key.trim(), value.trim());
        match key {
            "sheet" => record.sheet = Some(value.to_string()),
            "stride_x" => record.stride_x = Some(parse_number(line, key, value)?),
            "stride_y" => record.stride_y = Some(parse_number(line, key, value)?),
            other => debug!("line {}: ignoring unknown field '{}'", line, other),
        }
    }

    Ok(record)
}

fn parse_number<T: std::str::FromStr>(line: usize, field: &str, value: &str) -> Result<T, LoadError> {
    value.parse().map_err(|_| LoadError::Malformed {
        line,
        reason: format!("field '{}' has invalid value '{}'", field, value),
    })
}

fn parse_loop_flag(line: usize, value: &str) -> Result<bool, LoadError> {
    match value.to_ascii_lowercase().as_str() {
        "loop" | "true" | "yes" | "1" => Ok(true),
        "once" | "false" | "no" | "0" => Ok(false),
        _ => Err(LoadError::Malformed {
            line,
            reason: format!("loop flag '{}' is not one of loop/once/true/false", value),
        }),
    }
}

fn build_table(
    records: Vec<(usize, ClipRecord)>,
    default_sheet: &str,
    sheets: &SheetSizes,
) -> Result<AnimationTable, LoadError> {
    let mut clips = Vec::with_capacity(records.len());
    for (line, record) in records {
        clips.push((line, validate(line, record, default_sheet, sheets)?));
    }
    let mut table = AnimationTable::new();
    insert_clips(&mut table, clips);
    Ok(table)
}

/// Insert clips in order; a repeated name replaces the earlier clip with a
/// warning. Returns the replaced names.
fn insert_clips(table: &mut AnimationTable, clips: Vec<(usize, AnimationClip)>) -> Vec<String> {
    let mut replaced = Vec::new();
    for (line, clip) in clips {
        let name = clip.name.clone();
        if table.insert(clip).is_some() {
            warn!(
                "line {}: duplicate clip '{}', later definition replaces the earlier one",
                line, name
            );
            replaced.push(name);
        }
    }
    replaced
}

fn validate(
    line: usize,
    record: ClipRecord,
    default_sheet: &str,
    sheets: &SheetSizes,
) -> Result<AnimationClip, LoadError> {
    let name = record.name.trim().to_string();
    if name.is_empty() {
        return Err(LoadError::EmptyName { line });
    }
    if record.frames <= 0 {
        return Err(LoadError::InvalidFrameCount {
            line,
            name,
            count: record.frames,
        });
    }
    if !record.fps.is_finite() || record.fps < 0.0 {
        return Err(LoadError::Malformed {
            line,
            reason: format!("clip '{}' has invalid fps {}", name, record.fps),
        });
    }
    if record.width <= 0 || record.height <= 0 {
        return Err(LoadError::Malformed {
            line,
            reason: format!(
                "clip '{}' has invalid frame size {}x{}",
                name, record.width, record.height
            ),
        });
    }

    let sheet = record
        .sheet
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default_sheet.to_string());
    let Some(&(sheet_width, sheet_height)) = sheets.get(&sheet) else {
        return Err(LoadError::UnknownSheet { clip: name, sheet });
    };

    let clip = AnimationClip {
        origin: FrameRect::new(record.x, record.y, record.width, record.height),
        stride_x: record.stride_x.unwrap_or(record.width),
        stride_y: record.stride_y.unwrap_or(0),
        frame_count: record.frames as usize,
        fps: record.fps,
        looped: record.looped,
        name,
        sheet,
    };

    for frame in 0..clip.frame_count {
        let checked = clip.checked_frame_rect(frame);
        if !checked.is_some_and(|r| r.fits_within(sheet_width, sheet_height)) {
            let rect = checked.unwrap_or_else(|| clip.frame_rect(frame));
            return Err(LoadError::FrameOutOfBounds {
                clip: clip.name,
                sheet: clip.sheet,
                frame,
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                sheet_width,
                sheet_height,
            });
        }
    }

    Ok(clip)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheets() -> SheetSizes {
        let mut sizes = SheetSizes::default();
        sizes.insert("player_walk".into(), (396, 92));
        sizes.insert("player_idle".into(), (66, 92));
        sizes
    }

    #[test]
    fn test_parse_two_clips() {
        let src = "walk, 0, 0, 66, 92, 6, 5, loop\nidle, 0, 0, 66, 92, 1, 0, loop, sheet=player_idle\n";
        let table = parse_descriptor(src, "player_walk", &sheets()).unwrap();
        assert_eq!(table.len(), 2);
        let walk = table.get("walk").unwrap();
        assert_eq!(walk.frame_count, 6);
        assert_eq!(walk.fps, 5.0);
        assert!(walk.looped);
        assert_eq!(walk.sheet, "player_walk");
        assert_eq!(walk.stride_x, 66);
        let idle = table.get("idle").unwrap();
        assert_eq!(idle.frame_count, 1);
        assert_eq!(idle.sheet, "player_idle");
    }

    #[test]
    fn test_comments_blank_lines_and_trailing_whitespace() {
        let src = "# clips\n\n   walk, 0, 0, 66, 92, 6, 5, loop   \n\n\n";
        let table = parse_descriptor(src, "player_walk", &sheets()).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_zero_frame_count_rejected() {
        let src = "walk, 0, 0, 66, 92, 0, 5, loop";
        let err = parse_descriptor(src, "player_walk", &sheets()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidFrameCount { count: 0, .. }));
    }

    #[test]
    fn test_negative_frame_count_rejected() {
        let src = "walk, 0, 0, 66, 92, -2, 5, loop";
        let err = parse_descriptor(src, "player_walk", &sheets()).unwrap_err();
        assert!(matches!(err, LoadError::InvalidFrameCount { count: -2, .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        let src = " , 0, 0, 66, 92, 1, 5, loop";
        let err = parse_descriptor(src, "player_walk", &sheets()).unwrap_err();
        assert!(matches!(err, LoadError::EmptyName { line: 1 }));
    }

    #[test]
    fn test_duplicate_later_wins() {
        let src = "walk, 0, 0, 66, 92, 6, 5, loop\nwalk, 0, 0, 66, 92, 3, 10, once\n";
        let table = parse_descriptor(src, "player_walk", &sheets()).unwrap();
        assert_eq!(table.len(), 1);
        let walk = table.get("walk").unwrap();
        assert_eq!(walk.frame_count, 3);
        assert!(!walk.looped);
    }

    #[test]
    fn test_duplicate_reported() {
        let src = "walk, 0, 0, 66, 92, 6, 5, loop\nidle, 0, 0, 66, 92, 1, 0, loop\nwalk, 0, 0, 66, 92, 3, 10, once";
        let clips = src
            .lines()
            .enumerate()
            .map(|(i, line)| {
                let record = parse_record(i + 1, line).unwrap();
                (i + 1, validate(i + 1, record, "player_walk", &sheets()).unwrap())
            })
            .collect();
        let mut table = AnimationTable::new();
        assert_eq!(insert_clips(&mut table, clips), vec!["walk".to_string()]);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_too_few_fields() {
        let src = "walk, 0, 0, 66, 92, 6";
        let err = parse_descriptor(src, "player_walk", &sheets()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { line: 1, .. }));
    }

    #[test]
    fn test_bad_number_reports_line() {
        let src = "# header\nwalk, 0, zero, 66, 92, 6, 5, loop";
        let err = parse_descriptor(src, "player_walk", &sheets()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed { line: 2, .. }));
    }

    #[test]
    fn test_bad_loop_flag() {
        let src = "walk, 0, 0, 66, 92, 6, 5, sometimes";
        assert!(parse_descriptor(src, "player_walk", &sheets()).is_err());
    }

    #[test]
    fn test_negative_fps_rejected() {
        let src = "walk, 0, 0, 66, 92, 6, -1, loop";
        assert!(matches!(
            parse_descriptor(src, "player_walk", &sheets()),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_unknown_optional_field_ignored() {
        let src = "walk, 0, 0, 66, 92, 6, 5, loop, hitbox=4, sheet=player_walk";
        let table = parse_descriptor(src, "player_walk", &sheets()).unwrap();
        assert!(table.contains("walk"));
    }

    #[test]
    fn test_optional_field_without_equals_rejected() {
        let src = "walk, 0, 0, 66, 92, 6, 5, loop, extra";
        assert!(matches!(
            parse_descriptor(src, "player_walk", &sheets()),
            Err(LoadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_frame_out_of_bounds() {
        // 7 frames of 66px do not fit a 396px sheet
        let src = "walk, 0, 0, 66, 92, 7, 5, loop";
        let err = parse_descriptor(src, "player_walk", &sheets()).unwrap_err();
        match err {
            LoadError::FrameOutOfBounds { frame, .. } => assert_eq!(frame, 6),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_frame_past_i32_range_out_of_bounds() {
        let src = "walk, 2147483600, 0, 66, 92, 1, 5, loop";
        let err = parse_descriptor(src, "player_walk", &sheets()).unwrap_err();
        assert!(matches!(err, LoadError::FrameOutOfBounds { frame: 0, .. }));

        let src = "walk, 0, 0, 66, 92, 3, 5, loop, stride_x=2000000000";
        let err = parse_descriptor(src, "player_walk", &sheets()).unwrap_err();
        assert!(matches!(err, LoadError::FrameOutOfBounds { frame: 1, .. }));
    }

    #[test]
    fn test_unknown_sheet() {
        let src = "walk, 0, 0, 66, 92, 6, 5, loop, sheet=enemy";
        assert!(matches!(
            parse_descriptor(src, "player_walk", &sheets()),
            Err(LoadError::UnknownSheet { .. })
        ));
    }

    #[test]
    fn test_custom_stride() {
        let mut sizes = sheets();
        sizes.insert("grid".into(), (132, 184));
        let src = "walk, 0, 0, 66, 92, 2, 5, loop, sheet=grid, stride_x=0, stride_y=92";
        let table = parse_descriptor(src, "player_walk", &sizes).unwrap();
        let clip = table.get("walk").unwrap();
        assert_eq!(clip.frame_rect(1), FrameRect::new(0, 92, 66, 92));
    }

    #[test]
    fn test_json_descriptor() {
        let src = r#"{
            "clips": [
                { "name": "walk", "x": 0, "y": 0, "width": 66, "height": 92,
                  "frames": 6, "fps": 5.0, "looped": true, "author": "someone" },
                { "name": "idle", "x": 0, "y": 0, "width": 66, "height": 92,
                  "frames": 1, "fps": 0.0, "looped": true, "sheet": "player_idle" }
            ]
        }"#;
        let table = parse_json_descriptor(src, "player_walk", &sheets()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("idle").unwrap().sheet, "player_idle");
    }

    #[test]
    fn test_json_zero_frames_rejected() {
        let src = r#"{ "clips": [ { "name": "walk", "x": 0, "y": 0, "width": 66,
            "height": 92, "frames": 0, "fps": 5.0, "looped": true } ] }"#;
        assert!(matches!(
            parse_json_descriptor(src, "player_walk", &sheets()),
            Err(LoadError::InvalidFrameCount { .. })
        ));
    }

    #[test]
    fn test_json_syntax_error() {
        assert!(matches!(
            parse_json_descriptor("{ clips: ", "player_walk", &sheets()),
            Err(LoadError::Json(_))
        ));
    }
}
