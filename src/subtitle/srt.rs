//! SRT serialization and parsing.
//!
//! The write side produces the standard subtitle exchange format byte-for-byte
//! so downstream renderers accept it unmodified. The read side exists for
//! round-trip validation of produced files.

use crate::error::{CaptionError, Result};
use crate::subtitle::cue::SubtitleCue;

/// Format a time offset in seconds as `HH:MM:SS,mmm`.
///
/// Seconds are rounded to the nearest millisecond; the comma separator is
/// part of the exchange format.
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let s = total_secs % 60;
    let m = (total_secs / 60) % 60;
    let h = total_secs / 3600;
    format!("{h:02}:{m:02}:{s:02},{ms:03}")
}

/// Parse a `HH:MM:SS,mmm` timestamp back into seconds.
pub fn parse_timestamp(value: &str) -> Result<f64> {
    let malformed = || CaptionError::Serialization {
        message: format!("invalid timestamp: {value:?}"),
    };

    let (hms, ms) = value.split_once(',').ok_or_else(malformed)?;
    let mut fields = hms.split(':');
    let h: u64 = fields
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(malformed)?;
    let m: u64 = fields
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(malformed)?;
    let s: u64 = fields
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(malformed)?;
    if fields.next().is_some() {
        return Err(malformed());
    }
    let ms: u64 = ms.parse().map_err(|_| malformed())?;

    Ok((h * 3600 + m * 60 + s) as f64 + ms as f64 / 1000.0)
}

/// Serialize cues into SRT text.
///
/// Each entry is the index line, the timing line, the trimmed text, and a
/// blank separator line, joined in index order.
pub fn to_srt(cues: &[SubtitleCue]) -> String {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            cue.index,
            format_timestamp(cue.start),
            format_timestamp(cue.end),
            cue.text.trim()
        ));
    }
    out
}

/// Parse SRT text into cues.
pub fn parse(text: &str) -> Result<Vec<SubtitleCue>> {
    let mut cues = Vec::new();

    for block in text.split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        let mut lines = block.lines();
        let index_line = lines.next().ok_or_else(|| CaptionError::Serialization {
            message: "subtitle entry missing index line".to_string(),
        })?;
        let index: u32 = index_line
            .trim()
            .parse()
            .map_err(|_| CaptionError::Serialization {
                message: format!("invalid subtitle index: {index_line:?}"),
            })?;

        let timing = lines.next().ok_or_else(|| CaptionError::Serialization {
            message: format!("subtitle entry {index} missing timing line"),
        })?;
        let (start, end) = timing
            .split_once("-->")
            .ok_or_else(|| CaptionError::Serialization {
                message: format!("invalid timing line: {timing:?}"),
            })?;

        cues.push(SubtitleCue {
            index,
            start: parse_timestamp(start.trim())?,
            end: parse_timestamp(end.trim())?,
            text: lines.collect::<Vec<_>>().join("\n"),
        });
    }

    Ok(cues)
}
