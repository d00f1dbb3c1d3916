//! Cue segmentation: turning transcription segments into displayable cues.

use serde::{Deserialize, Serialize};

/// A unit of timed text as returned by the transcription service.
///
/// Coarser than a cue; one segment may span several sentences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Transcribed text.
    pub text: String,
}

/// A single displayable subtitle entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SubtitleCue {
    /// 1-based position in the emitted sequence.
    pub index: u32,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
    /// Display text, trimmed.
    pub text: String,
}

/// Punctuation that ends a clause; a split point follows each occurrence.
const CLAUSE_BOUNDARIES: [char; 4] = ['.', ',', '!', '?'];

/// Split text into clause-bounded parts.
///
/// A part ends immediately after sentence- or clause-ending punctuation.
/// Parts are trimmed; empty parts are discarded, so text with no
/// punctuation yields exactly one part and blank text yields none.
pub fn split_clauses(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if CLAUSE_BOUNDARIES.contains(&ch) {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
            current.clear();
        }
    }

    let trimmed = current.trim();
    if !trimmed.is_empty() {
        parts.push(trimmed.to_string());
    }

    parts
}

/// Convert transcription segments into subtitle cues.
///
/// Each segment is split at clause boundaries and its `[start, end]` span
/// divided into equal sub-intervals, one per part; the transcription
/// service reports no sub-segment timing, so the division is a uniform
/// approximation. The final sub-interval ends exactly at the segment's
/// `end`, and adjacent sub-intervals share their boundary value, so the
/// intervals telescope back to the original span without drift.
///
/// Cue indices are 1-based and strictly increasing across the whole output;
/// segments that yield no parts (blank text, non-positive or non-finite
/// duration) are skipped without leaving a gap in the numbering.
pub fn segment_cues(segments: &[TranscriptSegment]) -> Vec<SubtitleCue> {
    let mut cues = Vec::new();
    let mut index: u32 = 1;

    for segment in segments {
        if !segment.start.is_finite() || !segment.end.is_finite() || segment.end <= segment.start {
            continue;
        }

        let parts = split_clauses(&segment.text);
        if parts.is_empty() {
            continue;
        }

        let count = parts.len();
        let span = segment.end - segment.start;
        let n = count as f64;

        for (i, text) in parts.into_iter().enumerate() {
            let start = segment.start + (i as f64) * span / n;
            let end = if i + 1 == count {
                segment.end
            } else {
                segment.start + ((i + 1) as f64) * span / n
            };
            cues.push(SubtitleCue {
                index,
                start,
                end,
                text,
            });
            index += 1;
        }
    }

    cues
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(start: f64, end: f64, text: &str) -> TranscriptSegment {
        TranscriptSegment {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_split_clauses_two_sentences() {
        let parts = split_clauses("Hello world. How are you?");
        assert_eq!(parts, vec!["Hello world.", "How are you?"]);
    }

    #[test]
    fn test_split_clauses_commas_and_exclamations() {
        let parts = split_clauses("First, second! Third");
        assert_eq!(parts, vec!["First,", "second!", "Third"]);
    }

    #[test]
    fn test_split_clauses_no_punctuation_is_single_part() {
        let parts = split_clauses("  just some words  ");
        assert_eq!(parts, vec!["just some words"]);
    }

    #[test]
    fn test_split_clauses_blank_text_yields_nothing() {
        assert!(split_clauses("").is_empty());
        assert!(split_clauses("   \t ").is_empty());
    }

    #[test]
    fn test_split_clauses_consecutive_punctuation() {
        // "?!" splits after each boundary char; the lone "!" part survives
        let parts = split_clauses("Really?! Yes.");
        assert_eq!(parts, vec!["Really?", "!", "Yes."]);
    }

    #[test]
    fn test_segment_cues_example_from_service_output() {
        let cues = segment_cues(&[segment(0.0, 4.0, "Hello world. How are you?")]);

        assert_eq!(cues.len(), 2);
        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].start, 0.0);
        assert_eq!(cues[0].end, 2.0);
        assert_eq!(cues[0].text, "Hello world.");
        assert_eq!(cues[1].index, 2);
        assert_eq!(cues[1].start, 2.0);
        assert_eq!(cues[1].end, 4.0);
        assert_eq!(cues[1].text, "How are you?");
    }

    #[test]
    fn test_segment_cues_no_punctuation_spans_full_interval() {
        let cues = segment_cues(&[segment(1.5, 3.25, "  no boundaries here  ")]);

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].start, 1.5);
        assert_eq!(cues[0].end, 3.25);
        assert_eq!(cues[0].text, "no boundaries here");
    }

    #[test]
    fn test_segment_cues_sub_intervals_are_contiguous() {
        let cues = segment_cues(&[segment(0.7, 1.0, "a, b, c")]);
        assert_eq!(cues.len(), 3);
        for pair in cues.windows(2) {
            // shared boundary, bit-for-bit
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(cues[0].start, 0.7);
        assert_eq!(cues[2].end, 1.0);
    }

    #[test]
    fn test_segment_cues_durations_sum_to_segment_span() {
        // An awkward span that does not divide evenly in binary
        let cues = segment_cues(&[segment(0.0, 0.1, "x, y, z")]);
        let total: f64 = cues.iter().map(|c| c.end - c.start).sum();
        assert!(
            (total - 0.1).abs() < 1e-12,
            "sub-interval durations should sum to the span, got {}",
            total
        );
    }

    #[test]
    fn test_segment_cues_each_cue_starts_before_it_ends() {
        let cues = segment_cues(&[
            segment(0.0, 0.5, "one, two, three, four"),
            segment(0.5, 0.6, "five. six."),
        ]);
        for cue in &cues {
            assert!(cue.start < cue.end, "cue {} has start >= end", cue.index);
        }
    }

    #[test]
    fn test_segment_cues_indices_increase_without_gaps() {
        let cues = segment_cues(&[
            segment(0.0, 2.0, "One. Two."),
            segment(2.0, 3.0, "   "),
            segment(3.0, 5.0, "Three, four"),
        ]);

        let indices: Vec<u32> = cues.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_segment_cues_blank_segment_yields_nothing() {
        let cues = segment_cues(&[segment(0.0, 1.0, " \t ")]);
        assert!(cues.is_empty());
    }

    #[test]
    fn test_segment_cues_skips_degenerate_timing() {
        let cues = segment_cues(&[
            segment(2.0, 2.0, "zero duration"),
            segment(3.0, 1.0, "reversed"),
            segment(f64::NAN, 1.0, "nan start"),
            segment(0.0, 1.0, "kept"),
        ]);

        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].index, 1);
        assert_eq!(cues[0].text, "kept");
    }

    #[test]
    fn test_segment_cues_numbering_continues_across_segments() {
        let cues = segment_cues(&[
            segment(0.0, 3.0, "A. B. C."),
            segment(3.0, 4.0, "D"),
        ]);
        assert_eq!(cues.len(), 4);
        assert_eq!(cues[3].index, 4);
        assert_eq!(cues[3].text, "D");
        assert_eq!(cues[3].start, 3.0);
        assert_eq!(cues[3].end, 4.0);
    }

    #[test]
    fn test_transcript_segment_deserializes_from_service_json() {
        let segment: TranscriptSegment =
            serde_json::from_str(r#"{"start": 0.0, "end": 3.2, "text": " Hi there."}"#).unwrap();
        assert_eq!(segment.start, 0.0);
        assert_eq!(segment.end, 3.2);
        assert_eq!(segment.text, " Hi there.");
    }

    #[test]
    fn test_transcript_segment_missing_timing_is_rejected() {
        let result: std::result::Result<TranscriptSegment, _> =
            serde_json::from_str(r#"{"text": "no timing"}"#);
        assert!(result.is_err());
    }
}
