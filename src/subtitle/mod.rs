//! Subtitle cue model, segmentation, styling, and the SRT exchange format.

pub mod cue;
pub mod srt;
pub mod style;

pub use cue::{SubtitleCue, TranscriptSegment, segment_cues};
pub use style::StyleSpec;
