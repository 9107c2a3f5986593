//! Subtitle exports of a finished timeline.

pub mod srt;
pub mod time;
pub mod tsv;
pub mod vtt;
