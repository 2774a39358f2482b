use serde::{Deserialize, Serialize};

/// A single word with optional sub-segment timings.
///
/// Alignment does not always produce timestamps for every token
/// (numerals and punctuation frequently come back untimed), so both
/// bounds are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    pub text: String,
}

impl Word {
    /// Whether this word qualifies for word-level rendering: both
    /// timestamps present and non-empty trimmed text.
    pub fn is_timed(&self) -> bool {
        self.start.is_some() && self.end.is_some() && !self.text.trim().is_empty()
    }
}

/// A time-bounded chunk of transcript text. `start <= end`; segments
/// within a transcript are ordered by non-decreasing `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub text: String,
    #[serde(default)]
    pub words: Vec<Word>,
}

/// The immutable output of the model pipeline for one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub text: String,
    pub segments: Vec<Segment>,
    pub language: String,
}
