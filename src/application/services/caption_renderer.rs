//! Pure rendering of timestamped transcripts into caption formats.
//!
//! Deterministic: the same transcript and wrap limits always produce
//! byte-identical output.

use serde::Serialize;

use crate::domain::{CaptionOutputs, Segment, TranscriptResult};

/// Line-wrap limits for one cue, already resolved for a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineWrap {
    pub max_line_width: usize,
    pub max_line_count: usize,
}

/// Per-language-family wrap limits. Arabic-script languages get a
/// narrower default width than everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptionLimits {
    pub max_line_width: usize,
    pub max_line_width_arabic: usize,
    pub max_lines: usize,
    pub max_lines_arabic: usize,
}

impl Default for CaptionLimits {
    fn default() -> Self {
        Self {
            max_line_width: 42,
            max_line_width_arabic: 32,
            max_lines: 2,
            max_lines_arabic: 2,
        }
    }
}

impl CaptionLimits {
    /// Resolve limits for a language code. Any code starting with `ar`
    /// counts as Arabic.
    pub fn for_language(&self, language: &str) -> LineWrap {
        if language.to_ascii_lowercase().starts_with("ar") {
            LineWrap {
                max_line_width: self.max_line_width_arabic,
                max_line_count: self.max_lines_arabic,
            }
        } else {
            LineWrap {
                max_line_width: self.max_line_width,
                max_line_count: self.max_lines,
            }
        }
    }
}

/// The transcript text, verbatim.
pub fn render_text(result: &TranscriptResult) -> String {
    result.text.clone()
}

#[derive(Serialize)]
struct JsonPayload<'a> {
    segments: &'a [Segment],
    language: &'a str,
}

/// `{"segments": [...], "language": "xx"}` with non-ASCII codepoints
/// preserved as-is.
pub fn render_json(segments: &[Segment], language: &str) -> Result<String, serde_json::Error> {
    serde_json::to_string(&JsonPayload { segments, language })
}

/// SubRip: 1-based sequence number, comma millisecond separator, one
/// blank line between cues, single trailing newline.
pub fn render_srt(segments: &[Segment]) -> String {
    let mut out = String::new();
    for (index, segment) in segments.iter().enumerate() {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            index + 1,
            format_timestamp(segment.start, ','),
            format_timestamp(segment.end, ','),
            segment.text.trim()
        ));
    }
    if out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// WebVTT with cue text wrapped to the given limits.
pub fn render_vtt(segments: &[Segment], wrap: LineWrap) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for segment in segments {
        out.push_str(&format!(
            "{} --> {}\n",
            format_timestamp(segment.start, '.'),
            format_timestamp(segment.end, '.')
        ));
        for line in wrap_lines(segment.text.trim(), wrap) {
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }
    if out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// WebVTT with one cue per word. Words lacking either timestamp or
/// non-empty trimmed text are silently skipped.
pub fn render_word_vtt(segments: &[Segment]) -> String {
    let mut out = String::from("WEBVTT\n\n");
    for segment in segments {
        for word in &segment.words {
            let (start, end) = match (word.start, word.end) {
                (Some(start), Some(end)) => (start, end),
                _ => continue,
            };
            let text = word.text.trim();
            if text.is_empty() {
                continue;
            }
            out.push_str(&format!(
                "{} --> {}\n{}\n\n",
                format_timestamp(start, '.'),
                format_timestamp(end, '.'),
                text
            ));
        }
    }
    if out.ends_with("\n\n") {
        out.pop();
    }
    out
}

/// All five payloads for one transcript. The wrap limits must already
/// be resolved from the *detected* language.
pub fn render_outputs(
    result: &TranscriptResult,
    wrap: LineWrap,
) -> Result<CaptionOutputs, serde_json::Error> {
    Ok(CaptionOutputs {
        text: render_text(result),
        vtt: render_vtt(&result.segments, wrap),
        srt: render_srt(&result.segments),
        words: render_word_vtt(&result.segments),
        json: render_json(&result.segments, &result.language)?,
    })
}

/// `HH:MM:SS<sep>mmm`, zero-padded, hours unbounded. Total milliseconds
/// are truncated before the field splits, so no field ever rounds up
/// into the next one.
pub fn format_timestamp(seconds: f64, separator: char) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0) as u64;
    let hours = total_ms / 3_600_000;
    let minutes = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1_000;
    let millis = total_ms % 1_000;
    format!(
        "{:02}:{:02}:{:02}{}{:03}",
        hours, minutes, secs, separator, millis
    )
}

/// Greedy word-wrap at `max_line_width` characters. A single word wider
/// than the limit gets its own line and is never split. Text that would
/// exceed `max_line_count` lines is merged into the final permitted
/// line, which may then exceed the width limit.
fn wrap_lines(text: &str, wrap: LineWrap) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0usize;

    for word in text.split_whitespace() {
        let word_width = word.chars().count();
        if !current.is_empty() && current_width + 1 + word_width > wrap.max_line_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if wrap.max_line_count > 0 && lines.len() > wrap.max_line_count {
        let overflow = lines.split_off(wrap.max_line_count - 1);
        lines.push(overflow.join(" "));
    }

    lines
}
