use skald::application::services::caption_renderer::{
    format_timestamp, render_json, render_outputs, render_srt, render_text, render_vtt,
    render_word_vtt,
};
use skald::application::services::{CaptionLimits, LineWrap};
use skald::domain::{Segment, TranscriptResult, Word};

fn segment(start: f64, end: f64, text: &str) -> Segment {
    Segment {
        start,
        end,
        text: text.to_string(),
        words: vec![],
    }
}

fn word(start: Option<f64>, end: Option<f64>, text: &str) -> Word {
    Word {
        start,
        end,
        text: text.to_string(),
    }
}

#[test]
fn given_single_segment_when_rendering_srt_then_matches_subrip_block() {
    let segments = vec![segment(0.0, 1.5, "hi")];

    let srt = render_srt(&segments);

    assert_eq!(srt, "1\n00:00:00,000 --> 00:00:01,500\nhi\n");
}

#[test]
fn given_multiple_segments_when_rendering_srt_then_blocks_are_blank_line_separated() {
    let segments = vec![segment(0.0, 1.0, " first "), segment(1.0, 2.25, "second")];

    let srt = render_srt(&segments);

    assert_eq!(
        srt,
        "1\n00:00:00,000 --> 00:00:01,000\nfirst\n\n2\n00:00:01,000 --> 00:00:02,250\nsecond\n"
    );
}

#[test]
fn given_no_segments_when_rendering_srt_then_output_is_empty() {
    assert_eq!(render_srt(&[]), "");
}

#[test]
fn given_long_recording_when_formatting_timestamp_then_hours_are_not_clamped() {
    // 25h 1m 1.5s
    assert_eq!(format_timestamp(90_061.5, ','), "25:01:01,500");
}

#[test]
fn given_fractional_milliseconds_when_formatting_then_truncates_without_carry() {
    assert_eq!(format_timestamp(1.9999, '.'), "00:00:01.999");
    assert_eq!(format_timestamp(59.9995, '.'), "00:00:59.999");
    assert_eq!(format_timestamp(0.0, '.'), "00:00:00.000");
}

#[test]
fn given_english_text_when_rendering_vtt_then_wraps_at_default_width() {
    let text = "aaaaaaaaa aaaaaaaaa aaaaaaaaa aaaaaaaaa"; // 39 chars
    let segments = vec![segment(0.0, 2.0, text)];
    let wrap = CaptionLimits::default().for_language("en");

    let vtt = render_vtt(&segments, wrap);

    assert_eq!(
        vtt,
        "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\naaaaaaaaa aaaaaaaaa aaaaaaaaa aaaaaaaaa\n"
    );
}

#[test]
fn given_arabic_language_when_rendering_vtt_then_wraps_at_narrower_width() {
    let text = "aaaaaaaaa aaaaaaaaa aaaaaaaaa aaaaaaaaa"; // 39 chars
    let segments = vec![segment(0.0, 2.0, text)];
    let wrap = CaptionLimits::default().for_language("ar");

    let vtt = render_vtt(&segments, wrap);

    assert_eq!(
        vtt,
        "WEBVTT\n\n00:00:00.000 --> 00:00:02.000\naaaaaaaaa aaaaaaaaa aaaaaaaaa\naaaaaaaaa\n"
    );
}

#[test]
fn given_language_variants_when_resolving_limits_then_ar_prefix_selects_arabic() {
    let limits = CaptionLimits::default();

    assert_eq!(limits.for_language("ar").max_line_width, 32);
    assert_eq!(limits.for_language("AR-EG").max_line_width, 32);
    assert_eq!(limits.for_language("en").max_line_width, 42);
    assert_eq!(limits.for_language("fr").max_line_width, 42);
}

#[test]
fn given_overflowing_cue_when_wrapping_then_tail_merges_into_last_line() {
    let text = "aaaaaaaaaa bbbbbbbbbb cccccccccc dddddddddd eeeeeeeeee";
    let segments = vec![segment(0.0, 4.0, text)];
    let wrap = LineWrap {
        max_line_width: 10,
        max_line_count: 2,
    };

    let vtt = render_vtt(&segments, wrap);

    // The final permitted line absorbs the overflow and may exceed the
    // width limit; the line cap itself is never exceeded.
    assert_eq!(
        vtt,
        "WEBVTT\n\n00:00:00.000 --> 00:00:04.000\n\
         aaaaaaaaaa\nbbbbbbbbbb cccccccccc dddddddddd eeeeeeeeee\n"
    );
}

#[test]
fn given_word_wider_than_limit_when_wrapping_then_word_keeps_own_line() {
    let segments = vec![segment(0.0, 1.0, "abcdefghij xy")];
    let wrap = LineWrap {
        max_line_width: 5,
        max_line_count: 3,
    };

    let vtt = render_vtt(&segments, wrap);

    assert_eq!(
        vtt,
        "WEBVTT\n\n00:00:00.000 --> 00:00:01.000\nabcdefghij\nxy\n"
    );
}

#[test]
fn given_untimed_or_blank_words_when_rendering_word_vtt_then_they_are_skipped() {
    let mut seg = segment(0.0, 3.0, "Hello there world");
    seg.words = vec![
        word(Some(0.0), Some(0.5), "Hello"),
        word(None, Some(1.0), "there"),
        word(Some(1.2), None, "missing"),
        word(Some(1.5), Some(1.8), "   "),
        word(Some(2.0), Some(2.5), "world"),
    ];

    let vtt = render_word_vtt(&[seg]);

    assert_eq!(
        vtt,
        "WEBVTT\n\n00:00:00.000 --> 00:00:00.500\nHello\n\n00:00:02.000 --> 00:00:02.500\nworld\n"
    );
}

#[test]
fn given_no_timed_words_when_rendering_word_vtt_then_only_header_remains() {
    let segments = vec![segment(0.0, 1.0, "hi")];

    assert_eq!(render_word_vtt(&segments), "WEBVTT\n");
}

#[test]
fn given_non_ascii_transcript_when_rendering_json_then_codepoints_survive() {
    let segments = vec![segment(0.0, 1.0, "こんにちは")];

    let json = render_json(&segments, "ja").unwrap();

    assert!(json.contains("こんにちは"));
    assert!(json.contains("\"language\":\"ja\""));
    assert!(!json.contains("\\u"));
}

#[test]
fn given_transcript_when_rendering_text_then_verbatim() {
    let result = TranscriptResult {
        text: "line one\nline two\n".to_string(),
        segments: vec![],
        language: "en".to_string(),
    };

    assert_eq!(render_text(&result), "line one\nline two\n");
}

#[test]
fn given_same_transcript_when_rendering_twice_then_outputs_are_byte_identical() {
    let mut seg = segment(0.25, 4.75, "the quick brown fox jumps over the lazy dog");
    seg.words = vec![
        word(Some(0.25), Some(0.5), "the"),
        word(Some(0.5), Some(1.0), "quick"),
    ];
    let result = TranscriptResult {
        text: "the quick brown fox jumps over the lazy dog".to_string(),
        segments: vec![seg],
        language: "en".to_string(),
    };
    let wrap = CaptionLimits::default().for_language(&result.language);

    let first = render_outputs(&result, wrap).unwrap();
    let second = render_outputs(&result, wrap).unwrap();

    assert_eq!(first, second);
}
