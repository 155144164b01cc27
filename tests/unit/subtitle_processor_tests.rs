/*!
 * Tests for cue serialization
 */

use std::str::FromStr;

use ytsubdl::subtitle_processor::{to_plain_text, to_timed_format, Cue, SubtitleFormat};

fn greeting() -> Vec<Cue> {
    vec![Cue::new(0.0, 1.0, "Hi"), Cue::new(1.0, 2.0, "There")]
}

#[test]
fn test_to_plain_text_withTwoCues_shouldJoinWithNewline() {
    assert_eq!(to_plain_text(&greeting()), "Hi\nThere");
}

#[test]
fn test_to_plain_text_withNoCues_shouldBeEmpty() {
    assert_eq!(to_plain_text(&[]), "");
    assert_eq!(to_timed_format(&[]), "");
}

#[test]
fn test_to_timed_format_withTwoCues_shouldEmitNumberedBlocks() {
    let expected = "1\n00:00:00,000 --> 00:00:01,000\nHi\n\n2\n00:00:01,000 --> 00:00:02,000\nThere\n\n";

    assert_eq!(to_timed_format(&greeting()), expected);
}

#[test]
fn test_to_timed_format_withEmptyCue_shouldKeepIndicesContiguous() {
    let cues = vec![
        Cue::new(0.0, 1.0, "one"),
        Cue::new(1.0, 2.0, ""),
        Cue::new(2.0, 3.0, "two"),
    ];

    let srt = to_timed_format(&cues);

    assert_eq!(
        srt,
        "1\n00:00:00,000 --> 00:00:01,000\none\n\n2\n00:00:02,000 --> 00:00:03,000\ntwo\n\n"
    );
    assert_eq!(to_plain_text(&cues), "one\ntwo");
}

#[test]
fn test_to_timed_format_withMultilineText_shouldKeepLines() {
    let cues = vec![Cue::new(61.25, 62.5, "line one\nline two")];

    assert_eq!(
        to_timed_format(&cues),
        "1\n00:01:01,250 --> 00:01:02,500\nline one\nline two\n\n"
    );
}

#[test]
fn test_subtitle_format_shouldSelectSerializerAndExtension() {
    assert_eq!(SubtitleFormat::Txt.extension(), "txt");
    assert_eq!(SubtitleFormat::Srt.extension(), "srt");
    assert_eq!(SubtitleFormat::Txt.render(&greeting()), "Hi\nThere");
    assert!(SubtitleFormat::Srt.render(&greeting()).starts_with("1\n00:00:00,000"));
    assert_eq!(SubtitleFormat::default(), SubtitleFormat::Srt);
}

#[test]
fn test_subtitle_format_fromStr_shouldAcceptAliases() {
    assert_eq!(SubtitleFormat::from_str("TXT").unwrap(), SubtitleFormat::Txt);
    assert_eq!(SubtitleFormat::from_str("plain").unwrap(), SubtitleFormat::Txt);
    assert_eq!(SubtitleFormat::from_str("timed").unwrap(), SubtitleFormat::Srt);
    assert!(SubtitleFormat::from_str("vtt").is_err());
}

#[test]
fn test_cue_formatTimes_shouldUseCodec() {
    let cue = Cue::new(5.5, 7.25, "x");

    assert_eq!(cue.format_start_time(), "00:00:05,500");
    assert_eq!(cue.format_end_time(), "00:00:07,250");
}
