// @module: Timestamp formatting for the SRT output

/// Convert a seconds offset to whole milliseconds.
///
/// Negative, NaN and infinite offsets collapse to zero.
pub fn seconds_to_ms(seconds: f64) -> u64 {
    if !seconds.is_finite() || seconds <= 0.0 {
        return 0;
    }
    (seconds * 1000.0).round() as u64
}

/// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
pub fn format_ms(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

/// Format a seconds offset to SRT format (HH:MM:SS,mmm)
pub fn format_timestamp(seconds: f64) -> String {
    format_ms(seconds_to_ms(seconds))
}
