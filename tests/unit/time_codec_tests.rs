/*!
 * Tests for timestamp formatting
 */

use ytsubdl::time_codec::{format_ms, format_timestamp, seconds_to_ms};

#[test]
fn test_format_timestamp_withFractionalSeconds_shouldUseThreeMillisecondDigits() {
    assert_eq!(format_timestamp(5.5), "00:00:05,500");
    assert_eq!(format_timestamp(0.0), "00:00:00,000");
    assert_eq!(format_timestamp(3661.042), "01:01:01,042");
}

#[test]
fn test_format_timestamp_withFloatNoise_shouldRoundToNearestMillisecond() {
    assert_eq!(format_timestamp(0.1 + 0.2), "00:00:00,300");
    assert_eq!(format_timestamp(1.0004), "00:00:01,000");
}

#[test]
fn test_format_timestamp_withIncreasingInput_shouldBeLexicographicallyNonDecreasing() {
    let mut previous = format_timestamp(0.0);
    let mut seconds = 0.0;
    while seconds < 86_000.0 {
        seconds += 997.123;
        let current = format_timestamp(seconds);
        assert!(current >= previous, "{} < {}", current, previous);
        previous = current;
    }
}

#[test]
fn test_seconds_to_ms_withInvalidInput_shouldClampToZero() {
    assert_eq!(seconds_to_ms(-3.0), 0);
    assert_eq!(seconds_to_ms(f64::NAN), 0);
    assert_eq!(seconds_to_ms(f64::INFINITY), 0);
}

#[test]
fn test_format_ms_withMoreThanADay_shouldNotWrapHours() {
    assert_eq!(format_ms(100 * 3_600_000 + 1), "100:00:00,001");
}
