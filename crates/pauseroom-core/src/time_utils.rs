//! Time conversion and display helpers.
//!
//! All functions are pure. Display helpers take signed input and clamp
//! negatives to zero so a caller can never render `-1:-5`.

/// Convert whole minutes to seconds.
///
/// Uses saturating arithmetic to prevent overflow with large values.
pub fn minutes_to_seconds(minutes: u64) -> u64 {
    minutes.saturating_mul(60)
}

/// Convert seconds to whole minutes, rounding down.
pub fn seconds_to_minutes(seconds: u64) -> u64 {
    seconds / 60
}

/// Format seconds as `MM:SS`.
///
/// Minutes are not wrapped at 60: one hour renders as `60:00`.
pub fn format_short(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Format seconds as `1h 2m 5s`, `2m 5s` or `45s`, dropping leading zero units.
pub fn format_long(seconds: i64) -> String {
    let seconds = seconds.max(0);
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m {secs}s")
    } else if minutes > 0 {
        format!("{minutes}m {secs}s")
    } else {
        format!("{secs}s")
    }
}

/// Fraction of `total` already elapsed when `current` remains, in `0.0..=1.0`.
///
/// Returns 0.0 when `total` is zero.
pub fn progress(current: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let elapsed = total as f64 - current as f64;
    (elapsed / total as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn conversions() {
        assert_eq!(minutes_to_seconds(60), 3600);
        assert_eq!(minutes_to_seconds(u64::MAX), u64::MAX);
        assert_eq!(seconds_to_minutes(119), 1);
        assert_eq!(seconds_to_minutes(120), 2);
    }

    #[test]
    fn format_short_examples() {
        assert_eq!(format_short(0), "00:00");
        assert_eq!(format_short(65), "01:05");
        assert_eq!(format_short(3600), "60:00");
        assert_eq!(format_short(14_400), "240:00");
    }

    #[test]
    fn format_short_clamps_negative() {
        assert_eq!(format_short(-5), "00:00");
    }

    #[test]
    fn format_long_examples() {
        assert_eq!(format_long(0), "0s");
        assert_eq!(format_long(45), "45s");
        assert_eq!(format_long(60), "1m 0s");
        assert_eq!(format_long(125), "2m 5s");
        assert_eq!(format_long(3600), "1h 0m 0s");
        assert_eq!(format_long(3725), "1h 2m 5s");
        assert_eq!(format_long(-30), "0s");
    }

    #[test]
    fn progress_edges() {
        assert_eq!(progress(600, 600), 0.0);
        assert_eq!(progress(0, 600), 1.0);
        assert_eq!(progress(300, 600), 0.5);
        assert_eq!(progress(42, 0), 0.0);
        // Remaining larger than total clamps at the lower bound.
        assert_eq!(progress(900, 600), 0.0);
    }

    proptest! {
        #[test]
        fn progress_is_normalized(current in 0u64..1_000_000, total in 0u64..1_000_000) {
            let p = progress(current, total);
            prop_assert!((0.0..=1.0).contains(&p));
        }

        #[test]
        fn format_short_recovers_seconds(seconds in 0i64..1_000_000) {
            let text = format_short(seconds);
            let (mm, ss) = text.split_once(':').unwrap();
            prop_assert_eq!(ss.len(), 2);
            prop_assert!(mm.len() >= 2);
            let total = mm.parse::<i64>().unwrap() * 60 + ss.parse::<i64>().unwrap();
            prop_assert_eq!(total, seconds);
        }
    }
}
