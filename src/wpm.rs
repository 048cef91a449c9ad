/// Standard word length used for WPM
pub const CHARS_PER_WORD: f64 = 5.0;

/// Words per minute from correct characters and whole elapsed seconds.
/// Zero elapsed time yields 0 rather than infinity.
pub fn compute_wpm(correct_count: usize, elapsed_seconds: u64) -> u32 {
    if elapsed_seconds == 0 {
        return 0;
    }
    let minutes = elapsed_seconds as f64 / 60.0;
    let wpm = (correct_count as f64 / CHARS_PER_WORD / minutes).round();

    match wpm {
        w if w.is_finite() && w >= 0.0 => w as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_elapsed() {
        assert_eq!(compute_wpm(0, 0), 0);
        assert_eq!(compute_wpm(40, 0), 0);
    }

    #[test]
    fn test_one_minute() {
        assert_eq!(compute_wpm(25, 60), 5);
        assert_eq!(compute_wpm(300, 60), 60);
    }

    #[test]
    fn test_no_correct_chars() {
        assert_eq!(compute_wpm(0, 30), 0);
    }

    #[test]
    fn test_rounding() {
        // 12 chars in 10s => 14.4 wpm
        assert_eq!(compute_wpm(12, 10), 14);
        assert_eq!(compute_wpm(28, 60), 6);
        // 45 chars in 2 minutes => 4.5, halves round up
        assert_eq!(compute_wpm(45, 120), 5);
    }

    #[test]
    fn test_short_burst() {
        // 10 chars in the first second is 120 wpm
        assert_eq!(compute_wpm(10, 1), 120);
    }
}
