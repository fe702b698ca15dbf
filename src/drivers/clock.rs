use crate::drivers::ScopeError;
/// Exclusive upper bound on the clock period (seconds) and the sampling rate (Hz)
/// the 6022BE stores at for clock settings below it, ordered low to high.
const SAMPLE_RATE_TABLE: [(f64, f64); 7] = [
    (3e-6, 48e6),    // 1us, 2us
    (7e-6, 16e6),    // 5us
    (12e-6, 8e6),    // 10us
    (22e-6, 4e6),    // 20us
    (102e-3, 1e6),   // 50us .. 100ms
    (202e-3, 500e3), // 200ms
    (502e-3, 200e3), // 500ms
];
const SLOWEST_RATE_HZ: f64 = 100e3;
/// Seconds between stored samples for a device clock period in seconds.
///
/// Never fails: periods past the last bound (and NaN) get the slowest rate.
pub fn sample_interval(clock_seconds: f64) -> f64 {
    let rate = SAMPLE_RATE_TABLE
        .iter()
        .find(|(bound, _)| clock_seconds < *bound)
        .map(|(_, rate)| *rate)
        .unwrap_or(SLOWEST_RATE_HZ);
    1.0 / rate
}
pub fn sample_rate_hz(step: f64) -> f64 {
    1.0 / step
}
/// Converts a clock string such as `10u`, `2m` or `500uS` to seconds.
///
/// Every alphabetic character is stripped to get the magnitude; the first one
/// picks the unit (`s`, `m`, `u`, `n`, any case).
pub fn parse_duration(text: &str) -> Result<f64, ScopeError> {
    let unit = text
        .chars()
        .find(|c| c.is_alphabetic())
        .ok_or_else(|| ScopeError::format("clock", format!("{text:?} has no time unit")))?;
    let magnitude: String = text.chars().filter(|c| !c.is_alphabetic()).collect();
    let magnitude: f64 = magnitude.trim().parse().map_err(|_| {
        ScopeError::format("clock", format!("{text:?} has no numeric magnitude"))
    })?;
    let divisor = match unit.to_ascii_lowercase() {
        's' => 1.0,
        'm' => 1e3,
        'u' => 1e6,
        'n' => 1e9,
        other => {
            return Err(ScopeError::format(
                "clock",
                format!("unrecognized time unit {other:?} in {text:?}"),
            ))
        }
    };
    Ok(magnitude / divisor)
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn fastest_bucket_below_three_microseconds() {
        for clock in [0.0, 1e-6, 2e-6, 2.999e-6] {
            assert_eq!(sample_interval(clock), 1.0 / 48e6);
        }
    }
    #[test]
    fn bounds_are_exclusive() {
        assert_eq!(sample_interval(3e-6), 1.0 / 16e6);
        assert_eq!(sample_interval(7e-6), 1.0 / 8e6);
        assert_eq!(sample_interval(12e-6), 1.0 / 4e6);
        assert_eq!(sample_interval(22e-6), 1.0 / 1e6);
        assert_eq!(sample_interval(102e-3), 1.0 / 500e3);
        assert_eq!(sample_interval(202e-3), 1.0 / 200e3);
        assert_eq!(sample_interval(502e-3), 1.0 / 100e3);
    }
    #[test]
    fn device_settings_map_to_expected_rates() {
        assert_eq!(sample_interval(5e-6), 1.0 / 16e6);
        assert_eq!(sample_interval(10e-6), 1.0 / 8e6);
        assert_eq!(sample_interval(20e-6), 1.0 / 4e6);
        assert_eq!(sample_interval(50e-6), 1.0 / 1e6);
        assert_eq!(sample_interval(100e-3), 1.0 / 1e6);
        assert_eq!(sample_interval(200e-3), 1.0 / 500e3);
        assert_eq!(sample_interval(500e-3), 1.0 / 200e3);
        assert_eq!(sample_interval(10.0), 1.0 / 100e3);
        assert_eq!(sample_interval(f64::NAN), 1.0 / 100e3);
    }
    #[test]
    fn parses_each_unit() {
        assert_eq!(parse_duration("500u").unwrap(), 500e-6);
        assert_eq!(parse_duration("2m").unwrap(), 2e-3);
        assert_eq!(parse_duration("1s").unwrap(), 1.0);
        assert_eq!(parse_duration("20n").unwrap(), 20e-9);
    }
    #[test]
    fn unit_is_case_insensitive_and_first_letter_wins() {
        assert_eq!(parse_duration("500U").unwrap(), 500e-6);
        assert_eq!(parse_duration("2M").unwrap(), 2e-3);
        assert_eq!(parse_duration("10uS").unwrap(), 10e-6);
        assert_eq!(parse_duration(" 1 S").unwrap(), 1.0);
        assert_eq!(parse_duration("0.5ms").unwrap(), 0.5e-3);
    }
    #[test]
    fn rejects_bad_durations() {
        for text in ["100", "", "u", "1.2.3u", "10k", "10Hz"] {
            let err = parse_duration(text).unwrap_err();
            assert!(
                matches!(err, ScopeError::Format { .. }),
                "{text:?} gave {err:?}"
            );
        }
    }
    #[test]
    fn rate_is_reciprocal_of_step() {
        assert!((sample_rate_hz(sample_interval(10e-6)) - 8e6).abs() < 1e-3);
    }
}
