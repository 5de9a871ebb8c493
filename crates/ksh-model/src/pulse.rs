// Timing arithmetic for KSH measures

use kson_model::schema::MAX_SAFE_INTEGER;
use kson_model::{PULSES_PER_WHOLE, Pulse, TimeSig};

use crate::error::KshError;

/// Resolution of durations written in the file (`stop=`, spin lengths)
pub const FILE_PULSES_PER_WHOLE: Pulse = 192;
/// File pulses to in-memory pulses
pub const PULSE_MULTIPLIER: Pulse = PULSES_PER_WHOLE / FILE_PULSES_PER_WHOLE;
/// Longest laser movement still treated as a slam (a 32nd note)
pub const SLAM_THRESHOLD: Pulse = PULSES_PER_WHOLE / 32;

const _: () = assert!(FILE_PULSES_PER_WHOLE * PULSE_MULTIPLIER == PULSES_PER_WHOLE);

/// Parse `n/d` with both parts positive integers.
pub fn parse_time_sig(value: &str) -> Option<TimeSig> {
    let (n, d) = value.split_once('/')?;
    let n: u32 = n.trim().parse().ok()?;
    let d: u32 = d.trim().parse().ok()?;
    (n > 0 && d > 0).then_some(TimeSig(n, d))
}

/// Parse a duration in file pulses into in-memory pulses.
///
/// Durations that do not fit a KSON integer are rejected.
pub fn parse_file_pulse(value: &str) -> Option<Pulse> {
    file_pulse_to_pulse(value.trim().parse().ok()?)
}

pub fn file_pulse_to_pulse(file_pulse: Pulse) -> Option<Pulse> {
    file_pulse
        .checked_mul(PULSE_MULTIPLIER)
        .filter(|&pulse| pulse <= MAX_SAFE_INTEGER)
}

/// Length of a measure in pulses. `line` is the 1-indexed line used in errors.
pub fn measure_length(time_sig: TimeSig, line: usize) -> Result<Pulse, KshError> {
    let whole = PULSES_PER_WHOLE * Pulse::from(time_sig.numerator());
    let denominator = Pulse::from(time_sig.denominator());
    if denominator == 0 || whole % denominator != 0 {
        return Err(KshError::MeasureLength { line });
    }
    Ok(whole / denominator)
}

/// Pulses between consecutive chart lines of a measure.
///
/// A measure without chart lines has no spacing.
pub fn pulse_per_line(length: Pulse, chart_lines: usize, line: usize) -> Result<Pulse, KshError> {
    if chart_lines == 0 {
        return Ok(0);
    }
    let count = chart_lines as Pulse;
    if length % count != 0 {
        return Err(KshError::LineSpacing {
            line,
            lines: chart_lines,
        });
    }
    Ok(length / count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(PULSE_MULTIPLIER, 5);
        assert_eq!(SLAM_THRESHOLD, 30);
    }

    #[test]
    fn test_parse_time_sig() {
        assert_eq!(parse_time_sig("4/4"), Some(TimeSig(4, 4)));
        assert_eq!(parse_time_sig("7/8"), Some(TimeSig(7, 8)));
        assert_eq!(parse_time_sig("0/4"), None);
        assert_eq!(parse_time_sig("4/0"), None);
        assert_eq!(parse_time_sig("-3/4"), None);
        assert_eq!(parse_time_sig("4"), None);
        assert_eq!(parse_time_sig("4/4/4"), None);
        assert_eq!(parse_time_sig("a/b"), None);
    }

    #[test]
    fn test_measure_length() {
        assert_eq!(measure_length(TimeSig(4, 4), 1).unwrap(), 960);
        assert_eq!(measure_length(TimeSig(3, 4), 1).unwrap(), 720);
        assert_eq!(measure_length(TimeSig(7, 8), 1).unwrap(), 840);
        assert_eq!(measure_length(TimeSig(1, 64), 1).unwrap(), 15);

        let err = measure_length(TimeSig(1, 7), 12).unwrap_err();
        assert_eq!(err.to_string(), "Invalid time signature for measure on line 12");
    }

    #[test]
    fn test_pulse_per_line() {
        assert_eq!(pulse_per_line(960, 16, 1).unwrap(), 60);
        assert_eq!(pulse_per_line(960, 192, 1).unwrap(), 5);
        assert_eq!(pulse_per_line(960, 0, 1).unwrap(), 0);

        let err = pulse_per_line(960, 7, 3).unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.to_string(), "Invalid measure length for measure on line 3");
    }

    #[test]
    fn test_parse_file_pulse() {
        assert_eq!(parse_file_pulse("192"), Some(960));
        assert_eq!(parse_file_pulse("x"), None);
        assert_eq!(parse_file_pulse("-4"), None);
        assert_eq!(parse_file_pulse("1801439850948198"), Some(9_007_199_254_740_990));
        assert_eq!(parse_file_pulse("1801439850948199"), None);
        assert_eq!(parse_file_pulse("9999999999999999"), None);
    }
}
